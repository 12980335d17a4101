//! ISA catalog for the 8086/80186 instruction set (`SPEC_FULL.md` §2.1).
//!
//! This crate is pure data: registers, operand prototypes, encoding kinds,
//! and the static instruction table. It has no knowledge of the AST,
//! symbol table, or linker — those live in the crates that depend on it.

pub mod isa;
pub mod operand;
pub mod registers;

pub use operand::{InstructionVariant, OperandEncoding, OperandPrototype, OperandType, SpecialFeature};
pub use registers::{RegisterGroup, RegisterId, SegReg};

pub const ASSEMBLER_MAJOR_VERSION: u16 = 0;
pub const ASSEMBLER_MINOR_VERSION: u16 = 1;
pub const ASSEMBLER_PATCH_VERSION: u16 = 0;
