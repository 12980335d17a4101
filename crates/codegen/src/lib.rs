//! Expression resolution, operand evaluation, instruction selection, and
//! ModR/M/immediate encoding for the 8086/80186 code generator
//! (`SPEC_FULL.md` §4.1-§4.5), grounded on
//! `original_source/src/codegen/code-generator.cpp`.
//!
//! This crate turns an `asm86_ast::Ast` into filled `asm86_context::Section`
//! byte buffers plus a set of unresolved `Fixup`s; it has no knowledge of
//! section ordering, final symbol evaluation, or output-envelope framing —
//! those are the linker's job (`SPEC_FULL.md` §4.6-§4.9).

pub mod encode;
pub mod error;
pub mod fixup;
pub mod generator;
pub mod operand;
pub mod resolve;
pub mod select;

pub use error::CodegenError;
pub use fixup::{Fixup, FixupKind, FixupValueType};
pub use generator::CodeGenerator;
pub use operand::{evaluate_operand, OperandEval, OperandKind, Sign};
pub use select::{select_variant, Score};
