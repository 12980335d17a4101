//! Section ordering, symbol evaluation, fix-up application, and output
//! envelope serialization (`SPEC_FULL.md` §2.9, §4.6-§4.9), grounded on
//! `original_source/src/linking/linker.cpp` and the rest of
//! `original_source/src/linking/`.
//!
//! This crate is the last stage of the pipeline: it takes an already
//! code-generated `asm86_codegen::CodeGenerator` (filled sections, a flat
//! symbol table, and a per-section fix-up list) and produces a finished
//! `RawBinary` or MZ `DosExecutable` artifact.

pub mod assembled_object;
pub mod error;
pub mod format;
pub mod linker;
pub mod mz;
pub mod ordering;
pub mod raw_binary;

pub use assembled_object::AssembledObject;
pub use error::LinkingError;
pub use format::LinkingFormat;
pub use linker::link;
pub use mz::{DosExecutable, Relocation};
pub use ordering::{order_sections, OrderedSection};
pub use raw_binary::RawBinary;
