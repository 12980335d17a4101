//! Symbol table, section/translation-unit state, and the diagnostics sink
//! (`SPEC_FULL.md` §2.3, §2.4, §7).
//!
//! This crate is the shared mutable state `asm86-codegen` and
//! `asm86-linking` both operate on; it has no knowledge of the AST or of
//! instruction encoding itself.

pub mod diagnostics;
pub mod error;
pub mod message;
pub mod section;
pub mod source_location;
pub mod symbol;
pub mod symbol_table;
pub mod translation_unit;

pub use diagnostics::Diagnostics;
pub use error::ContextError;
pub use message::{Kind as MessageKind, Message};
pub use section::Section;
pub use source_location::SourceLocation;
pub use symbol::{Symbol, SymbolValue, SymbolValueKind};
pub use symbol_table::SymbolTable;
pub use translation_unit::TranslationUnit;
