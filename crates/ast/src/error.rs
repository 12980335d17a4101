//! Arena-handle misuse errors. These signal a bug in the caller (a handle
//! from one `Arena` used against another, or a stale handle after the arena
//! it names was replaced) rather than anything a source program could
//! trigger — ordinary assembly mistakes are reported through the
//! diagnostics sink in `asm86-context`, not through this type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AstError {
    #[error("expression handle {index} is out of bounds (arena has {len} entries)")]
    ExprOutOfBounds { index: u32, len: usize },
    #[error("item handle {index} is out of bounds (arena has {len} entries)")]
    ItemOutOfBounds { index: u32, len: usize },
}
