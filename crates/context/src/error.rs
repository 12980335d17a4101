//! API-misuse errors for this crate's lookup-by-name collections, grounded
//! on the `.at()`-throws-`std::out_of_range` pattern in
//! `original_source/src/context/symbol-table.h`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),
}
