//! Internal/API-misuse errors for this crate, distinct from the
//! `asm86_context::Diagnostics` sink that collects recoverable,
//! per-statement assembly errors (`SPEC_FULL.md` §7).
//!
//! These are raised only for shapes the instruction selector or encoder
//! cannot proceed past at all (an invalid memory expression, an
//! unimplemented catalogued encoding), not for ordinary "this mnemonic
//! doesn't exist" user mistakes — those are reported through `Diagnostics`
//! by the top-level driver in `generator.rs` instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("invalid memory expression")]
    InvalidMemoryExpression,

    #[error("unsupported register combination for an addressing mode")]
    UnsupportedRegisterCombination,

    #[error("expected a register operand")]
    ExpectedRegisterOperand,

    #[error("register has no modr/m encoding index")]
    UnsupportedRegister,

    #[error("the `{0}` encoding kind is catalogued but not realized")]
    EncodingNotImplemented(&'static str),

    #[error("count must resolve to a non-negative integer at code-generation time")]
    UnresolvedOrNegativeCount,
}
