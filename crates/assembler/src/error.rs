//! Typed, API-misuse-facing errors for the top-level facade (`SPEC_FULL.md`
//! §7's "typed (API-misuse / internal) errors" paragraph), distinct from the
//! `Diagnostics` messages collected during assembly itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
    /// Code generation recorded at least one error; linking was never
    /// attempted (`SPEC_FULL.md` §7's phase-boundary check: parse, code-gen,
    /// link).
    #[error("build failed: {0} errors")]
    CodeGenFailed(usize),
    #[error(transparent)]
    Linking(#[from] asm86_linking::LinkingError),
}
