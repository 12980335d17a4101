//! Typed, API-misuse-level linker errors, distinct from the recoverable,
//! collected issues (undefined symbol, overflow, depth exceeded, ...) that
//! go through `asm86_context::Diagnostics` instead (`SPEC_FULL.md` §7).

use thiserror::Error;

use crate::format::LinkingFormat;

#[derive(Debug, Error)]
pub enum LinkingError {
    #[error("cannot link: {0} diagnostic error(s) already recorded")]
    PendingErrors(usize),

    #[error("linking format {0:?} is catalogued but not realized")]
    UnsupportedFormat(LinkingFormat),

    #[error("linking failed: {0} symbol/fix-up error(s) recorded, see diagnostics")]
    LinkFailed(usize),
}
