//! Output envelope selector (`SPEC_FULL.md` §4.9), grounded on
//! `original_source/src/linking/linker.h`'s `LinkingFormat` enum.
//!
//! Kept at all four variants the source catalogues even though this port
//! only realizes two of them: the point of the enum is to name every format
//! the linker knows *about*, not just the ones it can currently produce.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkingFormat {
    /// Concatenated section bytes, no header (§4.9).
    RawBinary,
    /// MS-DOS MZ executable: header + relocation table + image (§4.9, §6).
    DosExecutable,
    /// Catalogued, not realized by this assembler.
    WinExecutable,
    /// Catalogued, not realized by this assembler (the "object form"
    /// non-goal).
    Elf,
}
