//! Deferred numeric patches recorded during code generation
//! (`SPEC_FULL.md` §3 "Fix-up (linking target)"), grounded on
//! `original_source/src/linking/linking-targets.h`.
//!
//! This type is defined here, not in `asm86-linking`, because `asm86-codegen`
//! is the component that creates fix-ups while filling a section's bytes;
//! `asm86-linking` depends on this crate (not the reverse) and consumes
//! `Fixup` values to patch the final image.

use asm86_ast::ExprId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixupKind {
    Value,
    AbsoluteAddress,
    RelativeAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixupValueType {
    Integer,
    Float,
}

/// A patch site inside one section's code buffer, resolved once every
/// symbol it depends on is known (`SPEC_FULL.md` §4.8).
#[derive(Debug, Clone)]
pub struct Fixup {
    pub expr: ExprId,
    pub kind: FixupKind,
    pub value_type: FixupValueType,
    pub byte_offset: usize,
    pub size: u8,
    /// Only meaningful for `RelativeAddress`: the address of the byte
    /// immediately after the patched field, from which the patched value is
    /// a signed displacement (`SPEC_FULL.md` §4.5).
    pub relative_origin: u64,
}

impl Fixup {
    pub fn value(expr: ExprId, byte_offset: usize, size: u8) -> Self {
        Fixup {
            expr,
            kind: FixupKind::Value,
            value_type: FixupValueType::Integer,
            byte_offset,
            size,
            relative_origin: 0,
        }
    }

    pub fn absolute_address(expr: ExprId, byte_offset: usize, size: u8) -> Self {
        Fixup {
            expr,
            kind: FixupKind::AbsoluteAddress,
            value_type: FixupValueType::Integer,
            byte_offset,
            size,
            relative_origin: 0,
        }
    }

    pub fn relative_address(expr: ExprId, byte_offset: usize, size: u8, relative_origin: u64) -> Self {
        Fixup {
            expr,
            kind: FixupKind::RelativeAddress,
            value_type: FixupValueType::Integer,
            byte_offset,
            size,
            relative_origin,
        }
    }
}
