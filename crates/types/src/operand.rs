//! Operand prototypes and instruction-variant shapes (`SPEC_FULL.md` §3).

use strum::Display;

/// The type tag of an operand prototype slot. The capitalized tags match
/// exactly one concrete operand (a specific register, or the literal `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OperandType {
    None,

    R,
    M,
    Rm,
    Imm,
    Creg,
    Sreg,
    Moffs,
    Rel,
    Ptr,

    Al,
    Ax,
    Eax,
    Dx,
    Cl,

    Cs,
    Ds,
    Es,
    Ss,
    Fs,
    Gs,

    One,
}

/// How a variant's operand list maps onto emitted bytes
/// (`SPEC_FULL.md` §3, Encoding kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OperandEncoding {
    Zo,
    Rm,
    Rmi,
    Mr,
    Mi,
    Fd,
    Td,
    Oi,
    D,
    I,
    M,
    O,
    S,
    M1,
    Mc,
}

/// A feature flag modifying how the selector scores and the emitter encodes
/// a variant. Only `SignExtended` is realized (§4.3 step 2d).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Default)]
pub enum SpecialFeature {
    #[default]
    None,
    SignExtended,
}

/// `(type, size_bits)`. `size` of `0` means "no size constraint" (e.g. `m`
/// with no PTR qualifier, or `ZO`-only prototypes like `DX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandPrototype {
    pub ty: OperandType,
    pub size: u16,
}

impl OperandPrototype {
    pub const fn new(ty: OperandType, size: u16) -> Self {
        OperandPrototype { ty, size }
    }

    pub const fn bare(ty: OperandType) -> Self {
        OperandPrototype { ty, size: 0 }
    }
}

/// One encoding of a mnemonic: opcode bytes, encoding kind, operand
/// prototype list, optional opcode-extension (lives in modr/m.reg), and an
/// optional feature flag.
#[derive(Debug, Clone, Copy)]
pub struct InstructionVariant {
    pub opcode: &'static [u8],
    pub encoding: OperandEncoding,
    pub operands: &'static [OperandPrototype],
    /// `0..=7` when the variant uses a fixed modr/m.reg opcode extension.
    /// Per `SPEC_FULL.md` §9 Open Question #2: present but inert for
    /// `O`/`OI` encodings (e.g. `INC`'s `O` form carries a spurious `0`).
    pub extension: Option<u8>,
    pub feature: SpecialFeature,
}

impl InstructionVariant {
    pub const fn new(
        opcode: &'static [u8],
        encoding: OperandEncoding,
        operands: &'static [OperandPrototype],
    ) -> Self {
        InstructionVariant {
            opcode,
            encoding,
            operands,
            extension: None,
            feature: SpecialFeature::None,
        }
    }

    pub const fn with_extension(mut self, extension: u8) -> Self {
        self.extension = Some(extension);
        self
    }

    pub const fn with_feature(mut self, feature: SpecialFeature) -> Self {
        self.feature = feature;
        self
    }

    pub fn arity(&self) -> usize {
        self.operands.len()
    }
}
