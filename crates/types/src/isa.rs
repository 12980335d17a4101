//! The static 8086/80186 instruction-set catalog (`SPEC_FULL.md` §2.1).
//!
//! Mnemonic lookup dispatches through a `match` on the (upper-cased)
//! mnemonic string rather than a runtime hash map, per the design note in
//! `SPEC_FULL.md` §9 ("a compile-time constant table... with... a
//! perfect-hash or sorted-by-name index"): the match arms compile to a
//! jump/comparison table, and each arm's value is a `&'static` slice baked
//! into the binary.

use crate::operand::{
    InstructionVariant as Ins, OperandEncoding as OpEn, OperandPrototype as P, OperandType as T,
    SpecialFeature,
};
use crate::registers::RegisterId;

const fn sx(opcode: &'static [u8], enc: OpEn, ops: &'static [P]) -> Ins {
    Ins::new(opcode, enc, ops).with_feature(SpecialFeature::SignExtended)
}

const fn ext(opcode: &'static [u8], enc: OpEn, ops: &'static [P], extension: u8) -> Ins {
    Ins::new(opcode, enc, ops).with_extension(extension)
}

const fn sx_ext(opcode: &'static [u8], enc: OpEn, ops: &'static [P], extension: u8) -> Ins {
    Ins::new(opcode, enc, ops)
        .with_extension(extension)
        .with_feature(SpecialFeature::SignExtended)
}

static AAA: &[Ins] = &[Ins::new(&[0x37], OpEn::Zo, &[])];
static AAD: &[Ins] = &[
    Ins::new(&[0xd5, 0x0a], OpEn::Zo, &[]),
    Ins::new(&[0xd5], OpEn::Zo, &[]),
];
static AAM: &[Ins] = &[
    Ins::new(&[0xd4, 0x0a], OpEn::Zo, &[]),
    Ins::new(&[0xd4], OpEn::Zo, &[]),
];
static ADD: &[Ins] = &[
    Ins::new(&[0x04], OpEn::I, &[P::bare(T::Al), P::new(T::Imm, 8)]),
    Ins::new(&[0x05], OpEn::I, &[P::bare(T::Ax), P::new(T::Imm, 16)]),
    ext(&[0x80], OpEn::Mi, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], 0),
    sx_ext(&[0x83], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 8)], 0),
    ext(&[0x81], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 16)], 0),
    Ins::new(&[0x00], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x01], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    Ins::new(&[0x02], OpEn::Rm, &[P::new(T::R, 8), P::new(T::Rm, 8)]),
    Ins::new(&[0x03], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
];
static AND: &[Ins] = &[
    Ins::new(&[0x24], OpEn::I, &[P::bare(T::Al), P::new(T::Imm, 8)]),
    Ins::new(&[0x25], OpEn::I, &[P::bare(T::Ax), P::new(T::Imm, 16)]),
    ext(&[0x80], OpEn::Mi, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], 4),
    ext(&[0x81], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 16)], 4),
    sx_ext(&[0x83], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 8)], 4),
    Ins::new(&[0x20], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x21], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    Ins::new(&[0x22], OpEn::Rm, &[P::new(T::R, 8), P::new(T::Rm, 8)]),
    Ins::new(&[0x23], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
];
static BT: &[Ins] = &[
    Ins::new(&[0x0f, 0xa3], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    ext(&[0x0f, 0xba], OpEn::Mi, &[P::new(T::R, 16), P::new(T::Imm, 8)], 4),
];
static BTC: &[Ins] = &[
    Ins::new(&[0x0f, 0xbb], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    ext(&[0x0f, 0xba], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 8)], 7),
];
static CALL: &[Ins] = &[
    Ins::new(&[0xe8], OpEn::D, &[P::new(T::Rel, 16)]),
    ext(&[0xff], OpEn::M, &[P::new(T::Rm, 16)], 2),
    Ins::new(&[0x9a], OpEn::D, &[P::new(T::Ptr, 16)]),
    ext(&[0xff], OpEn::M, &[P::bare(T::M)], 3),
];
static CLC: &[Ins] = &[Ins::new(&[0xf8], OpEn::Zo, &[])];
static CMP: &[Ins] = &[
    Ins::new(&[0x3c], OpEn::I, &[P::bare(T::Al), P::new(T::Imm, 8)]),
    Ins::new(&[0x3d], OpEn::I, &[P::bare(T::Ax), P::new(T::Imm, 16)]),
    Ins::new(&[0x3d], OpEn::I, &[P::bare(T::Eax), P::new(T::Imm, 32)]),
    ext(&[0x80], OpEn::Mi, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], 7),
    ext(&[0x81], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 16)], 7),
    sx_ext(&[0x83], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 8)], 7),
    Ins::new(&[0x38], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x39], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    Ins::new(&[0x3a], OpEn::Rm, &[P::new(T::R, 8), P::new(T::Rm, 8)]),
    Ins::new(&[0x3b], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
];
static CPUID: &[Ins] = &[Ins::new(&[0x0f, 0xa2], OpEn::Zo, &[])];
static DEC: &[Ins] = &[
    ext(&[0xfe], OpEn::M, &[P::new(T::Rm, 8)], 1),
    ext(&[0xff], OpEn::M, &[P::new(T::Rm, 16)], 1),
    Ins::new(&[0x48], OpEn::O, &[P::new(T::R, 16)]),
];
static DIV: &[Ins] = &[
    ext(&[0xf6], OpEn::M, &[P::new(T::Rm, 8)], 6),
    ext(&[0xf7], OpEn::M, &[P::new(T::Rm, 16)], 6),
];
static IDIV: &[Ins] = &[
    ext(&[0xf6], OpEn::M, &[P::new(T::Rm, 8)], 7),
    ext(&[0xf7], OpEn::M, &[P::new(T::Rm, 16)], 7),
];
static IMUL: &[Ins] = &[
    ext(&[0xf6], OpEn::M, &[P::new(T::Rm, 8)], 5),
    ext(&[0xf7], OpEn::M, &[P::new(T::Rm, 16)], 5),
    Ins::new(&[0x0f, 0xaf], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
    Ins::new(
        &[0x6b],
        OpEn::Rmi,
        &[P::new(T::R, 16), P::new(T::Rm, 16), P::new(T::Imm, 8)],
    ),
    Ins::new(
        &[0x69],
        OpEn::Rmi,
        &[P::new(T::R, 16), P::new(T::Rm, 16), P::new(T::Imm, 16)],
    ),
];
static IN: &[Ins] = &[
    Ins::new(&[0xe4], OpEn::I, &[P::bare(T::Al), P::new(T::Imm, 8)]),
    Ins::new(&[0xe5], OpEn::I, &[P::bare(T::Ax), P::new(T::Imm, 8)]),
    Ins::new(&[0xec], OpEn::Zo, &[P::bare(T::Al), P::bare(T::Dx)]),
    Ins::new(&[0xed], OpEn::Zo, &[P::bare(T::Ax), P::bare(T::Dx)]),
];
static INC: &[Ins] = &[
    ext(&[0xfe], OpEn::M, &[P::new(T::Rm, 8)], 0),
    ext(&[0xff], OpEn::M, &[P::new(T::Rm, 16)], 0),
    // Spurious opcode-extension byte on the `O` form, inert for that
    // encoding kind (SPEC_FULL.md §9, Open Question #2).
    ext(&[0x40], OpEn::O, &[P::new(T::R, 16)], 0),
];
static INT: &[Ins] = &[Ins::new(&[0xcd], OpEn::I, &[P::new(T::Imm, 8)])];
static INT0: &[Ins] = &[Ins::new(&[0xce], OpEn::Zo, &[])];
static INT1: &[Ins] = &[Ins::new(&[0xf1], OpEn::Zo, &[])];
static INT3: &[Ins] = &[Ins::new(&[0xcc], OpEn::Zo, &[])];
static IRET: &[Ins] = &[Ins::new(&[0xcf], OpEn::Zo, &[])];

macro_rules! jcc {
    ($short:literal, $near1:literal, $near2:literal) => {
        &[
            Ins::new(&[$short], OpEn::D, &[P::new(T::Rel, 8)]),
            Ins::new(&[$near1, $near2], OpEn::D, &[P::new(T::Rel, 16)]),
        ]
    };
}

static JA: &[Ins] = jcc!(0x77, 0x0f, 0x87);
static JAE: &[Ins] = jcc!(0x73, 0x0f, 0x83);
static JB: &[Ins] = jcc!(0x72, 0x0f, 0x82);
static JBE: &[Ins] = jcc!(0x76, 0x0f, 0x86);
static JC: &[Ins] = jcc!(0x72, 0x0f, 0x82);
static JCXZ: &[Ins] = &[Ins::new(&[0xe3], OpEn::D, &[P::new(T::Rel, 8)])];
static JE: &[Ins] = jcc!(0x74, 0x0f, 0x84);
static JG: &[Ins] = jcc!(0x7f, 0x0f, 0x8f);
static JGE: &[Ins] = jcc!(0x7d, 0x0f, 0x8d);
static JL: &[Ins] = jcc!(0x7c, 0x0f, 0x8c);
static JLE: &[Ins] = jcc!(0x7e, 0x0f, 0x8e);
static JNA: &[Ins] = jcc!(0x76, 0x0f, 0x86);
static JNAE: &[Ins] = jcc!(0x72, 0x0f, 0x82);
static JNB: &[Ins] = jcc!(0x73, 0x0f, 0x83);
static JNBE: &[Ins] = jcc!(0x77, 0x0f, 0x87);
static JNC: &[Ins] = jcc!(0x73, 0x0f, 0x83);
static JNE: &[Ins] = jcc!(0x75, 0x0f, 0x85);
static JNG: &[Ins] = jcc!(0x7e, 0x0f, 0x8e);
static JNGE: &[Ins] = jcc!(0x7c, 0x0f, 0x8c);
static JNL: &[Ins] = jcc!(0x7d, 0x0f, 0x8d);
static JNLE: &[Ins] = jcc!(0x7f, 0x0f, 0x8f);
static JNO: &[Ins] = jcc!(0x71, 0x0f, 0x81);
static JNP: &[Ins] = jcc!(0x7b, 0x0f, 0x8b);
static JNS: &[Ins] = jcc!(0x79, 0x0f, 0x89);
static JNZ: &[Ins] = jcc!(0x75, 0x0f, 0x85);
static JO: &[Ins] = jcc!(0x70, 0x0f, 0x80);
static JP: &[Ins] = jcc!(0x7a, 0x0f, 0x8a);
static JPE: &[Ins] = jcc!(0x7a, 0x0f, 0x8a);
static JPO: &[Ins] = jcc!(0x7b, 0x0f, 0x8b);
static JS: &[Ins] = jcc!(0x78, 0x0f, 0x88);
static JZ: &[Ins] = jcc!(0x74, 0x0f, 0x84);
static JMP: &[Ins] = &[
    Ins::new(&[0xeb], OpEn::D, &[P::new(T::Rel, 8)]),
    Ins::new(&[0xe9], OpEn::D, &[P::new(T::Rel, 16)]),
    ext(&[0xff], OpEn::D, &[P::new(T::Rm, 16)], 4),
    Ins::new(&[0xea], OpEn::S, &[P::new(T::Ptr, 16)]),
    ext(&[0xff], OpEn::M, &[P::new(T::Rm, 16)], 5),
];
static LOOP: &[Ins] = &[Ins::new(&[0xe2], OpEn::D, &[P::new(T::Rel, 8)])];
static LOOPE: &[Ins] = &[Ins::new(&[0xe1], OpEn::D, &[P::new(T::Rel, 8)])];
static LOOPNE: &[Ins] = &[Ins::new(&[0xe2], OpEn::D, &[P::new(T::Rel, 8)])];
static LEA: &[Ins] = &[Ins::new(&[0x8d], OpEn::Rm, &[P::new(T::R, 16), P::bare(T::M)])];
static LEAVE: &[Ins] = &[Ins::new(&[0xc9], OpEn::Zo, &[])];
static MOV: &[Ins] = &[
    Ins::new(&[0x88], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x89], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    Ins::new(&[0x89], OpEn::Mr, &[P::new(T::Rm, 32), P::new(T::R, 32)]),
    Ins::new(&[0x8a], OpEn::Rm, &[P::new(T::R, 8), P::new(T::Rm, 8)]),
    Ins::new(&[0x8b], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
    Ins::new(&[0x8b], OpEn::Rm, &[P::new(T::R, 32), P::new(T::Rm, 32)]),
    Ins::new(&[0x8c], OpEn::Mr, &[P::new(T::Rm, 16), P::bare(T::Sreg)]),
    Ins::new(&[0x8e], OpEn::Rm, &[P::bare(T::Sreg), P::new(T::Rm, 16)]),
    Ins::new(&[0xa0], OpEn::Fd, &[P::new(T::Al, 8), P::new(T::Moffs, 8)]),
    Ins::new(&[0xa1], OpEn::Fd, &[P::new(T::Ax, 16), P::new(T::Moffs, 16)]),
    Ins::new(&[0xa2], OpEn::Td, &[P::new(T::Moffs, 8), P::new(T::Al, 8)]),
    Ins::new(&[0xa3], OpEn::Td, &[P::new(T::Moffs, 16), P::new(T::Ax, 16)]),
    Ins::new(&[0xb0], OpEn::Oi, &[P::new(T::R, 8), P::new(T::Imm, 8)]),
    Ins::new(&[0xb8], OpEn::Oi, &[P::new(T::R, 16), P::new(T::Imm, 16)]),
    Ins::new(&[0xb8], OpEn::Oi, &[P::new(T::R, 32), P::new(T::Imm, 32)]),
    ext(&[0xc6], OpEn::Mi, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], 0),
    ext(&[0xc7], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 16)], 0),
    ext(&[0xc7], OpEn::Mi, &[P::new(T::Rm, 32), P::new(T::Imm, 32)], 0),
    Ins::new(&[0x0f, 0x20], OpEn::Mr, &[P::new(T::R, 32), P::bare(T::Creg)]),
    Ins::new(&[0x0f, 0x22], OpEn::Rm, &[P::bare(T::Creg), P::new(T::R, 32)]),
];
static MUL: &[Ins] = &[
    ext(&[0xf6], OpEn::M, &[P::new(T::Rm, 8)], 4),
    ext(&[0xf7], OpEn::M, &[P::new(T::Rm, 16)], 4),
];
static NOP: &[Ins] = &[Ins::new(&[0x90], OpEn::Zo, &[])];
static NOT: &[Ins] = &[
    ext(&[0xf6], OpEn::M, &[P::new(T::Rm, 8)], 2),
    ext(&[0xf7], OpEn::M, &[P::new(T::Rm, 16)], 2),
];
static OR: &[Ins] = &[
    Ins::new(&[0x0c], OpEn::I, &[P::bare(T::Al), P::new(T::Imm, 8)]),
    Ins::new(&[0x0d], OpEn::I, &[P::bare(T::Ax), P::new(T::Imm, 16)]),
    ext(&[0x80], OpEn::Mi, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], 1),
    ext(&[0x81], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 16)], 1),
    sx_ext(&[0x83], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 8)], 1),
    Ins::new(&[0x08], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x09], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    Ins::new(&[0x0a], OpEn::Rm, &[P::new(T::R, 8), P::new(T::Rm, 8)]),
    Ins::new(&[0x0b], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
];
static OUT: &[Ins] = &[
    Ins::new(&[0xe6], OpEn::I, &[P::new(T::Imm, 8), P::bare(T::Al)]),
    Ins::new(&[0xe7], OpEn::I, &[P::new(T::Imm, 8), P::bare(T::Ax)]),
    Ins::new(&[0xee], OpEn::I, &[P::bare(T::Dx), P::bare(T::Al)]),
    Ins::new(&[0xef], OpEn::I, &[P::bare(T::Dx), P::bare(T::Ax)]),
];
static POP: &[Ins] = &[
    ext(&[0x8f], OpEn::M, &[P::new(T::Rm, 16)], 0),
    Ins::new(&[0x58], OpEn::O, &[P::new(T::R, 16)]),
    Ins::new(&[0x1f], OpEn::Zo, &[P::bare(T::Ds)]),
    Ins::new(&[0x07], OpEn::Zo, &[P::bare(T::Es)]),
    Ins::new(&[0x17], OpEn::Zo, &[P::bare(T::Ss)]),
    Ins::new(&[0x0f, 0xa1], OpEn::Zo, &[P::bare(T::Fs)]),
    Ins::new(&[0x0f, 0xa9], OpEn::Zo, &[P::bare(T::Gs)]),
];
static POPA: &[Ins] = &[Ins::new(&[0x61], OpEn::Zo, &[])];
static PUSH: &[Ins] = &[
    ext(&[0xff], OpEn::M, &[P::new(T::Rm, 16)], 6),
    Ins::new(&[0x50], OpEn::O, &[P::new(T::R, 16)]),
    Ins::new(&[0x6a], OpEn::I, &[P::new(T::Imm, 8)]),
    Ins::new(&[0x68], OpEn::I, &[P::new(T::Imm, 16)]),
    Ins::new(&[0x0e], OpEn::Zo, &[P::bare(T::Cs)]),
    Ins::new(&[0x16], OpEn::Zo, &[P::bare(T::Ss)]),
    Ins::new(&[0x1e], OpEn::Zo, &[P::bare(T::Ds)]),
    Ins::new(&[0x06], OpEn::Zo, &[P::bare(T::Es)]),
    Ins::new(&[0x0f, 0xa0], OpEn::Zo, &[P::bare(T::Fs)]),
    Ins::new(&[0x0f, 0xa8], OpEn::Zo, &[P::bare(T::Gs)]),
];
static PUSHA: &[Ins] = &[Ins::new(&[0x60], OpEn::Zo, &[])];
static PUSHF: &[Ins] = &[Ins::new(&[0x9c], OpEn::Zo, &[])];
static RET: &[Ins] = &[Ins::new(&[0xc3], OpEn::Zo, &[])];

macro_rules! shift_group {
    ($ext:literal) => {
        &[
            ext(&[0xd0], OpEn::M1, &[P::new(T::Rm, 8), P::bare(T::One)], $ext),
            ext(&[0xd2], OpEn::Mc, &[P::new(T::Rm, 8), P::bare(T::Cl)], $ext),
            ext(&[0xc0], OpEn::Mc, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], $ext),
            ext(&[0xd1], OpEn::M1, &[P::new(T::Rm, 16), P::bare(T::One)], $ext),
            ext(&[0xd3], OpEn::Mc, &[P::new(T::Rm, 16), P::bare(T::Cl)], $ext),
            ext(&[0xc1], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 8)], $ext),
        ]
    };
}

static SAL: &[Ins] = shift_group!(4);
static SAR: &[Ins] = shift_group!(7);
static SHL: &[Ins] = shift_group!(4);
static SHR: &[Ins] = shift_group!(5);

static STC: &[Ins] = &[Ins::new(&[0xf9], OpEn::Zo, &[])];
static SUB: &[Ins] = &[
    Ins::new(&[0x2c], OpEn::I, &[P::bare(T::Al), P::new(T::Imm, 8)]),
    Ins::new(&[0x2d], OpEn::I, &[P::bare(T::Ax), P::new(T::Imm, 16)]),
    Ins::new(&[0x2d], OpEn::I, &[P::bare(T::Eax), P::new(T::Imm, 32)]),
    ext(&[0x80], OpEn::Mi, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], 5),
    ext(&[0x81], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 16)], 5),
    sx_ext(&[0x83], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 8)], 5),
    Ins::new(&[0x28], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x29], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    Ins::new(&[0x2a], OpEn::Rm, &[P::new(T::R, 8), P::new(T::Rm, 8)]),
    Ins::new(&[0x2b], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
];
static TEST: &[Ins] = &[
    Ins::new(&[0xa8], OpEn::I, &[P::bare(T::Al), P::new(T::Imm, 8)]),
    Ins::new(&[0xa9], OpEn::I, &[P::bare(T::Ax), P::new(T::Imm, 16)]),
    ext(&[0xf6], OpEn::Mi, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], 0),
    ext(&[0xf7], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 16)], 0),
    Ins::new(&[0x84], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x85], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
];
static XCHG: &[Ins] = &[
    Ins::new(&[0x90], OpEn::O, &[P::bare(T::Ax), P::new(T::R, 16)]),
    Ins::new(&[0x90], OpEn::O, &[P::new(T::R, 16), P::bare(T::Ax)]),
    Ins::new(&[0x86], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x86], OpEn::Rm, &[P::new(T::R, 8), P::new(T::Rm, 8)]),
    Ins::new(&[0x87], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    Ins::new(&[0x87], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
];
static XOR: &[Ins] = &[
    Ins::new(&[0x34], OpEn::I, &[P::bare(T::Al), P::new(T::Imm, 8)]),
    Ins::new(&[0x35], OpEn::I, &[P::bare(T::Ax), P::new(T::Imm, 16)]),
    Ins::new(&[0x35], OpEn::I, &[P::bare(T::Eax), P::new(T::Imm, 32)]),
    ext(&[0x80], OpEn::Mi, &[P::new(T::Rm, 8), P::new(T::Imm, 8)], 6),
    ext(&[0x81], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 16)], 6),
    sx_ext(&[0x83], OpEn::Mi, &[P::new(T::Rm, 16), P::new(T::Imm, 8)], 6),
    Ins::new(&[0x30], OpEn::Mr, &[P::new(T::Rm, 8), P::new(T::R, 8)]),
    Ins::new(&[0x31], OpEn::Mr, &[P::new(T::Rm, 16), P::new(T::R, 16)]),
    Ins::new(&[0x32], OpEn::Rm, &[P::new(T::R, 8), P::new(T::Rm, 8)]),
    Ins::new(&[0x33], OpEn::Rm, &[P::new(T::R, 16), P::new(T::Rm, 16)]),
];

/// Looks up a mnemonic's candidate encoding variants. Mnemonics are matched
/// case-insensitively; `sx`/`ext`/`sx_ext` above are only used while
/// *building* the table (not part of the public API).
pub fn lookup(mnemonic: &str) -> Option<&'static [Ins]> {
    let upper = mnemonic.to_ascii_uppercase();
    Some(match upper.as_str() {
        "AAA" => AAA,
        "AAD" => AAD,
        "AAM" => AAM,
        "ADD" => ADD,
        "AND" => AND,
        "BT" => BT,
        "BTC" => BTC,
        "CALL" => CALL,
        "CLC" => CLC,
        "CMP" => CMP,
        "CPUID" => CPUID,
        "DEC" => DEC,
        "DIV" => DIV,
        "IDIV" => IDIV,
        "IMUL" => IMUL,
        "IN" => IN,
        "INC" => INC,
        "INT" => INT,
        "INT0" => INT0,
        "INT1" => INT1,
        "INT3" => INT3,
        "IRET" | "IRED" => IRET,
        "JA" => JA,
        "JAE" => JAE,
        "JB" => JB,
        "JBE" => JBE,
        "JC" => JC,
        "JCXZ" | "JECXZ" => JCXZ,
        "JE" => JE,
        "JG" => JG,
        "JGE" => JGE,
        "JL" => JL,
        "JLE" => JLE,
        "JNA" => JNA,
        "JNAE" => JNAE,
        "JNB" => JNB,
        "JNBE" => JNBE,
        "JNC" => JNC,
        "JNE" => JNE,
        "JNG" => JNG,
        "JNGE" => JNGE,
        "JNL" => JNL,
        "JNLE" => JNLE,
        "JNO" => JNO,
        "JNP" => JNP,
        "JNS" => JNS,
        "JNZ" => JNZ,
        "JO" => JO,
        "JP" => JP,
        "JPE" => JPE,
        "JPO" => JPO,
        "JS" => JS,
        "JZ" => JZ,
        "JMP" => JMP,
        "LEA" => LEA,
        "LEAVE" => LEAVE,
        "LOOP" => LOOP,
        "LOOPE" => LOOPE,
        "LOOPNE" => LOOPNE,
        "MOV" => MOV,
        "MUL" => MUL,
        "NOP" => NOP,
        "NOT" => NOT,
        "OR" => OR,
        "OUT" => OUT,
        "POP" => POP,
        "POPA" | "POPAD" => POPA,
        "PUSH" => PUSH,
        "PUSHA" | "PUSHAD" => PUSHA,
        "PUSHF" | "PUSHFD" => PUSHF,
        "RET" => RET,
        "SAL" => SAL,
        "SAR" => SAR,
        "SHL" => SHL,
        "SHR" => SHR,
        "STC" => STC,
        "SUB" => SUB,
        "TEST" => TEST,
        "XCHG" => XCHG,
        "XOR" => XOR,
        _ => return None,
    })
}

pub fn has_mnemonic(mnemonic: &str) -> bool {
    lookup(mnemonic).is_some()
}

/// `DB/DW/DD/DQ/DT` unit sizes in bytes.
pub fn define_data_size(mnemonic: &str) -> Option<u8> {
    match mnemonic.to_ascii_uppercase().as_str() {
        "DB" => Some(1),
        "DW" => Some(2),
        "DD" => Some(4),
        "DQ" => Some(8),
        "DT" => Some(10),
        _ => None,
    }
}

/// `RESB/RESW/RESD/RESQ/REST` unit sizes in bytes.
pub fn reserve_data_size(mnemonic: &str) -> Option<u8> {
    match mnemonic.to_ascii_uppercase().as_str() {
        "RESB" => Some(1),
        "RESW" => Some(2),
        "RESD" => Some(4),
        "RESQ" => Some(8),
        "REST" => Some(10),
        _ => None,
    }
}

/// Maps a memory expression's base-register multiset to its modr/m `rm`
/// code (`SPEC_FULL.md` §4.4 step 2). `regs` need not be sorted or
/// deduplicated; any combination absent from the table (including more than
/// two registers, or a disallowed pair like `BX`+`BP`) returns `None`.
pub fn rm_code(regs: &[RegisterId]) -> Option<u8> {
    use RegisterId::{Bp, Bx, Di, Si};
    let has = |r: RegisterId| regs.contains(&r);
    let unknown = regs
        .iter()
        .any(|r| !matches!(r, Bx | Si | Bp | Di));
    if unknown {
        return None;
    }
    match (has(Bx), has(Si), has(Bp), has(Di), regs.len()) {
        (true, true, false, false, 2) => Some(0b000),
        (true, false, false, true, 2) => Some(0b001),
        (false, true, true, false, 2) => Some(0b010),
        (false, false, true, true, 2) => Some(0b011),
        (false, true, false, false, 1) => Some(0b100),
        (false, false, false, true, 1) => Some(0b101),
        (false, false, true, false, 1) => Some(0b110),
        (true, false, false, false, 1) => Some(0b111),
        (false, false, false, false, 0) => Some(0b110),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn mov_ax_immediate_is_the_oi_form() {
        let variants = lookup("mov").unwrap();
        let oi16 = variants
            .iter()
            .find(|v| v.encoding == OpEn::Oi && v.operands[0].size == 16)
            .unwrap();
        assert_eq!(oi16.opcode, &[0xb8]);
    }

    #[test]
    fn add_sign_extended_imm8_form_is_flagged() {
        let variants = lookup("ADD").unwrap();
        let imm8_form = variants
            .iter()
            .find(|v| v.opcode == [0x83])
            .unwrap();
        assert_eq!(imm8_form.feature, SpecialFeature::SignExtended);
    }

    #[test]
    fn unknown_mnemonic_is_none() {
        assert!(lookup("FROB").is_none());
    }

    #[rstest]
    #[case(&[RegisterId::Bx, RegisterId::Si], Some(0b000))]
    #[case(&[RegisterId::Bp], Some(0b110))]
    #[case(&[], Some(0b110))]
    #[case(&[RegisterId::Bx, RegisterId::Bp], None)]
    fn rm_table_matches_spec(#[case] regs: &[RegisterId], #[case] expected: Option<u8>) {
        assert_eq!(rm_code(regs), expected);
    }

    #[test]
    fn inc_o_form_carries_inert_extension() {
        let variants = lookup("INC").unwrap();
        let o_form = variants.iter().find(|v| v.encoding == OpEn::O).unwrap();
        assert_eq!(o_form.extension, Some(0));
    }

    #[test]
    fn reserve_and_define_sizes() {
        assert_eq!(define_data_size("dw"), Some(2));
        assert_eq!(reserve_data_size("RESQ"), Some(8));
        assert_eq!(define_data_size("DX"), None);
    }
}
