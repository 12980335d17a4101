//! ModR/M + displacement encoding and immediate/fix-up emission
//! (`SPEC_FULL.md` §4.4, §4.5), grounded on
//! `original_source/src/syntax/statements.cpp`'s `EncodeModRM`/`EncodeImm`.

use std::collections::HashMap;

use asm86_ast::{expr, Ast, Expr, ExprId};
use asm86_context::{Section, SymbolTable};
use asm86_types::{isa, OperandPrototype, OperandType as T, RegisterId};

use crate::error::CodegenError;
use crate::fixup::Fixup;

/// A memory operand's explicit `sreg:[...]` prefix byte, if any. Must be
/// pushed before the opcode bytes, so the top-level instruction dispatcher
/// scans for this across all of an instruction's operands before emitting
/// anything (`SPEC_FULL.md` §4.4 step 3).
pub fn segment_prefix(ast: &Ast, operands: &[ExprId]) -> Option<u8> {
    operands.iter().find_map(|&id| match ast.exprs.get(id) {
        Expr::Memory(mem) => mem.seg_override.map(|s| s.prefix_byte()),
        _ => None,
    })
}

pub fn register_encoding(ast: &Ast, expr_id: ExprId) -> Result<u8, CodegenError> {
    match ast.exprs.get(expr_id) {
        Expr::Register(reg) => reg.encoding().ok_or(CodegenError::UnsupportedRegister),
        _ => Err(CodegenError::ExpectedRegisterOperand),
    }
}

fn fits_in_i8(value: i64) -> bool {
    (-128..=127).contains(&value)
}

/// Encodes the modr/m byte (plus 0-2 displacement bytes) for `rm_operand`
/// against a fixed `reg_field`, appending directly to `section`. Returns the
/// fix-up created for a dependent displacement, if any.
pub fn encode_modrm_rm(
    ast: &Ast,
    _symbols: &SymbolTable,
    section: &mut Section,
    rm_operand: ExprId,
    reg_field: u8,
) -> Result<Option<Fixup>, CodegenError> {
    match ast.exprs.get(rm_operand) {
        Expr::Register(reg) => {
            let rm = reg.encoding().ok_or(CodegenError::UnsupportedRegister)?;
            section.push_byte(0b1100_0000 | (reg_field << 3) | rm);
            Ok(None)
        }
        Expr::Memory(mem) => {
            let regs = asm86_ast::expr::memory_base_registers(&ast.exprs, mem.body)
                .ok_or(CodegenError::InvalidMemoryExpression)?;
            let rm = isa::rm_code(&regs).ok_or(CodegenError::UnsupportedRegisterCombination)?;
            // Same `is_dependent` gate as `encode_immediate`: a displacement
            // referencing a symbol always defers to a fix-up, even a
            // same-section backward label already resolvable in the code-gen
            // symbol table (its value there is a bare section-local offset,
            // not the final linked address).
            let displacement = if expr::is_dependent(&ast.exprs, mem.body) {
                None
            } else {
                Some(expr::resolve(&ast.exprs, mem.body, &HashMap::new()))
            };

            if regs.is_empty() {
                section.push_byte(0b0000_0000 | (reg_field << 3) | rm);
                return Ok(push_disp16(ast, section, mem.body, displacement));
            }

            let is_bp_only = regs.len() == 1 && regs[0] == RegisterId::Bp;
            match displacement {
                None => {
                    section.push_byte(0b1000_0000 | (reg_field << 3) | rm);
                    Ok(push_disp16(ast, section, mem.body, None))
                }
                Some(0) if !is_bp_only => {
                    section.push_byte(reg_field << 3 | rm);
                    Ok(None)
                }
                Some(v) => {
                    if fits_in_i8(v) {
                        section.push_byte(0b0100_0000 | (reg_field << 3) | rm);
                        section.push_byte(v as i8 as u8);
                    } else {
                        section.push_byte(0b1000_0000 | (reg_field << 3) | rm);
                        section.push_bytes(&(v as i16).to_le_bytes());
                    }
                    Ok(None)
                }
            }
        }
        _ => Err(CodegenError::InvalidMemoryExpression),
    }
}

/// Pushes a (placeholder-or-real) 2-byte displacement for the empty- or
/// unresolved-register-set direct-address forms, recording a fix-up when the
/// value isn't known yet. Conservatively tagged `AbsoluteAddress`: a
/// displacement standing in for an as-yet-unknown symbol is, in every case
/// this assembler emits, the address of a label rather than a plain integer
/// (`SPEC_FULL.md` §4.4's "fix-up emission" note).
fn push_disp16(_ast: &Ast, section: &mut Section, body: ExprId, displacement: Option<i64>) -> Option<Fixup> {
    match displacement {
        Some(v) => {
            section.push_bytes(&(v as i16).to_le_bytes());
            None
        }
        None => {
            let offset = section.len();
            section.push_bytes(&[0, 0]);
            Some(Fixup::absolute_address(body, offset, 2))
        }
    }
}

/// Computes the byte width of an operand's encoded immediate
/// (`SPEC_FULL.md` §4.5): `moffs`/`ptr` always force 2 bytes regardless of
/// the catalogued prototype size.
fn immediate_size(proto: &OperandPrototype) -> u8 {
    match proto.ty {
        T::Moffs | T::Ptr => 2,
        _ => (proto.size / 8) as u8,
    }
}

/// Emits an operand's immediate/offset bytes, or a zero placeholder plus a
/// fix-up if the operand is dependent.
///
/// Gated on `is_dependent`, not on whether the value happens to already be
/// resolvable (`original_source/src/syntax/statements.cpp:157`'s
/// `operand->IsDependent()`): a same-section backward label is resolvable in
/// the code-gen symbol table (it holds a section-relative offset as soon as
/// the label is seen), but that offset is never the final value — it still
/// needs the origin/section-base addition (§4.7) for an absolute/value
/// target, or the relative-delta subtraction (§4.8) for `rel`. Baking it in
/// here instead of deferring to a fix-up would skip both.
pub fn encode_immediate(
    ast: &Ast,
    _symbols: &SymbolTable,
    section: &mut Section,
    operand: ExprId,
    proto: &OperandPrototype,
) -> Option<Fixup> {
    let size = immediate_size(proto);
    if size == 0 {
        return None;
    }
    if !expr::is_dependent(&ast.exprs, operand) {
        let value = expr::resolve(&ast.exprs, operand, &HashMap::new());
        let bytes = value.to_le_bytes();
        section.push_bytes(&bytes[..size as usize]);
        return None;
    }

    let offset = section.len();
    section.push_bytes(&vec![0u8; size as usize]);
    match proto.ty {
        T::Rel => {
            let relative_origin = section.len() as u64;
            Some(Fixup::relative_address(operand, offset, size, relative_origin))
        }
        T::Imm => Some(Fixup::value(operand, offset, size)),
        T::Ptr => Some(Fixup::absolute_address(operand, offset, size)),
        _ => Some(Fixup::absolute_address(operand, offset, size)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asm86_ast::BinaryOp;
    use asm86_types::RegisterId;
    use pretty_assertions::assert_eq;

    #[test]
    fn register_operand_is_mod_11() {
        let mut ast = Ast::new();
        let dx = ast.reg(RegisterId::Dx);
        let table = SymbolTable::new();
        let mut section = Section::new(".TEXT");
        encode_modrm_rm(&ast, &table, &mut section, dx, 0).unwrap();
        assert_eq!(section.code(), &[0b1100_0010]);
    }

    #[test]
    fn bx_si_plus_four_is_mod01_disp8() {
        let mut ast = Ast::new();
        let bx = ast.reg(RegisterId::Bx);
        let si = ast.reg(RegisterId::Si);
        let sum = ast.binary(BinaryOp::Add, bx, si);
        let four = ast.num(4);
        let body = ast.binary(BinaryOp::Add, sum, four);
        let mem = ast.mem(body, 0, None);
        let table = SymbolTable::new();
        let mut section = Section::new(".TEXT");
        encode_modrm_rm(&ast, &table, &mut section, mem, 0).unwrap();
        assert_eq!(section.code(), &[0b0100_0000, 0x04]);
    }

    #[test]
    fn bp_alone_with_zero_displacement_forces_disp8() {
        let mut ast = Ast::new();
        let bp = ast.reg(RegisterId::Bp);
        let mem = ast.mem(bp, 0, None);
        let table = SymbolTable::new();
        let mut section = Section::new(".TEXT");
        encode_modrm_rm(&ast, &table, &mut section, mem, 0).unwrap();
        assert_eq!(section.code(), &[0b0100_0110, 0x00]);
    }

    #[test]
    fn empty_register_set_is_direct_disp16() {
        let mut ast = Ast::new();
        let addr = ast.num(0x200);
        let mem = ast.mem(addr, 0, None);
        let table = SymbolTable::new();
        let mut section = Section::new(".TEXT");
        encode_modrm_rm(&ast, &table, &mut section, mem, 0).unwrap();
        assert_eq!(section.code(), &[0b0000_0110, 0x00, 0x02]);
    }

    #[test]
    fn unresolved_displacement_records_a_fixup() {
        let mut ast = Ast::new();
        let target = ast.sym("MSG");
        let mem = ast.mem(target, 0, None);
        let table = SymbolTable::new();
        let mut section = Section::new(".DATA");
        let fixup = encode_modrm_rm(&ast, &table, &mut section, mem, 0)
            .unwrap()
            .unwrap();
        assert_eq!(fixup.byte_offset, 1);
        assert_eq!(fixup.size, 2);
        assert_eq!(section.code(), &[0b0000_0110, 0x00, 0x00]);
    }
}
