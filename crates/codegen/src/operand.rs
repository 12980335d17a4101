//! Operand evaluation (`SPEC_FULL.md` §4.2), grounded on
//! `original_source/src/codegen/code-generator.cpp`'s `EvaluateOperands`.

use asm86_ast::{expr, Ast, Expr, ExprId};
use asm86_context::SymbolTable;
use asm86_types::{OperandType as T, RegisterGroup};

use crate::error::CodegenError;
use crate::resolve::resolve_known;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Register,
    Memory,
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Signed,
    Unsigned,
    None,
}

/// One operand's evaluated shape, ready for the instruction selector.
#[derive(Debug, Clone)]
pub struct OperandEval {
    pub kind: OperandKind,
    pub candidate_types: Vec<T>,
    pub min_bits: u16,
    pub known_value: Option<i64>,
    pub sign: Sign,
    /// Registers and size-qualified memory operands must match a
    /// prototype's size exactly rather than merely fit under it
    /// (`SPEC_FULL.md` §4.3 step 2c).
    pub exact_size_required: bool,
}

fn min_bits_for_magnitude(value: i64) -> u16 {
    let mut magnitude = value.unsigned_abs();
    let mut bytes: u16 = 1;
    magnitude >>= 8;
    while magnitude > 0 {
        bytes += 1;
        magnitude >>= 8;
    }
    bytes * 8
}

fn sign_of(value: i64, min_bits: u16) -> Sign {
    if value < 0 {
        return Sign::Signed;
    }
    if value == 0 || min_bits == 0 {
        return Sign::None;
    }
    let high_bit = 1i64 << (min_bits - 1);
    if value & high_bit != 0 {
        Sign::Unsigned
    } else {
        Sign::None
    }
}

pub fn evaluate_operand(
    ast: &Ast,
    symbols: &SymbolTable,
    expr_id: ExprId,
) -> Result<OperandEval, CodegenError> {
    match ast.exprs.get(expr_id) {
        Expr::Register(reg) => {
            let mut candidates = vec![T::R, T::Rm];
            match reg.group() {
                RegisterGroup::Segment => candidates.push(T::Sreg),
                RegisterGroup::Control => candidates.push(T::Creg),
                _ => {}
            }
            let fixed = match reg {
                asm86_types::RegisterId::Al => Some(T::Al),
                asm86_types::RegisterId::Ax => Some(T::Ax),
                asm86_types::RegisterId::Eax => Some(T::Eax),
                asm86_types::RegisterId::Dx => Some(T::Dx),
                asm86_types::RegisterId::Cl => Some(T::Cl),
                asm86_types::RegisterId::Cs => Some(T::Cs),
                asm86_types::RegisterId::Ds => Some(T::Ds),
                asm86_types::RegisterId::Es => Some(T::Es),
                asm86_types::RegisterId::Ss => Some(T::Ss),
                asm86_types::RegisterId::Fs => Some(T::Fs),
                asm86_types::RegisterId::Gs => Some(T::Gs),
                _ => None,
            };
            if let Some(tag) = fixed {
                candidates.push(tag);
            }
            Ok(OperandEval {
                kind: OperandKind::Register,
                candidate_types: candidates,
                min_bits: reg.bit_width(),
                known_value: None,
                sign: Sign::None,
                exact_size_required: true,
            })
        }
        Expr::Memory(mem) => {
            let regs = expr::memory_base_registers(&ast.exprs, mem.body)
                .ok_or(CodegenError::InvalidMemoryExpression)?;
            let mut candidates = vec![T::M, T::Rm];
            if regs.is_empty() {
                candidates.push(T::Moffs);
            }
            Ok(OperandEval {
                kind: OperandKind::Memory,
                candidate_types: candidates,
                min_bits: mem.size_override as u16 * 8,
                known_value: resolve_known(ast, symbols, mem.body),
                sign: Sign::None,
                exact_size_required: mem.size_override != 0,
            })
        }
        _ => {
            let known_value = resolve_known(ast, symbols, expr_id);
            let mut candidates = vec![T::Imm, T::Rel, T::Ptr];
            if known_value == Some(1) {
                candidates.push(T::One);
            }
            let min_bits = known_value.map(min_bits_for_magnitude).unwrap_or(16);
            let sign = known_value.map(|v| sign_of(v, min_bits)).unwrap_or(Sign::None);
            Ok(OperandEval {
                kind: OperandKind::Immediate,
                candidate_types: candidates,
                min_bits,
                known_value,
                sign,
                exact_size_required: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asm86_ast::BinaryOp;
    use asm86_types::RegisterId;
    use pretty_assertions::assert_eq;

    #[test]
    fn register_operand_carries_fixed_and_generic_tags() {
        let mut ast = Ast::new();
        let ax = ast.reg(RegisterId::Ax);
        let table = SymbolTable::new();
        let eval = evaluate_operand(&ast, &table, ax).unwrap();
        assert_eq!(eval.kind, OperandKind::Register);
        assert!(eval.candidate_types.contains(&T::Ax));
        assert!(eval.candidate_types.contains(&T::Rm));
        assert_eq!(eval.min_bits, 16);
    }

    #[test]
    fn immediate_magnitude_picks_minimal_width() {
        let mut ast = Ast::new();
        let n = ast.num(0x1234);
        let table = SymbolTable::new();
        let eval = evaluate_operand(&ast, &table, n).unwrap();
        assert_eq!(eval.min_bits, 16);
        assert_eq!(eval.known_value, Some(0x1234));
    }

    #[test]
    fn unresolved_immediate_is_conservatively_16_bits() {
        let mut ast = Ast::new();
        let sym = ast.sym("LATER");
        let table = SymbolTable::new();
        let eval = evaluate_operand(&ast, &table, sym).unwrap();
        assert_eq!(eval.min_bits, 16);
        assert_eq!(eval.known_value, None);
    }

    #[test]
    fn empty_register_memory_operand_also_offers_moffs() {
        let mut ast = Ast::new();
        let addr = ast.num(0x200);
        let mem = ast.mem(addr, 0, None);
        let table = SymbolTable::new();
        let eval = evaluate_operand(&ast, &table, mem).unwrap();
        assert!(eval.candidate_types.contains(&T::Moffs));
    }

    #[test]
    fn invalid_memory_expression_is_rejected() {
        let mut ast = Ast::new();
        let bx = ast.reg(RegisterId::Bx);
        let two = ast.num(2);
        let product = ast.binary(BinaryOp::Mul, bx, two);
        let mem = ast.mem(product, 0, None);
        let table = SymbolTable::new();
        assert_eq!(
            evaluate_operand(&ast, &table, mem).unwrap_err(),
            CodegenError::InvalidMemoryExpression
        );
    }
}
