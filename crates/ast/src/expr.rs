//! Expression AST (`SPEC_FULL.md` §3 "Expression"), grounded on
//! `original_source/src/syntax/expressions.h`/`.cpp`.
//!
//! Matches the source hierarchy's split between a purely syntactic
//! `is_dependent`/`dependencies` (no symbol table involved) and a direct,
//! non-recursive `resolve` against a flat `name -> i64` map (missing names
//! resolve to `0`, mirroring `SymbolExpr::Resolve`). The recursive,
//! forward-reference-aware resolution described in `SPEC_FULL.md` §4.1 is
//! layered on top of this in `asm86-codegen`, which is the component that
//! actually knows about the symbol table and code-gen/link-time phases.

use std::collections::{HashMap, HashSet};

use asm86_types::{RegisterId, SegReg};

use crate::arena::{Arena, Id};

pub type ExprId = Id<Expr>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Shl,
    Shr,
    And,
    Or,
    Xor,
}

/// A memory operand body: `size_override` is in bytes (`0` when no
/// `BYTE`/`WORD`/... qualifier was given); `seg_override` is the explicit
/// `sreg:[...]` prefix, if any. Per the invariant in `SPEC_FULL.md` §3, a
/// `Memory` node never nests another `Memory` node — enforced by the
/// builder, not representable as a type-level constraint here since `body`
/// is an arbitrary `Expr` tree.
#[derive(Debug, Clone, Copy)]
pub struct MemoryExpr {
    pub body: ExprId,
    pub size_override: u8,
    pub seg_override: Option<SegReg>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Number(i64),
    /// A character/string literal. Resolves to its single byte value iff
    /// `value.len() == 1`; otherwise it is dependent and must be emitted as
    /// a byte sequence by `DB`/`DW` rather than folded to an integer.
    Literal(String),
    Symbol(String),
    Register(RegisterId),
    Paren(ExprId),
    Memory(MemoryExpr),
    Unary(UnaryOp, ExprId),
    Binary(BinaryOp, ExprId, ExprId),
    Duplicate { count: ExprId, value: ExprId },
}

/// Direct resolution against a flat symbol map. Missing names resolve to
/// `0` (matching `SymbolExpr::Resolve`'s `[[unlikely]]` fallback) — the
/// caller (`asm86-codegen`'s expression resolver) is responsible for first
/// establishing that every dependency actually is in `symbols`.
pub fn resolve(arena: &Arena<Expr>, id: ExprId, symbols: &HashMap<String, i64>) -> i64 {
    match arena.get(id) {
        Expr::Number(v) => *v,
        Expr::Literal(s) => {
            if s.chars().count() == 1 {
                s.chars().next().unwrap() as i64
            } else {
                0
            }
        }
        Expr::Symbol(name) => *symbols.get(name).unwrap_or(&0),
        Expr::Register(_) => 0,
        Expr::Paren(inner) | Expr::Unary(UnaryOp::Plus, inner) => resolve(arena, *inner, symbols),
        Expr::Memory(mem) => resolve(arena, mem.body, symbols),
        Expr::Unary(UnaryOp::Neg, inner) => -resolve(arena, *inner, symbols),
        Expr::Unary(UnaryOp::Not, inner) => !resolve(arena, *inner, symbols),
        Expr::Binary(op, lhs, rhs) => {
            let l = resolve(arena, *lhs, symbols);
            let r = resolve(arena, *rhs, symbols);
            match op {
                BinaryOp::Add => l.wrapping_add(r),
                BinaryOp::Sub => l.wrapping_sub(r),
                BinaryOp::Mul => l.wrapping_mul(r),
                BinaryOp::Div => {
                    if r == 0 {
                        0
                    } else {
                        l / r
                    }
                }
                BinaryOp::Shl => l << r,
                BinaryOp::Shr => l >> r,
                BinaryOp::And => l & r,
                BinaryOp::Or => l | r,
                BinaryOp::Xor => l ^ r,
            }
        }
        Expr::Duplicate { value, .. } => resolve(arena, *value, symbols),
    }
}

/// Syntactic dependence: does this expression contain a free `Symbol` name
/// anywhere in its tree? Independent of whether that name is currently
/// known.
pub fn is_dependent(arena: &Arena<Expr>, id: ExprId) -> bool {
    match arena.get(id) {
        Expr::Number(_) | Expr::Register(_) => false,
        Expr::Literal(s) => s.chars().count() != 1,
        Expr::Symbol(_) => true,
        Expr::Paren(inner) | Expr::Unary(_, inner) => is_dependent(arena, *inner),
        Expr::Memory(mem) => is_dependent(arena, mem.body),
        Expr::Binary(_, lhs, rhs) => is_dependent(arena, *lhs) || is_dependent(arena, *rhs),
        Expr::Duplicate { count, value } => {
            is_dependent(arena, *count) || is_dependent(arena, *value)
        }
    }
}

/// Collects every free symbol name referenced anywhere in the expression.
pub fn dependencies(arena: &Arena<Expr>, id: ExprId, out: &mut HashSet<String>) {
    match arena.get(id) {
        Expr::Number(_) | Expr::Register(_) | Expr::Literal(_) => {}
        Expr::Symbol(name) => {
            out.insert(name.clone());
        }
        Expr::Paren(inner) | Expr::Unary(_, inner) => dependencies(arena, *inner, out),
        Expr::Memory(mem) => dependencies(arena, mem.body, out),
        Expr::Binary(_, lhs, rhs) => {
            dependencies(arena, *lhs, out);
            dependencies(arena, *rhs, out);
        }
        Expr::Duplicate { count, value } => {
            dependencies(arena, *count, out);
            dependencies(arena, *value, out);
        }
    }
}

/// The base-register multiset appearing in a memory expression's body,
/// following only `+`/unary/paren nodes (`SPEC_FULL.md` §4.4 step 2,
/// grounded on `MemoryExpr::MakeRmRegsCombination`). Returns `None` if the
/// expression shape is invalid for a memory operand (registers combined
/// with anything other than `+`/unary-`-`/paren at the point they appear).
pub fn memory_base_registers(arena: &Arena<Expr>, id: ExprId) -> Option<Vec<RegisterId>> {
    let mut out = Vec::new();
    collect_memory_registers(arena, id, &mut out)?;
    Some(out)
}

fn collect_memory_registers(
    arena: &Arena<Expr>,
    id: ExprId,
    out: &mut Vec<RegisterId>,
) -> Option<()> {
    match arena.get(id) {
        Expr::Register(r) => {
            out.push(*r);
            Some(())
        }
        Expr::Paren(inner) => collect_memory_registers(arena, *inner, out),
        Expr::Unary(UnaryOp::Plus, inner) => collect_memory_registers(arena, *inner, out),
        Expr::Unary(UnaryOp::Neg, inner) => {
            // A register may appear negated only if it resolves away
            // entirely elsewhere; negating a register symbolically has no
            // meaning for an rm combination, so treat it as a rejection by
            // requiring the inner expression not itself be a register.
            if matches!(arena.get(*inner), Expr::Register(_)) {
                None
            } else {
                collect_memory_registers(arena, *inner, out)
            }
        }
        Expr::Binary(BinaryOp::Add, lhs, rhs) => {
            collect_memory_registers(arena, *lhs, out)?;
            collect_memory_registers(arena, *rhs, out)
        }
        Expr::Binary(BinaryOp::Sub, lhs, rhs) => {
            collect_memory_registers(arena, *lhs, out)?;
            // A register is never valid on the rhs of a `-` (only constants
            // are subtracted from a base); reject if one appears there.
            if contains_register(arena, *rhs) {
                None
            } else {
                Some(())
            }
        }
        other => {
            if expr_contains_register(other, arena) {
                None
            } else {
                Some(())
            }
        }
    }
}

fn contains_register(arena: &Arena<Expr>, id: ExprId) -> bool {
    match arena.get(id) {
        Expr::Register(_) => true,
        Expr::Paren(inner) | Expr::Unary(_, inner) => contains_register(arena, *inner),
        Expr::Binary(_, lhs, rhs) => contains_register(arena, *lhs) || contains_register(arena, *rhs),
        Expr::Memory(mem) => contains_register(arena, mem.body),
        _ => false,
    }
}

fn expr_contains_register(e: &Expr, arena: &Arena<Expr>) -> bool {
    match e {
        Expr::Register(_) => true,
        Expr::Paren(inner) | Expr::Unary(_, inner) => contains_register(arena, *inner),
        Expr::Binary(_, lhs, rhs) => contains_register(arena, *lhs) || contains_register(arena, *rhs),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn arena_with(exprs: Vec<Expr>) -> (Arena<Expr>, Vec<ExprId>) {
        let mut arena = Arena::new();
        let ids = exprs.into_iter().map(|e| arena.alloc(e)).collect();
        (arena, ids)
    }

    #[test]
    fn equ_chain_resolves_through_symbols() {
        let mut arena: Arena<Expr> = Arena::new();
        let five = arena.alloc(Expr::Number(5));
        let mut map = HashMap::new();
        map.insert("C".to_string(), resolve(&arena, five, &HashMap::new()));
        let b = arena.alloc(Expr::Symbol("C".to_string()));
        map.insert("B".to_string(), resolve(&arena, b, &map));
        let a = arena.alloc(Expr::Symbol("B".to_string()));
        assert_eq!(resolve(&arena, a, &map), 5);
    }

    #[test]
    fn literal_single_char_resolves_single_char_multi_is_dependent() {
        let (arena, ids) = arena_with(vec![
            Expr::Literal("A".to_string()),
            Expr::Literal("Hi".to_string()),
        ]);
        assert_eq!(resolve(&arena, ids[0], &HashMap::new()), b'A' as i64);
        assert!(!is_dependent(&arena, ids[0]));
        assert!(is_dependent(&arena, ids[1]));
    }

    #[test]
    fn memory_base_registers_follow_plus_and_unary_minus() {
        let mut arena: Arena<Expr> = Arena::new();
        let bx = arena.alloc(Expr::Register(RegisterId::Bx));
        let si = arena.alloc(Expr::Register(RegisterId::Si));
        let sum = arena.alloc(Expr::Binary(BinaryOp::Add, bx, si));
        let four = arena.alloc(Expr::Number(4));
        let full = arena.alloc(Expr::Binary(BinaryOp::Add, sum, four));
        let regs = memory_base_registers(&arena, full).unwrap();
        assert_eq!(regs, vec![RegisterId::Bx, RegisterId::Si]);
    }

    #[test]
    fn register_under_multiplication_is_rejected() {
        let mut arena: Arena<Expr> = Arena::new();
        let bx = arena.alloc(Expr::Register(RegisterId::Bx));
        let two = arena.alloc(Expr::Number(2));
        let bad = arena.alloc(Expr::Binary(BinaryOp::Mul, bx, two));
        assert!(memory_base_registers(&arena, bad).is_none());
    }
}
