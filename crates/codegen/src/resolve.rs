//! Code-generation-time expression resolution (`SPEC_FULL.md` §4.1).
//!
//! Distinct from the linker's recursive, cycle-bounded constant-chain
//! evaluation (`SPEC_FULL.md` §4.7, implemented in `asm86-linking`): at
//! code-gen time a name is either already in the symbol table and
//! evaluated (a previously seen constant, or a label in the section filled
//! so far), or it isn't, full stop. There is no recursion through the
//! symbol table's own entries here — each entry is a flat `i64` once
//! evaluated — so no depth bound is needed at this layer.

use std::collections::HashMap;

use asm86_ast::{expr, Ast, ExprId};
use asm86_context::SymbolTable;

/// True iff every free name `expr_id` depends on is currently evaluated.
pub fn resolvable(ast: &Ast, symbols: &SymbolTable, expr_id: ExprId) -> bool {
    let mut deps = Default::default();
    expr::dependencies(&ast.exprs, expr_id, &mut deps);
    deps.iter().all(|name| {
        symbols
            .get_symbol(name)
            .map(|s| s.is_evaluated())
            .unwrap_or(false)
    })
}

/// Resolves `expr_id` against the symbol table's currently evaluated
/// entries, or returns `None` if any dependency (including "not declared
/// at all yet", the common forward-reference case) is still unknown.
pub fn resolve_known(ast: &Ast, symbols: &SymbolTable, expr_id: ExprId) -> Option<i64> {
    if !resolvable(ast, symbols, expr_id) {
        return None;
    }
    let mut deps = Default::default();
    expr::dependencies(&ast.exprs, expr_id, &mut deps);
    let mut map: HashMap<String, i64> = HashMap::new();
    for name in deps {
        let value = symbols.get_symbol(&name).ok()?.value()?.as_int();
        map.insert(name, value);
    }
    Some(expr::resolve(&ast.exprs, expr_id, &map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use asm86_context::{Symbol, SymbolValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_forward_reference_is_unresolved_not_an_error() {
        let mut ast = Ast::new();
        let sym = ast.sym("LATER");
        let table = SymbolTable::new();
        assert_eq!(resolve_known(&ast, &table, sym), None);
    }

    #[test]
    fn known_symbol_resolves_directly() {
        let mut ast = Ast::new();
        let sym = ast.sym("FIVE");
        let mut table = SymbolTable::new();
        table.add_symbol(Symbol::new("FIVE"));
        table
            .evaluate_symbol("FIVE", SymbolValue::literal(5))
            .unwrap();
        assert_eq!(resolve_known(&ast, &table, sym), Some(5));
    }

    #[test]
    fn register_node_contributes_zero_letting_displacement_fold_out() {
        let mut ast = Ast::new();
        let bx = ast.reg(asm86_types::RegisterId::Bx);
        let four = ast.num(4);
        let body = ast.binary(asm86_ast::BinaryOp::Add, bx, four);
        let table = SymbolTable::new();
        assert_eq!(resolve_known(&ast, &table, body), Some(4));
    }
}
