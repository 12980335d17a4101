//! Arena-owned AST surface (`SPEC_FULL.md` §3, §4.10).
//!
//! This crate owns the node types and the `Ast` builder; it does not itself
//! turn source text into nodes — that is the job of a lexer/parser
//! collaborator (`SPEC_FULL.md` §4.10, §5/§6 "informative" notes) that
//! calls into the builder methods below one token/production at a time, the
//! way a hand-written recursive-descent parser would.

pub mod arena;
pub mod error;
pub mod expr;
pub mod item;

pub use arena::{Arena, Id};
pub use error::AstError;
pub use expr::{BinaryOp, Expr, ExprId, MemoryExpr, UnaryOp};
pub use item::{
    AlignItem, ConstantItem, DataUnitSize, DefineDataItem, ExternItem, GlobalItem,
    InstructionItem, Item, ItemId, LabelItem, OffsetItem, OrgItem, ReserveItem, SectionItem,
    StackItem,
};

use asm86_types::{RegisterId, SegReg};

/// Owns every expression and item node reachable from `program`, plus the
/// top-level ordering in which items appeared in source.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    pub exprs: Arena<Expr>,
    pub items: Arena<Item>,
    pub program: Vec<ItemId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    // --- expression builders -------------------------------------------

    pub fn num(&mut self, value: i64) -> ExprId {
        self.exprs.alloc(Expr::Number(value))
    }

    pub fn literal(&mut self, value: impl Into<String>) -> ExprId {
        self.exprs.alloc(Expr::Literal(value.into()))
    }

    pub fn sym(&mut self, name: impl Into<String>) -> ExprId {
        self.exprs.alloc(Expr::Symbol(name.into()))
    }

    pub fn reg(&mut self, register: RegisterId) -> ExprId {
        self.exprs.alloc(Expr::Register(register))
    }

    pub fn paren(&mut self, inner: ExprId) -> ExprId {
        self.exprs.alloc(Expr::Paren(inner))
    }

    pub fn mem(&mut self, body: ExprId, size_override: u8, seg_override: Option<SegReg>) -> ExprId {
        self.exprs.alloc(Expr::Memory(MemoryExpr {
            body,
            size_override,
            seg_override,
        }))
    }

    pub fn unary(&mut self, op: UnaryOp, inner: ExprId) -> ExprId {
        self.exprs.alloc(Expr::Unary(op, inner))
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.exprs.alloc(Expr::Binary(op, lhs, rhs))
    }

    pub fn dup(&mut self, count: ExprId, value: ExprId) -> ExprId {
        self.exprs.alloc(Expr::Duplicate { count, value })
    }

    /// Fallible lookup for callers (e.g. a collaborator holding handles
    /// across an `Ast` swap) that cannot guarantee the handle is still
    /// valid against this arena.
    pub fn try_expr(&self, id: ExprId) -> Result<&Expr, AstError> {
        self.exprs.try_get(id).ok_or(AstError::ExprOutOfBounds {
            index: id.index(),
            len: self.exprs.len(),
        })
    }

    pub fn try_item(&self, id: ItemId) -> Result<&Item, AstError> {
        self.items.try_get(id).ok_or(AstError::ItemOutOfBounds {
            index: id.index(),
            len: self.items.len(),
        })
    }

    // --- item builders ---------------------------------------------------
    //
    // Each `push_*` allocates the item node and appends it to `program` in
    // one step, mirroring the source parser's "parse one statement, emit
    // one node into the translation unit" loop — there is no detached
    // "build a node but don't place it" path, since every item the grammar
    // accepts is top-level.

    fn push(&mut self, item: Item) -> ItemId {
        let id = self.items.alloc(item);
        self.program.push(id);
        id
    }

    pub fn push_section(&mut self, name: impl Into<String>) -> ItemId {
        self.push(Item::Section(SectionItem { name: name.into() }))
    }

    pub fn push_label(&mut self, name: impl Into<String>) -> ItemId {
        self.push(Item::Label(LabelItem { name: name.into() }))
    }

    pub fn push_constant(&mut self, name: impl Into<String>, value: ExprId) -> ItemId {
        self.push(Item::Constant(ConstantItem {
            name: name.into(),
            value,
        }))
    }

    pub fn push_instruction(&mut self, mnemonic: impl Into<String>, operands: Vec<ExprId>) -> ItemId {
        self.push(Item::Instruction(InstructionItem {
            mnemonic: mnemonic.into(),
            operands,
        }))
    }

    pub fn push_define_data(&mut self, unit_size: DataUnitSize, values: Vec<ExprId>) -> ItemId {
        self.push(Item::DefineData(DefineDataItem { unit_size, values }))
    }

    pub fn push_reserve(&mut self, unit_size: DataUnitSize, count: ExprId) -> ItemId {
        self.push(Item::Reserve(ReserveItem { unit_size, count }))
    }

    pub fn push_align(&mut self, boundary: ExprId) -> ItemId {
        self.push(Item::Align(AlignItem { boundary }))
    }

    pub fn push_offset(&mut self, value: ExprId) -> ItemId {
        self.push(Item::Offset(OffsetItem { value }))
    }

    pub fn push_org(&mut self, address: ExprId) -> ItemId {
        self.push(Item::Org(OrgItem { address }))
    }

    pub fn push_stack(&mut self, size: ExprId) -> ItemId {
        self.push(Item::Stack(StackItem { size }))
    }

    pub fn push_global(&mut self, name: impl Into<String>) -> ItemId {
        self.push(Item::Global(GlobalItem { name: name.into() }))
    }

    pub fn push_extern(&mut self, name: impl Into<String>) -> ItemId {
        self.push(Item::Extern(ExternItem { name: name.into() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_assembles_a_small_program_in_order() {
        let mut ast = Ast::new();
        ast.push_section(".TEXT");
        let five = ast.num(5);
        ast.push_constant("FIVE", five);
        ast.push_label("START");
        let ax = ast.reg(RegisterId::Ax);
        let five_again = ast.sym("FIVE");
        ast.push_instruction("MOV", vec![ax, five_again]);

        assert_eq!(ast.program.len(), 4);
        assert!(matches!(ast.items.get(ast.program[0]), Item::Section(_)));
        assert!(matches!(ast.items.get(ast.program[3]), Item::Instruction(_)));
    }

    #[test]
    fn stale_handle_reports_out_of_bounds_instead_of_panicking() {
        let mut ast = Ast::new();
        let id = ast.num(1);
        let fresh = Ast::new();
        assert!(matches!(
            fresh.try_expr(id),
            Err(AstError::ExprOutOfBounds { index: 0, len: 0 })
        ));
        assert!(ast.try_expr(id).is_ok());
    }

    #[test]
    fn constant_value_resolves_through_expr_module() {
        let mut ast = Ast::new();
        let expr_id = ast.num(42);
        ast.push_constant("ANSWER", expr_id);
        let value = expr::resolve(&ast.exprs, expr_id, &Default::default());
        assert_eq!(value, 42);
    }
}
