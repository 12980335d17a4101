//! Top-level and statement-level AST nodes (`SPEC_FULL.md` §3 "Item"),
//! grounded on `original_source/src/syntax/declarations.h` and
//! `original_source/src/syntax/statements.h`.
//!
//! The source splits these across a `Declaration` hierarchy (section,
//! label, constant, global/extern) and a `Statement` hierarchy
//! (instruction, define-data, reserve, align, offset, org, stack); both are
//! flattened into one `Item` enum here since both ultimately occupy the
//! same ordered `program` list and the redesign already collapses
//! `Is<T>()`/`GetAs<T>()` dynamic dispatch into a single tagged union.

use crate::arena::Id;
use crate::expr::ExprId;

pub type ItemId = Id<Item>;

/// `.TEXT`/`CODE`, `.DATA`, `.BSS`, `.STACK`, or an arbitrary named
/// section; ordering/priority is computed from `name` by the linker
/// (`SPEC_FULL.md` §4.6), not stored here.
#[derive(Debug, Clone)]
pub struct SectionItem {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct LabelItem {
    pub name: String,
}

/// An `EQU`-style named constant. `value` may be dependent (forward
/// reference) — that is legal for constants and is resolved lazily, unlike
/// ordinary label addresses which are known at code-gen time.
#[derive(Debug, Clone)]
pub struct ConstantItem {
    pub name: String,
    pub value: ExprId,
}

#[derive(Debug, Clone)]
pub struct InstructionItem {
    pub mnemonic: String,
    pub operands: Vec<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataUnitSize {
    Byte,
    Word,
    Dword,
}

/// `DB`/`DW`/`DD` — one or more comma-separated values, each either a
/// number (sign- or zero-extended to `unit_size`) or a string literal
/// (emitted byte-for-byte regardless of `unit_size`).
#[derive(Debug, Clone)]
pub struct DefineDataItem {
    pub unit_size: DataUnitSize,
    pub values: Vec<ExprId>,
}

/// `RESB`/`RESW`/`RESD` — reserves `count * unit_size` bytes of
/// uninitialized space; only legal in a `.BSS`-like section.
#[derive(Debug, Clone)]
pub struct ReserveItem {
    pub unit_size: DataUnitSize,
    pub count: ExprId,
}

#[derive(Debug, Clone)]
pub struct AlignItem {
    pub boundary: ExprId,
}

/// `OFFSET` directive: advances the current section's cursor without
/// emitting bytes (used to carve out padding/unions) — distinct from
/// `ReserveItem`'s data-size-qualified form.
#[derive(Debug, Clone)]
pub struct OffsetItem {
    pub value: ExprId,
}

/// `ORG` directive: sets the load address of the section it appears in.
#[derive(Debug, Clone)]
pub struct OrgItem {
    pub address: ExprId,
}

/// `STACK` directive: declares the size of the MZ executable's stack
/// segment (`SPEC_FULL.md` §4.9, Open Question #4).
#[derive(Debug, Clone)]
pub struct StackItem {
    pub size: ExprId,
}

#[derive(Debug, Clone)]
pub struct GlobalItem {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ExternItem {
    pub name: String,
}

#[derive(Debug, Clone)]
pub enum Item {
    Section(SectionItem),
    Label(LabelItem),
    Constant(ConstantItem),
    Instruction(InstructionItem),
    DefineData(DefineDataItem),
    Reserve(ReserveItem),
    Align(AlignItem),
    Offset(OffsetItem),
    Org(OrgItem),
    Stack(StackItem),
    Global(GlobalItem),
    Extern(ExternItem),
}

impl Item {
    /// The symbol name this item binds at code-gen time, if any
    /// (`SPEC_FULL.md` §4.1: labels and constants are the only
    /// name-binding items; `Global`/`Extern` annotate an existing name
    /// rather than binding a new one).
    pub fn binds_name(&self) -> Option<&str> {
        match self {
            Item::Label(l) => Some(&l.name),
            Item::Constant(c) => Some(&c.name),
            _ => None,
        }
    }
}
