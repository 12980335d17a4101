//! Grounded on `original_source/src/context/symbol-table.h`.

use std::collections::HashMap;

use crate::error::ContextError;
use crate::symbol::{Symbol, SymbolValue};

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.name.clone(), symbol);
    }

    pub fn evaluate_symbol(
        &mut self,
        name: &str,
        value: SymbolValue,
    ) -> Result<(), ContextError> {
        self.symbols
            .get_mut(name)
            .ok_or_else(|| ContextError::UnknownSymbol(name.to_string()))?
            .evaluate(value);
        Ok(())
    }

    pub fn symbols(&self) -> &HashMap<String, Symbol> {
        &self.symbols
    }

    pub fn get_symbol(&self, name: &str) -> Result<&Symbol, ContextError> {
        self.symbols
            .get(name)
            .ok_or_else(|| ContextError::UnknownSymbol(name.to_string()))
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn evaluate_unknown_symbol_is_an_error() {
        let mut table = SymbolTable::new();
        let err = table
            .evaluate_symbol("MISSING", SymbolValue::literal(1))
            .unwrap_err();
        assert_eq!(err, ContextError::UnknownSymbol("MISSING".to_string()));
    }

    #[test]
    fn add_then_evaluate_then_lookup_round_trips() {
        let mut table = SymbolTable::new();
        table.add_symbol(Symbol::new("START"));
        assert!(!table.get_symbol("START").unwrap().is_evaluated());
        table
            .evaluate_symbol("START", SymbolValue::address(0x100))
            .unwrap();
        assert_eq!(table.get_symbol("START").unwrap().value().unwrap().as_int(), 0x100);
    }
}
