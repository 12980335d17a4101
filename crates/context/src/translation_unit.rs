//! Grounded on `original_source/src/context/translation-unit.h`.
//!
//! Adds `origin` and `stack_size`, absent from the source's
//! `TranslationUnit`: `SPEC_FULL.md` §9 Open Question #4 decides that the
//! `ORG`/`STACK` directives attach to the translation unit as a whole
//! (there is exactly one of each legal per assembled program) rather than
//! to whichever section happens to contain the directive.

use std::collections::HashMap;

use crate::section::Section;

#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    sections: HashMap<String, Section>,
    pub origin: Option<i64>,
    pub stack_size: Option<u32>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &HashMap<String, Section> {
        &self.sections
    }

    pub fn get_or_make_section(&mut self, name: &str) -> &mut Section {
        self.sections
            .entry(name.to_string())
            .or_insert_with(|| Section::new(name))
    }

    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_or_make_section_creates_once_and_reuses_after() {
        let mut tu = TranslationUnit::new();
        tu.get_or_make_section(".TEXT").push_byte(0x90);
        tu.get_or_make_section(".TEXT").push_byte(0x90);
        assert_eq!(tu.get_section(".TEXT").unwrap().code(), &[0x90, 0x90]);
        assert_eq!(tu.sections().len(), 1);
    }

    #[test]
    fn origin_and_stack_size_default_to_unset() {
        let tu = TranslationUnit::new();
        assert_eq!(tu.origin, None);
        assert_eq!(tu.stack_size, None);
    }
}
