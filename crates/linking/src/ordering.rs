//! Section ordering and paragraph layout (`SPEC_FULL.md` §4.6).
//!
//! The `original_source/src/linking/linker.cpp` snapshot this crate is
//! otherwise grounded on does not implement priority ordering at all — it
//! walks the translation unit's section map in whatever order the map
//! happens to store it (`SPEC_FULL.md` §9 Open Question #5) — so this is
//! built directly from the spec's prose instead of ported from source.

use asm86_context::{Section, TranslationUnit};

const PARAGRAPH: usize = 16;

fn section_priority(name: &str) -> u32 {
    match name.to_ascii_uppercase().as_str() {
        ".TEXT" | "TEXT" | ".CODE" | "CODE" => 2,
        ".DATA" | "DATA" | ".BSS" | "BSS" => 1,
        ".STACK" | "STACK" => 0,
        _ => 0,
    }
}

/// One section's place in the final, linearized image: its name, its bytes
/// (not yet patched by fix-ups), and its paragraph-aligned base offset in
/// bytes from the start of the image.
pub struct OrderedSection {
    pub name: String,
    pub code: Vec<u8>,
    pub base_offset: usize,
}

fn pad_to_paragraph(len: usize) -> usize {
    let remainder = len % PARAGRAPH;
    if remainder == 0 {
        len
    } else {
        len + (PARAGRAPH - remainder)
    }
}

/// Orders non-empty sections by descending priority (ties broken by first
/// declaration order), pads every section but the last to a 16-byte
/// paragraph boundary, and assigns each a cumulative base offset.
///
/// Returns the ordered sections plus a `@<name> -> base paragraph` map for
/// the synthetic section-base symbols (`SPEC_FULL.md` §4.6, §6).
pub fn order_sections(
    unit: &TranslationUnit,
    declaration_order: &[String],
) -> (Vec<OrderedSection>, std::collections::HashMap<String, i64>) {
    let mut names: Vec<&String> = declaration_order
        .iter()
        .filter(|name| {
            unit.get_section(name)
                .map(|s| !s.is_empty())
                .unwrap_or(false)
        })
        .collect();

    // Any section present in the unit but missing from `declaration_order`
    // (shouldn't happen given how `CodeGenerator` populates both, but keep
    // the sort total rather than silently dropping it).
    for name in unit.sections().keys() {
        if !names.iter().any(|n| n.as_str() == name.as_str()) {
            let section: &Section = unit.get_section(name).unwrap();
            if !section.is_empty() {
                names.push(name);
            }
        }
    }

    names.sort_by(|a, b| section_priority(b).cmp(&section_priority(a)));

    let mut ordered = Vec::with_capacity(names.len());
    let mut bases = std::collections::HashMap::new();
    let mut cursor = 0usize;

    let count = names.len();
    for (i, name) in names.into_iter().enumerate() {
        let section = unit.get_section(name).unwrap();
        bases.insert(format!("@{name}"), (cursor / PARAGRAPH) as i64);
        ordered.push(OrderedSection {
            name: (*name).clone(),
            code: section.code().to_vec(),
            base_offset: cursor,
        });
        cursor += section.code().len();
        if i + 1 < count {
            cursor = pad_to_paragraph(cursor);
        }
    }

    (ordered, bases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn priority_sorts_text_before_data_before_stack() {
        let mut unit = TranslationUnit::new();
        unit.get_or_make_section(".STACK").push_bytes(&[0; 4]);
        unit.get_or_make_section(".DATA").push_bytes(&[1; 4]);
        unit.get_or_make_section(".TEXT").push_bytes(&[2; 4]);
        let order = vec![
            ".STACK".to_string(),
            ".DATA".to_string(),
            ".TEXT".to_string(),
        ];
        let (sections, _) = order_sections(&unit, &order);
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![".TEXT", ".DATA", ".STACK"]);
    }

    #[test]
    fn empty_sections_are_dropped() {
        let mut unit = TranslationUnit::new();
        unit.get_or_make_section(".TEXT").push_bytes(&[1]);
        unit.get_or_make_section(".BSS");
        let order = vec![".TEXT".to_string(), ".BSS".to_string()];
        let (sections, _) = order_sections(&unit, &order);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, ".TEXT");
    }

    #[test]
    fn non_last_sections_are_paragraph_padded() {
        let mut unit = TranslationUnit::new();
        unit.get_or_make_section(".TEXT").push_bytes(&[1; 3]);
        unit.get_or_make_section(".DATA").push_bytes(&[2; 5]);
        let order = vec![".TEXT".to_string(), ".DATA".to_string()];
        let (sections, bases) = order_sections(&unit, &order);
        assert_eq!(sections[0].base_offset, 0);
        assert_eq!(sections[1].base_offset, 16);
        assert_eq!(bases["@.TEXT"], 0);
        assert_eq!(bases["@.DATA"], 1);
    }
}
