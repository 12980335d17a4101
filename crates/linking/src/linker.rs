//! Symbol evaluation and fix-up application — the linker's core pass
//! (`SPEC_FULL.md` §4.7, §4.8), grounded on
//! `original_source/src/linking/linker.cpp`'s `EvaluateSymbol`/`LinkRawBinary`.

use std::collections::{HashMap, HashSet};

use asm86_ast::{expr, Ast};
use asm86_codegen::{CodeGenerator, FixupKind};
use asm86_context::SymbolValueKind;

use crate::assembled_object::AssembledObject;
use crate::error::LinkingError;
use crate::format::LinkingFormat;
use crate::mz::{DosExecutable, Relocation};
use crate::ordering::order_sections;
use crate::raw_binary::RawBinary;

const MAX_EVAL_DEPTH: usize = 1000;

const DEPTH_EXCEEDED_MESSAGE: &str =
    "Unable to evaluate all symbols, two symbols points to each other or recursive evaluating take too much passes";

/// Links one already code-generated translation unit into a final artifact.
///
/// `generator` must not have any diagnostics errors recorded yet (code-gen
/// failures are reported before linking is even attempted, mirroring the
/// source's `ProccessAST` gate before calling into `Linker::Link`).
pub fn link(
    ast: &Ast,
    generator: &mut CodeGenerator,
    format: LinkingFormat,
) -> Result<Box<dyn AssembledObject>, LinkingError> {
    if generator.diagnostics.has_errors() {
        return Err(LinkingError::PendingErrors(generator.diagnostics.error_count()));
    }

    match format {
        LinkingFormat::RawBinary => link_raw_binary(ast, generator).map(|b| Box::new(b) as Box<dyn AssembledObject>),
        LinkingFormat::DosExecutable => link_dos_executable(ast, generator).map(|b| Box::new(b) as Box<dyn AssembledObject>),
        other => Err(LinkingError::UnsupportedFormat(other)),
    }
}

fn link_raw_binary(ast: &Ast, generator: &mut CodeGenerator) -> Result<RawBinary, LinkingError> {
    if generator.unit.stack_size.is_some() {
        generator
            .diagnostics
            .warn("STACK directive is ignored for raw-binary targets".to_string());
    }

    let (mut ordered, synthetic) = order_sections(&generator.unit, &generator.section_declaration_order);
    let symbol_map = evaluate_symbols(ast, generator, &ordered, &synthetic, true);
    apply_fixups(ast, generator, &mut ordered, &symbol_map, LinkingFormat::RawBinary);

    let error_count = generator.diagnostics.error_count();
    if error_count > 0 {
        return Err(LinkingError::LinkFailed(error_count));
    }

    let mut code = Vec::new();
    for section in &ordered {
        if code.len() < section.base_offset {
            code.resize(section.base_offset, 0);
        }
        code.extend_from_slice(&section.code);
    }
    Ok(RawBinary { code })
}

fn link_dos_executable(ast: &Ast, generator: &mut CodeGenerator) -> Result<DosExecutable, LinkingError> {
    if generator.unit.stack_size.is_none() || generator.unit.stack_size == Some(0) {
        generator
            .diagnostics
            .warn("no STACK size given for an MZ target".to_string());
    }

    let (mut ordered, synthetic) = order_sections(&generator.unit, &generator.section_declaration_order);
    let symbol_map = evaluate_symbols(ast, generator, &ordered, &synthetic, false);
    let relocations = apply_fixups(ast, generator, &mut ordered, &symbol_map, LinkingFormat::DosExecutable);

    let error_count = generator.diagnostics.error_count();
    if error_count > 0 {
        return Err(LinkingError::LinkFailed(error_count));
    }

    let mut image = Vec::new();
    for section in &ordered {
        if image.len() < section.base_offset {
            image.resize(section.base_offset, 0);
        }
        image.extend_from_slice(&section.code);
    }

    Ok(DosExecutable {
        image,
        relocations,
        stack_size: generator.unit.stack_size,
    })
}

/// Binds every constant and label to a flat `i64` in the global map
/// (`SPEC_FULL.md` §4.7). `absolute_labels` selects raw-binary semantics
/// (origin + section base added) versus MZ semantics (section-relative
/// only).
fn evaluate_symbols(
    ast: &Ast,
    generator: &mut CodeGenerator,
    ordered: &[crate::ordering::OrderedSection],
    synthetic: &HashMap<String, i64>,
    absolute_labels: bool,
) -> HashMap<String, i64> {
    let mut symbol_map = synthetic.clone();

    let mut section_bases: HashMap<&str, i64> = HashMap::new();
    for section in ordered {
        section_bases.insert(section.name.as_str(), section.base_offset as i64);
    }

    for (name, symbol) in generator.symbols.symbols() {
        if let Some(value) = symbol.value() {
            if value.is(SymbolValueKind::Literal) {
                symbol_map.insert(name.clone(), value.as_int());
            }
        }
    }

    let unresolved: Vec<String> = generator.unresolved_constants.keys().cloned().collect();
    let mut resolving = HashSet::new();
    for name in unresolved {
        evaluate_constant(ast, generator, &name, &mut symbol_map, &mut resolving, 0);
    }

    let origin = generator.unit.origin.unwrap_or(0);
    let label_names: Vec<String> = generator.symbols.symbols().keys().cloned().collect();
    for name in label_names {
        let symbol = generator.symbols.get_symbol(&name).unwrap();
        let Some(value) = symbol.value() else { continue };
        if !value.is(SymbolValueKind::Address) {
            continue;
        }
        let offset = value.as_int();
        let resolved = if absolute_labels {
            let base = generator
                .label_sections
                .get(&name)
                .and_then(|section| section_bases.get(section.as_str()))
                .copied()
                .unwrap_or(0);
            offset + origin + base
        } else {
            offset
        };
        symbol_map.insert(name, resolved);
    }

    symbol_map
}

/// Recursively resolves a constant's dependency chain
/// (`original_source/src/linking/linker.cpp`'s `EvaluateSymbol` for
/// `ConstantDecl`), bounded at `MAX_EVAL_DEPTH` and guarded against direct
/// cycles via `resolving`.
fn evaluate_constant(
    ast: &Ast,
    generator: &mut CodeGenerator,
    name: &str,
    symbol_map: &mut HashMap<String, i64>,
    resolving: &mut HashSet<String>,
    depth: usize,
) -> Option<i64> {
    if let Some(value) = symbol_map.get(name) {
        return Some(*value);
    }
    let expr_id = *generator.unresolved_constants.get(name)?;
    if depth > MAX_EVAL_DEPTH || !resolving.insert(name.to_string()) {
        generator.diagnostics.error(DEPTH_EXCEEDED_MESSAGE.to_string());
        return None;
    }

    let mut deps = HashSet::new();
    expr::dependencies(&ast.exprs, expr_id, &mut deps);
    for dep in deps {
        if !symbol_map.contains_key(&dep) && generator.unresolved_constants.contains_key(&dep) {
            evaluate_constant(ast, generator, &dep, symbol_map, resolving, depth + 1);
        }
    }

    resolving.remove(name);
    let value = expr::resolve(&ast.exprs, expr_id, &*symbol_map);
    symbol_map.insert(name.to_string(), value);
    Some(value)
}

/// Patches every recorded fix-up into its section's bytes
/// (`SPEC_FULL.md` §4.8), returning the MZ relocation records produced along
/// the way (empty for a raw-binary target).
fn apply_fixups(
    ast: &Ast,
    generator: &mut CodeGenerator,
    ordered: &mut [crate::ordering::OrderedSection],
    symbol_map: &HashMap<String, i64>,
    format: LinkingFormat,
) -> Vec<Relocation> {
    let origin = generator.unit.origin.unwrap_or(0);
    let mut relocations = Vec::new();

    for section in ordered.iter_mut() {
        let Some(fixups) = generator.fixups.get(&section.name) else { continue };
        for fixup in fixups {
            let mut deps = HashSet::new();
            expr::dependencies(&ast.exprs, fixup.expr, &mut deps);

            let mut missing = false;
            for dep in &deps {
                if !symbol_map.contains_key(dep) {
                    generator
                        .diagnostics
                        .error(format!("Undefined symbol: '{dep}'"));
                    missing = true;
                }
            }
            if missing {
                continue;
            }

            if format == LinkingFormat::DosExecutable && deps.iter().any(|dep| dep.starts_with('@')) {
                relocations.push(Relocation {
                    offset: (section.base_offset + fixup.byte_offset) as u16,
                    segment: 0,
                });
            }

            let mut value = expr::resolve(&ast.exprs, fixup.expr, symbol_map);
            if fixup.kind == FixupKind::RelativeAddress {
                let relative_origin_base = match format {
                    LinkingFormat::RawBinary => origin,
                    _ => 0,
                };
                value -= relative_origin_base + fixup.relative_origin as i64 + section.base_offset as i64;
            }

            let limit = 256i64.saturating_pow(fixup.size as u32);
            if value > limit || value < -limit {
                generator
                    .diagnostics
                    .error("Value overflow while linking".to_string());
                continue;
            }
            let half = limit / 2;
            if value < -half || value > half - 1 {
                generator
                    .diagnostics
                    .warn("Signed value may be corrupted".to_string());
            }

            let bytes = value.to_le_bytes();
            let start = fixup.byte_offset;
            let end = start + fixup.size as usize;
            section.code[start..end].copy_from_slice(&bytes[..fixup.size as usize]);
        }
    }

    relocations
}

#[cfg(test)]
mod tests {
    use super::*;
    use asm86_ast::Ast as TestAst;
    use asm86_types::RegisterId;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_org_section_data_scenario_produces_the_expected_prefix() {
        let mut ast = TestAst::new();
        let origin = ast.num(0x100);
        ast.push_org(origin);
        ast.push_section(".TEXT");
        ast.push_label("start");
        let ax = ast.reg(RegisterId::Ax);
        let msg = ast.sym("msg");
        ast.push_instruction("MOV", vec![ax, msg]);
        let int_num = ast.num(0x20);
        ast.push_instruction("INT", vec![int_num]);

        ast.push_section(".DATA");
        ast.push_label("msg");
        let hi = ast.literal("Hi");
        let zero = ast.num(0);
        ast.push_define_data(asm86_ast::DataUnitSize::Byte, vec![hi, zero]);

        let mut generator = asm86_codegen::CodeGenerator::new(&ast);
        generator.run();
        assert!(!generator.diagnostics.has_errors());

        let artifact = link(&ast, &mut generator, LinkingFormat::RawBinary).unwrap();
        let bytes = artifact.serialize();
        assert_eq!(&bytes[0..3], &[0xb8, 0x10, 0x01]);
    }
}
