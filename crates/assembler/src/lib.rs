//! Top-level facade that drives code generation then linking
//! (`SPEC_FULL.md` §2, mirrors `original_source/src/codegen/code-generator.cpp`'s
//! `ProccessAST` plus a `Linker::Link` call).
//!
//! This is the only crate a would-be lexer/parser collaborator (§4.10, out
//! of scope here) needs to depend on: build an `asm86_ast::Ast` with its
//! builder surface, call [`assemble`], and either write the returned bytes
//! to a file or render the returned diagnostics.

pub mod error;

pub use error::AssembleError;

use asm86_ast::Ast;
use asm86_codegen::CodeGenerator;
use asm86_context::Diagnostics;
pub use asm86_linking::LinkingFormat;

pub const ASSEMBLER_MAJOR_VERSION: u16 = 0;
pub const ASSEMBLER_MINOR_VERSION: u16 = 1;
pub const ASSEMBLER_PATCH_VERSION: u16 = 0;

/// A finished artifact plus whatever informational/warning messages were
/// collected along the way (errors, if any, surface as `Err` instead).
#[derive(Debug)]
pub struct AssembleOutput {
    pub bytes: Vec<u8>,
    pub diagnostics: Diagnostics,
}

/// Runs the full pipeline — code generation, then linking into `format` —
/// over an already-built AST.
///
/// Per `SPEC_FULL.md` §7's phase-boundary policy, code generation's error
/// count is checked before linking is even attempted; linking applies the
/// same check internally (`asm86_linking::LinkingError::LinkFailed`).
pub fn assemble(ast: &Ast, format: LinkingFormat) -> Result<AssembleOutput, AssembleError> {
    let mut generator = CodeGenerator::new(ast);
    generator.run();

    if generator.diagnostics.has_errors() {
        return Err(AssembleError::CodeGenFailed(generator.diagnostics.error_count()));
    }

    let artifact = asm86_linking::link(ast, &mut generator, format)?;
    let bytes = artifact.serialize();

    Ok(AssembleOutput {
        bytes,
        diagnostics: generator.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use asm86_types::RegisterId;
    use pretty_assertions::assert_eq;

    #[test]
    fn assembles_a_minimal_program_to_raw_binary() {
        let mut ast = Ast::new();
        ast.push_section(".TEXT");
        let ax = ast.reg(RegisterId::Ax);
        let five = ast.num(5);
        ast.push_instruction("MOV", vec![ax, five]);

        let output = assemble(&ast, LinkingFormat::RawBinary).unwrap();
        assert_eq!(output.bytes, vec![0xb8, 0x05, 0x00]);
        assert!(!output.diagnostics.has_errors());
    }

    #[test]
    fn unknown_mnemonic_fails_before_linking_is_attempted() {
        let mut ast = Ast::new();
        ast.push_section(".TEXT");
        ast.push_instruction("BOGUS", vec![]);

        let err = assemble(&ast, LinkingFormat::RawBinary).unwrap_err();
        assert!(matches!(err, AssembleError::CodeGenFailed(1)));
    }

    #[test]
    fn undefined_symbol_fails_at_the_linking_phase() {
        let mut ast = Ast::new();
        ast.push_section(".TEXT");
        let ax = ast.reg(RegisterId::Ax);
        let missing = ast.sym("NOWHERE");
        ast.push_instruction("MOV", vec![ax, missing]);

        let err = assemble(&ast, LinkingFormat::RawBinary).unwrap_err();
        assert!(matches!(err, AssembleError::Linking(_)));
    }

    #[test]
    fn object_format_is_catalogued_but_unsupported() {
        let mut ast = Ast::new();
        ast.push_section(".TEXT");

        let err = assemble(&ast, LinkingFormat::Elf).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Linking(asm86_linking::LinkingError::UnsupportedFormat(_))
        ));
    }
}
