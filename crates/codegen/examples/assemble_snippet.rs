//! Assembles a handful of instructions by hand through the AST builder and
//! prints the resulting machine code, the way a reader would sanity-check
//! the encoder against a disassembly without going through a lexer/parser.

use asm86_codegen::CodeGenerator;
use asm86_ast::Ast;
use asm86_types::RegisterId;

fn main() {
    let mut ast = Ast::new();
    ast.push_section(".TEXT");

    let ax = ast.reg(RegisterId::Ax);
    let imm = ast.num(0x1234);
    ast.push_instruction("MOV", vec![ax, imm]);

    let ax2 = ast.reg(RegisterId::Ax);
    let one = ast.num(1);
    ast.push_instruction("ADD", vec![ax2, one]);

    let mut generator = CodeGenerator::new(&ast);
    generator.run();

    if generator.diagnostics.has_errors() {
        for message in generator.diagnostics.iter() {
            eprintln!("{message}");
        }
        std::process::exit(1);
    }

    let code = generator.unit.get_section(".TEXT").unwrap().code();
    let hex: Vec<String> = code.iter().map(|b| format!("{b:02x}")).collect();
    println!("{}", hex.join(" "));
}
