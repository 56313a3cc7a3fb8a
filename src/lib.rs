//! toyccomp: a single-pass compiler for a small C-like language,
//! emitting x86-64 assembly in Intel syntax for NASM.
//!
//! The pipeline is scanner → recursive-descent parser (with embedded
//! semantic analysis) → code generator. [`compile`] runs all of it on
//! source text and returns the assembly.

pub mod asm;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod types;

use log::{debug, info};

pub use self::error::CompileError;

use self::{compiler::Compiler, lexer::Lexer, parser::Parser, symbols::SymbolTable};

/// Compile a source text to assembly.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = Lexer::new(source).lex()?;
    debug!("scanned {} token(s): {tokens:?}", tokens.len());

    let mut symbols = SymbolTable::with_builtins();
    let program = Parser::new(tokens, &mut symbols).parse_program()?;
    info!("parsed {} top-level declaration(s)", program.len());

    let assembly = Compiler::new(&symbols).compile(&program)?;
    Ok(assembly)
}
