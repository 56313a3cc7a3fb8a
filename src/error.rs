//! The umbrella error of the compile pipeline. Every component reports
//! its own error type with a component tag; this enum lets the driver
//! compose them with `?` and print a single diagnostic line.

use std::{error::Error, fmt::Display};

use crate::{
    compiler::CodegenError, lexer::LexError, parser::ParseError, symbols::SymbolError,
    types::TypeError,
};

#[derive(Debug)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Type(TypeError),
    Symbol(SymbolError),
    Codegen(CodegenError),
    /// Input could not be read. Reported under the scanner's tag.
    Input(String),
    /// Output could not be written. Reported under the writer's tag.
    Output(String),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex(e) => e.fmt(f),
            CompileError::Parse(e) => e.fmt(f),
            CompileError::Type(e) => e.fmt(f),
            CompileError::Symbol(e) => e.fmt(f),
            CompileError::Codegen(e) => e.fmt(f),
            CompileError::Input(message) => write!(f, "[SCANNER] {message}"),
            CompileError::Output(message) => write!(f, "[ASM] {message}"),
        }
    }
}

impl Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(value: LexError) -> Self {
        CompileError::Lex(value)
    }
}

impl From<ParseError> for CompileError {
    fn from(value: ParseError) -> Self {
        CompileError::Parse(value)
    }
}

impl From<TypeError> for CompileError {
    fn from(value: TypeError) -> Self {
        CompileError::Type(value)
    }
}

impl From<SymbolError> for CompileError {
    fn from(value: SymbolError) -> Self {
        CompileError::Symbol(value)
    }
}

impl From<CodegenError> for CompileError {
    fn from(value: CodegenError) -> Self {
        CompileError::Codegen(value)
    }
}
