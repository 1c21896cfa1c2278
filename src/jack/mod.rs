//! # HLL front end
//!
//! Tokenizes and parses one class's source text into an AST, resolves
//! names against a two-scope symbol table, and emits stack-VM commands.
//!
//! The public entry point is [`compile_class`], which takes one class's
//! full source text and returns the VM text for that class.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symtab;
pub mod token;
pub mod vmwriter;

use error::JackError;

/// Compile one class's HLL source text into VM command text.
pub fn compile_class(source: &str) -> Result<String, JackError> {
    let class = parser::Parser::new(source)?.parse_class()?;
    codegen::CodeGenerator::new().compile_class(&class)
}
