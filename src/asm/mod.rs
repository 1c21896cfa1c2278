//! # Assembler
//!
//! A two-pass symbol resolver over one stream: predefined symbols, user
//! labels, runtime variable allocation (C9), and bit-level encoding of
//! instructions (C8), driven line-wise (C10).

pub mod driver;
pub mod error;
pub mod instruction;
pub mod symbols;

use error::AsmError;

/// Assemble one `.asm` source text into `.hack` binary text.
pub fn assemble(source: &str) -> Result<String, AsmError> {
    driver::assemble(source)
}
