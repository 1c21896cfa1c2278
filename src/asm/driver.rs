//! # Assembler Driver (C10)
//!
//! A single line-wise scan implementing both assembler passes: `@`/`(`
//! lines are dispatched as A-instructions or labels as they're seen, and
//! `reference`'s deferred fixups are patched once at the end via
//! [`SymbolManager::resolve_all`] (§4.10).

use crate::asm::error::{AsmError, ErrorKind, Span};
use crate::asm::instruction::encode_c_instruction;
use crate::asm::symbols::SymbolManager;

const MAX_ADDRESS: u32 = 1 << 15;

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

/// Assemble one `.asm` source text into `.hack` binary text: one
/// 16-character `0`/`1` line per ROM word, joined by `\n`.
pub fn assemble(source: &str) -> Result<String, AsmError> {
    let mut symbols = SymbolManager::new();
    let mut commands: Vec<u16> = Vec::new();

    for (i, raw_line) in source.lines().enumerate() {
        let line_number = i + 1;
        let span = Span::new(line_number);
        let stripped = strip_comment(raw_line);
        if stripped.is_empty() {
            continue;
        }

        if let Some(label) = stripped
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            symbols
                .define_label(label, commands.len() as u16, span)
                .map_err(|e| annotate(e, raw_line))?;
            continue;
        }

        let word = if let Some(operand) = stripped.strip_prefix('@') {
            if !operand.is_empty() && operand.chars().all(|c| c.is_ascii_digit()) {
                let value: u32 = operand.parse().map_err(|_| {
                    AsmError::new(
                        ErrorKind::AssemblerError,
                        format!("'{operand}' is not a valid literal"),
                        span,
                        raw_line,
                    )
                })?;
                if value >= MAX_ADDRESS {
                    return Err(AsmError::new(
                        ErrorKind::AssemblerError,
                        format!("literal {value} does not fit in 15 bits"),
                        span,
                        raw_line,
                    ));
                }
                value as u16
            } else {
                symbols
                    .reference(operand, commands.len(), span)
                    .map_err(|e| annotate(e, raw_line))?
            }
        } else {
            encode_c_instruction(stripped, span).map_err(|e| annotate(e, raw_line))?
        };
        commands.push(word);
    }

    symbols.resolve_all(&mut commands);

    Ok(commands
        .iter()
        .map(|word| format!("{word:016b}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn annotate(mut err: AsmError, raw_line: &str) -> AsmError {
    err.source_line = raw_line.to_string();
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_literal_r5() {
        assert_eq!(assemble("@R5").unwrap(), "0000000000000101");
    }

    #[test]
    fn s2_predefined_kbd() {
        assert_eq!(assemble("@KBD").unwrap(), "0110000000000000");
    }

    #[test]
    fn s3_label_resolves_to_rom_index() {
        let source = "M=D\n@END\n0;JMP\n(END)\nM=D";
        let hack = assemble(source).unwrap();
        let lines: Vec<&str> = hack.lines().collect();
        let expected_three = format!("{:016b}", 3u16);
        assert_eq!(lines[1], expected_three);
    }

    #[test]
    fn s4_literal_overflow_is_an_error() {
        assert!(assemble("@32768").is_err());
    }

    #[test]
    fn variables_are_allocated_densely_starting_at_sixteen() {
        let hack = assemble("@foo\n@bar\n@foo").unwrap();
        let lines: Vec<&str> = hack.lines().collect();
        assert_eq!(lines[0], format!("{:016b}", 16u16));
        assert_eq!(lines[1], format!("{:016b}", 17u16));
        assert_eq!(lines[2], format!("{:016b}", 16u16));
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let hack = assemble("// a comment\n\n@R0\n   \n").unwrap();
        assert_eq!(hack, format!("{:016b}", 0u16));
    }

    #[test]
    fn redefined_label_is_an_error() {
        let err = assemble("(LOOP)\n@0\n(LOOP)\n@0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MultipleSymbolDefinitionError);
    }
}
