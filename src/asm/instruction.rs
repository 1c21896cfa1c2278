//! # Assembler C-Parser (C8)
//!
//! Parses a single C-instruction `[dest=]comp[;jump]` into its 16-bit
//! encoding: `111` + a-bit + 6-bit comp + 3-bit dest + 3-bit jump (§4.8).

use crate::asm::error::{AsmError, ErrorKind, Span};

fn dest_code(dest: &str) -> Option<u16> {
    Some(match dest {
        "" => 0b000,
        "M" => 0b001,
        "D" => 0b010,
        "MD" => 0b011,
        "A" => 0b100,
        "AM" => 0b101,
        "AD" => 0b110,
        "AMD" => 0b111,
        _ => return None,
    })
}

fn jump_code(jump: &str) -> Option<u16> {
    Some(match jump {
        "" => 0b000,
        "JGT" => 0b001,
        "JEQ" => 0b010,
        "JGE" => 0b011,
        "JLT" => 0b100,
        "JNE" => 0b101,
        "JLE" => 0b110,
        "JMP" => 0b111,
        _ => return None,
    })
}

/// `comp` mnemonics when `A` is the ALU operand (a-bit = 0).
fn comp_code_a0(comp: &str) -> Option<u16> {
    Some(match comp {
        "0" => 0b101010,
        "1" => 0b111111,
        "-1" => 0b111010,
        "D" => 0b001100,
        "A" => 0b110000,
        "!D" => 0b001101,
        "!A" => 0b110001,
        "-D" => 0b001111,
        "-A" => 0b110011,
        "D+1" => 0b011111,
        "A+1" => 0b110111,
        "D-1" => 0b001110,
        "A-1" => 0b110010,
        "D+A" => 0b000010,
        "D-A" => 0b010011,
        "A-D" => 0b000111,
        "D&A" => 0b000000,
        "D|A" => 0b010101,
        _ => return None,
    })
}

/// `comp` mnemonics when `M` is the ALU operand (a-bit = 1).
fn comp_code_a1(comp: &str) -> Option<u16> {
    Some(match comp {
        "M" => 0b110000,
        "!M" => 0b110001,
        "-M" => 0b110011,
        "M+1" => 0b110111,
        "M-1" => 0b110010,
        "D+M" => 0b000010,
        "D-M" => 0b010011,
        "M-D" => 0b000111,
        "D&M" => 0b000000,
        "D|M" => 0b010101,
        _ => return None,
    })
}

/// Encode one C-instruction line into its 16-bit word.
pub fn encode_c_instruction(text: &str, span: Span) -> Result<u16, AsmError> {
    let (dest, rest) = match text.split_once('=') {
        Some((d, r)) => (d, r),
        None => ("", text),
    };
    let (comp, jump) = match rest.split_once(';') {
        Some((c, j)) => (c, j),
        None => (rest, ""),
    };

    let dest_bits = dest_code(dest).ok_or_else(|| {
        AsmError::new(
            ErrorKind::AssemblerError,
            format!("'{dest}' is not a valid dest"),
            span,
            text,
        )
    })?;
    let jump_bits = jump_code(jump).ok_or_else(|| {
        AsmError::new(
            ErrorKind::AssemblerError,
            format!("'{jump}' is not a valid jump"),
            span,
            text,
        )
    })?;

    let (a_bit, comp_bits) = if let Some(bits) = comp_code_a0(comp) {
        (0u16, bits)
    } else if let Some(bits) = comp_code_a1(comp) {
        (1u16, bits)
    } else {
        return Err(AsmError::new(
            ErrorKind::AssemblerError,
            format!("'{comp}' is not a valid comp"),
            span,
            text,
        ));
    };

    Ok((0b111 << 13) | (a_bit << 12) | (comp_bits << 6) | (dest_bits << 3) | jump_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s() -> Span {
        Span::new(1)
    }

    #[test]
    fn comp_only_encodes_with_null_dest_and_jump() {
        let word = encode_c_instruction("0", s()).unwrap();
        assert_eq!(word, 0b1110_1010_1000_0000);
    }

    #[test]
    fn dest_and_comp() {
        let word = encode_c_instruction("D=A", s()).unwrap();
        assert_eq!(word, 0b1110_1100_0001_0000);
    }

    #[test]
    fn comp_and_jump() {
        let word = encode_c_instruction("0;JMP", s()).unwrap();
        assert_eq!(word, 0b1110_1010_1000_0111);
    }

    #[test]
    fn m_operand_sets_the_a_bit() {
        let word = encode_c_instruction("M=D", s()).unwrap();
        assert_eq!(word, 0b1111_1100_0001_0000);
    }

    #[test]
    fn unknown_dest_is_an_error() {
        assert!(encode_c_instruction("Q=D", s()).is_err());
    }

    #[test]
    fn unknown_comp_is_an_error() {
        assert!(encode_c_instruction("D=Z", s()).is_err());
    }

    #[test]
    fn unknown_jump_is_an_error() {
        assert!(encode_c_instruction("0;JXX", s()).is_err());
    }
}
