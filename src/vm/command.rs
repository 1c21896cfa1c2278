//! # VM Parser (C6)
//!
//! Line-oriented parsing of VM text into typed [`VmCommand`]s. `//` line
//! comments and surrounding whitespace are stripped before dispatch; blank
//! lines parse to `None`.

use crate::vm::error::{Span, VmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Static,
    Temp,
    Pointer,
}

impl Segment {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "constant" => Segment::Constant,
            "local" => Segment::Local,
            "argument" => Segment::Argument,
            "this" => Segment::This,
            "that" => Segment::That,
            "static" => Segment::Static,
            "temp" => Segment::Temp,
            "pointer" => Segment::Pointer,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithCommand {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithCommand {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "add" => ArithCommand::Add,
            "sub" => ArithCommand::Sub,
            "neg" => ArithCommand::Neg,
            "eq" => ArithCommand::Eq,
            "gt" => ArithCommand::Gt,
            "lt" => ArithCommand::Lt,
            "and" => ArithCommand::And,
            "or" => ArithCommand::Or,
            "not" => ArithCommand::Not,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VmCommand {
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Arithmetic(ArithCommand),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function { name: String, n_vars: u16 },
    Call { name: String, n_args: u16 },
    Return,
}

/// Strip a `//` line comment (if any) and surrounding whitespace.
pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

fn is_label_char_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '.'
}

fn is_label_char_rest(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$'
}

fn validate_label(name: &str, span: Span, source_line: &str) -> Result<(), VmError> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_label_char_start(c) => {}
        _ => {
            return Err(VmError::new(
                format!("'{name}' is not a valid label"),
                span,
                source_line,
            ))
        }
    }
    if !chars.all(is_label_char_rest) {
        return Err(VmError::new(
            format!("'{name}' is not a valid label"),
            span,
            source_line,
        ));
    }
    Ok(())
}

fn parse_non_negative(s: &str, span: Span, source_line: &str) -> Result<u16, VmError> {
    s.parse::<u16>()
        .map_err(|_| VmError::new(format!("'{s}' is not a non-negative integer"), span, source_line))
}

/// Parse one line of VM text. Returns `Ok(None)` for a blank or
/// comment-only line.
pub fn parse_line(
    raw_line: &str,
    line_number: usize,
) -> Result<Option<VmCommand>, VmError> {
    let span = Span::new(line_number);
    let stripped = strip_comment(raw_line);
    if stripped.is_empty() {
        return Ok(None);
    }

    let words: Vec<&str> = stripped.split_whitespace().collect();
    let command = match words.as_slice() {
        [op @ ("push" | "pop"), segment, index] => {
            let segment = Segment::from_str(segment).ok_or_else(|| {
                VmError::new(format!("'{segment}' is not a valid segment"), span, raw_line)
            })?;
            let index = parse_non_negative(index, span, raw_line)?;
            if *op == "pop" && segment == Segment::Constant {
                return Err(VmError::new("cannot pop to the constant segment", span, raw_line));
            }
            if *op == "push" {
                VmCommand::Push { segment, index }
            } else {
                VmCommand::Pop { segment, index }
            }
        }
        [op] if ArithCommand::from_str(op).is_some() => {
            VmCommand::Arithmetic(ArithCommand::from_str(op).unwrap())
        }
        ["return"] => VmCommand::Return,
        ["label", name] => {
            validate_label(name, span, raw_line)?;
            VmCommand::Label(name.to_string())
        }
        ["goto", name] => {
            validate_label(name, span, raw_line)?;
            VmCommand::Goto(name.to_string())
        }
        ["if-goto", name] => {
            validate_label(name, span, raw_line)?;
            VmCommand::IfGoto(name.to_string())
        }
        ["function", name, n_vars] => {
            validate_label(name, span, raw_line)?;
            let n_vars = parse_non_negative(n_vars, span, raw_line)?;
            VmCommand::Function {
                name: name.to_string(),
                n_vars,
            }
        }
        ["call", name, n_args] => {
            validate_label(name, span, raw_line)?;
            let n_args = parse_non_negative(n_args, span, raw_line)?;
            VmCommand::Call {
                name: name.to_string(),
                n_args,
            }
        }
        _ => {
            return Err(VmError::new(
                format!("unrecognized or malformed command '{stripped}'"),
                span,
                raw_line,
            ))
        }
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_only_lines_are_none() {
        assert_eq!(parse_line("", 1).unwrap(), None);
        assert_eq!(parse_line("   // just a comment", 1).unwrap(), None);
    }

    #[test]
    fn push_constant_parses() {
        let cmd = parse_line("push constant 17", 1).unwrap().unwrap();
        assert_eq!(
            cmd,
            VmCommand::Push {
                segment: Segment::Constant,
                index: 17
            }
        );
    }

    #[test]
    fn trailing_comment_is_stripped() {
        let cmd = parse_line("pop local 2 // store it", 1).unwrap().unwrap();
        assert_eq!(
            cmd,
            VmCommand::Pop {
                segment: Segment::Local,
                index: 2
            }
        );
    }

    #[test]
    fn pop_constant_is_an_error() {
        assert!(parse_line("pop constant 0", 1).is_err());
    }

    #[test]
    fn temp_8_is_accepted_by_the_parser_but_temp_7_also_parses() {
        // Range validation for temp happens in the assembly generator (§4.7,
        // S8); the parser only validates shape.
        assert!(parse_line("pop temp 8", 1).unwrap().is_some());
        assert!(parse_line("pop temp 7", 1).unwrap().is_some());
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse_line("frobnicate", 1).is_err());
    }

    #[test]
    fn label_must_match_the_identifier_pattern() {
        assert!(parse_line("label Foo.bar$1", 1).unwrap().is_some());
        assert!(parse_line("label 1bad", 1).is_err());
    }

    #[test]
    fn call_and_function_take_a_label_and_an_integer() {
        let cmd = parse_line("call Math.multiply 2", 1).unwrap().unwrap();
        assert_eq!(
            cmd,
            VmCommand::Call {
                name: "Math.multiply".to_string(),
                n_args: 2
            }
        );
        let cmd = parse_line("function Main.main 0", 1).unwrap().unwrap();
        assert_eq!(
            cmd,
            VmCommand::Function {
                name: "Main.main".to_string(),
                n_vars: 0
            }
        );
    }
}
