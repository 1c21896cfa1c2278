//! # Assembly Generator (C7)
//!
//! Translates typed VM commands into Machine assembly text. Each VM
//! command maps to a fixed assembly template; placeholders are filled by
//! `format!` rather than a runtime template engine (§9 Design Notes).
//! Every template this module emits ends with `\n`.
//!
//! Documented placeholders, matching §9's naming: `{segment_pointer}` (the
//! base-address symbol for an indirect segment: `LCL`/`ARG`/`THIS`/`THAT`),
//! `{i}` (a segment index or literal), `{label}` (a user label),
//! `{function_name}`, `{n_args}`, `{return_label}`, `{n_vars}`,
//! `{line_number}`.

use crate::vm::command::{ArithCommand, Segment, VmCommand};
use crate::vm::error::{Span, VmError};

const TEMP_BASE: u16 = 5;
const TEMP_SLOTS: u16 = 8;

pub struct AssemblyGenerator {
    file_stem: String,
}

impl AssemblyGenerator {
    pub fn new(file_stem: impl Into<String>) -> Self {
        Self {
            file_stem: file_stem.into(),
        }
    }

    /// The bootstrap preamble emitted once, before any file's commands,
    /// when translating a folder (§4.7 Init). Sets `SP = 256` and calls
    /// `Sys.init 0`.
    pub fn bootstrap() -> String {
        let mut out = String::from("@256\nD=A\n@SP\nM=D\n");
        out.push_str(&call_template("Sys.init", 0, "Bootstrap$Sys.init$return"));
        out
    }

    /// Translate one command. `stripped_line` — the comment-and-whitespace
    /// stripped source line, matching what was actually parsed — is echoed
    /// back as a `// <line>` comment ahead of the generated assembly, and
    /// `line_number` feeds the per-comparison and per-call unique-label
    /// derivation.
    pub fn translate(
        &self,
        command: &VmCommand,
        stripped_line: &str,
        line_number: usize,
    ) -> Result<String, VmError> {
        let span = Span::new(line_number);
        let body = match command {
            VmCommand::Push { segment, index } => self.push(*segment, *index, span, stripped_line)?,
            VmCommand::Pop { segment, index } => self.pop(*segment, *index, span, stripped_line)?,
            VmCommand::Arithmetic(op) => self.arithmetic(*op, line_number),
            VmCommand::Label(name) => format!("({name})\n"),
            VmCommand::Goto(name) => format!("@{name}\n0;JMP\n"),
            VmCommand::IfGoto(name) => format!("@SP\nAM=M-1\nD=M\n@{name}\nD;JNE\n"),
            VmCommand::Function { name, n_vars } => function_template(name, *n_vars),
            VmCommand::Call { name, n_args } => {
                let return_label = format!(
                    "RETURN_FROM_{}${}$line_{}",
                    self.file_stem, name, line_number
                );
                call_template(name, *n_args, &return_label)
            }
            VmCommand::Return => return_template(),
        };
        Ok(format!("// {stripped_line}\n{body}"))
    }

    fn push(&self, segment: Segment, index: u16, span: Span, raw_line: &str) -> Result<String, VmError> {
        match segment {
            Segment::Constant => Ok(format!("@{index}\nD=A\n@SP\nA=M\nM=D\n@SP\nM=M+1\n")),
            Segment::Local => Ok(push_indirect("LCL", index)),
            Segment::Argument => Ok(push_indirect("ARG", index)),
            Segment::This => Ok(push_indirect("THIS", index)),
            Segment::That => Ok(push_indirect("THAT", index)),
            Segment::Static => Ok(format!(
                "@{}.{index}\nD=M\n@SP\nA=M\nM=D\n@SP\nM=M+1\n",
                self.file_stem
            )),
            Segment::Temp => {
                let addr = self.temp_address(index, span, raw_line)?;
                Ok(format!("@{addr}\nD=M\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"))
            }
            Segment::Pointer => {
                let sym = pointer_symbol(index, span, raw_line)?;
                Ok(format!("@{sym}\nD=M\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"))
            }
        }
    }

    fn pop(&self, segment: Segment, index: u16, span: Span, raw_line: &str) -> Result<String, VmError> {
        match segment {
            Segment::Constant => Err(VmError::new(
                "cannot pop to the constant segment",
                span,
                raw_line,
            )),
            Segment::Local => Ok(pop_indirect("LCL", index)),
            Segment::Argument => Ok(pop_indirect("ARG", index)),
            Segment::This => Ok(pop_indirect("THIS", index)),
            Segment::That => Ok(pop_indirect("THAT", index)),
            Segment::Static => Ok(format!(
                "@SP\nAM=M-1\nD=M\n@{}.{index}\nM=D\n",
                self.file_stem
            )),
            Segment::Temp => {
                let addr = self.temp_address(index, span, raw_line)?;
                Ok(format!("@SP\nAM=M-1\nD=M\n@{addr}\nM=D\n"))
            }
            Segment::Pointer => {
                let sym = pointer_symbol(index, span, raw_line)?;
                Ok(format!("@SP\nAM=M-1\nD=M\n@{sym}\nM=D\n"))
            }
        }
    }

    fn temp_address(&self, index: u16, span: Span, raw_line: &str) -> Result<u16, VmError> {
        if index < TEMP_SLOTS {
            Ok(TEMP_BASE + index)
        } else {
            Err(VmError::new(
                format!("temp index {index} out of range (0..{TEMP_SLOTS})"),
                span,
                raw_line,
            ))
        }
    }

    fn arithmetic(&self, op: ArithCommand, line_number: usize) -> String {
        match op {
            ArithCommand::Add => "@SP\nAM=M-1\nD=M\nA=A-1\nM=M+D\n".to_string(),
            ArithCommand::Sub => "@SP\nAM=M-1\nD=M\nA=A-1\nM=M-D\n".to_string(),
            ArithCommand::Neg => "@SP\nA=M-1\nM=-M\n".to_string(),
            ArithCommand::And => "@SP\nAM=M-1\nD=M\nA=A-1\nM=M&D\n".to_string(),
            ArithCommand::Or => "@SP\nAM=M-1\nD=M\nA=A-1\nM=M|D\n".to_string(),
            ArithCommand::Not => "@SP\nA=M-1\nM=!M\n".to_string(),
            ArithCommand::Eq => self.comparison("JEQ", line_number),
            ArithCommand::Gt => self.comparison("JGT", line_number),
            ArithCommand::Lt => self.comparison("JLT", line_number),
        }
    }

    /// Comparisons need a unique label pair per call site, derived from
    /// `<file_stem>_<source_line_number>` so concatenating multiple `.vm`
    /// files never collides (§4.7).
    fn comparison(&self, jump: &str, line_number: usize) -> String {
        let true_label = format!("{}_{}$TRUE", self.file_stem, line_number);
        let end_label = format!("{}_{}$END", self.file_stem, line_number);
        format!(
            "@SP\nAM=M-1\nD=M\nA=A-1\nD=M-D\n@{true_label}\nD;{jump}\n@SP\nA=M-1\nM=0\n@{end_label}\n0;JMP\n({true_label})\n@SP\nA=M-1\nM=-1\n({end_label})\n"
        )
    }
}

fn push_indirect(segment_pointer: &str, index: u16) -> String {
    if index == 0 {
        format!("@{segment_pointer}\nA=M\nD=M\n@SP\nA=M\nM=D\n@SP\nM=M+1\n")
    } else {
        format!(
            "@{index}\nD=A\n@{segment_pointer}\nA=D+M\nD=M\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"
        )
    }
}

fn pop_indirect(segment_pointer: &str, index: u16) -> String {
    if index == 0 {
        format!("@{segment_pointer}\nA=M\nD=A\n@R13\nM=D\n@SP\nAM=M-1\nD=M\n@R13\nA=M\nM=D\n")
    } else {
        format!(
            "@{index}\nD=A\n@{segment_pointer}\nD=D+M\n@R13\nM=D\n@SP\nAM=M-1\nD=M\n@R13\nA=M\nM=D\n"
        )
    }
}

fn pointer_symbol(index: u16, span: Span, raw_line: &str) -> Result<&'static str, VmError> {
    match index {
        0 => Ok("THIS"),
        1 => Ok("THAT"),
        _ => Err(VmError::new(
            format!("pointer index {index} must be 0 or 1"),
            span,
            raw_line,
        )),
    }
}

fn function_template(name: &str, n_vars: u16) -> String {
    let mut out = format!("({name})\n");
    for _ in 0..n_vars {
        out.push_str("@SP\nA=M\nM=0\n@SP\nM=M+1\n");
    }
    out
}

/// `call f n` (§4.7 calling convention): push the return address, the
/// caller's four segment pointers, reposition `ARG`/`LCL`, then jump.
fn call_template(name: &str, n_args: u16, return_label: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("@{return_label}\nD=A\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"));
    for segment_pointer in ["LCL", "ARG", "THIS", "THAT"] {
        out.push_str(&format!(
            "@{segment_pointer}\nD=M\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"
        ));
    }
    out.push_str(&format!(
        "@{}\nD=A\n@{n_args}\nD=D+A\n@SP\nD=M-D\n@ARG\nM=D\n",
        5
    ));
    out.push_str("@SP\nD=M\n@LCL\nM=D\n");
    out.push_str(&format!("@{name}\n0;JMP\n({return_label})\n"));
    out
}

/// `return` (§4.7): restore the caller's frame from `LCL`, using `R13` as
/// the scratch `FRAME` register and `R14` as the scratch `RET` register.
fn return_template() -> String {
    let mut out = String::new();
    out.push_str("@LCL\nD=M\n@R13\nM=D\n"); // FRAME = LCL
    out.push_str("@5\nA=D-A\nD=M\n@R14\nM=D\n"); // RET = *(FRAME - 5)
    out.push_str("@SP\nAM=M-1\nD=M\n@ARG\nA=M\nM=D\n"); // *ARG = pop()
    out.push_str("@ARG\nD=M+1\n@SP\nM=D\n"); // SP = ARG + 1
    for segment_pointer in ["THAT", "THIS", "ARG", "LCL"] {
        out.push_str(&format!("@R13\nAM=M-1\nD=M\n@{segment_pointer}\nM=D\n"));
    }
    out.push_str("@R14\nA=M\n0;JMP\n"); // jump to RET
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::command::parse_line;

    fn gen() -> AssemblyGenerator {
        AssemblyGenerator::new("some_file")
    }

    #[test]
    fn push_constant_then_pop_local_translates_without_error() {
        let cmd = parse_line("push constant 17", 1).unwrap().unwrap();
        assert!(gen().translate(&cmd, "push constant 17", 1).is_ok());
        let cmd = parse_line("pop local 2", 2).unwrap().unwrap();
        assert!(gen().translate(&cmd, "pop local 2", 2).is_ok());
    }

    #[test]
    fn static_segment_uses_the_file_stem() {
        let cmd = parse_line("pop static 3", 1).unwrap().unwrap();
        let asm = gen().translate(&cmd, "pop static 3", 1).unwrap();
        assert!(asm.contains("@some_file.3"));
    }

    #[test]
    fn temp_8_is_an_error_temp_7_is_not() {
        let cmd = parse_line("pop temp 8", 1).unwrap().unwrap();
        assert!(gen().translate(&cmd, "pop temp 8", 1).is_err());
        let cmd = parse_line("pop temp 7", 1).unwrap().unwrap();
        assert!(gen().translate(&cmd, "pop temp 7", 1).is_ok());
    }

    #[test]
    fn source_line_is_echoed_as_a_comment() {
        let cmd = parse_line("add", 4).unwrap().unwrap();
        let asm = gen().translate(&cmd, "add", 4).unwrap();
        assert!(asm.starts_with("// add\n"));
    }

    #[test]
    fn every_emitted_line_ends_with_newline_and_template_is_nonempty() {
        let cmd = parse_line("call Math.multiply 2", 7).unwrap().unwrap();
        let asm = gen().translate(&cmd, "call Math.multiply 2", 7).unwrap();
        assert!(asm.ends_with('\n'));
        assert!(asm.contains("RETURN_FROM_some_file$Math.multiply$line_7"));
    }

    #[test]
    fn bootstrap_sets_stack_pointer_and_calls_sys_init() {
        let asm = AssemblyGenerator::bootstrap();
        assert!(asm.starts_with("@256\nD=A\n@SP\nM=D\n"));
        assert!(asm.contains("@Sys.init\n0;JMP\n"));
    }
}
