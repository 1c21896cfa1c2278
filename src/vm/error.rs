//! Error type for the VM parser and assembly generator (§4.6, §4.7, §7).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
}

impl Span {
    pub fn new(line: usize) -> Self {
        Self { line }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VmError {
    pub message: String,
    pub span: Span,
    pub source_line: String,
}

impl VmError {
    pub fn new(message: impl Into<String>, span: Span, source_line: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            source_line: source_line.into(),
        }
    }
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TranslatorError (line {}): {} [{}]",
            self.span.line, self.message, self.source_line
        )
    }
}

impl std::error::Error for VmError {}
