//! Error types for the HLL front end (tokenizer, parser, code generator).

/// A 1-indexed source location, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JackError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl JackError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    /// `IncompleteCommandError` is a subkind of `StructureError` (§4.2): a
    /// structure violation specifically caused by running off the end of
    /// the token stream. Callers that only care about "was this a grammar
    /// violation" should use this rather than matching `kind` directly.
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::StructureError | ErrorKind::IncompleteCommandError
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Tokenizer-level lexical violation (number too large, unterminated string, …).
    ParseError,
    /// Grammar violation during parsing.
    StructureError,
    /// A structure error caused specifically by running off the end of the
    /// token stream mid-construct.
    IncompleteCommandError,
    /// A referenced identifier was not defined in either scope.
    SymbolNotFoundError,
    /// A semantic reference failure distinguishable from a structural
    /// mismatch: the name resolves, but not to something usable in this
    /// position — e.g. calling a method on a variable of primitive type,
    /// which has no class to dispatch against.
    UndefinedVariableError,
}

impl std::fmt::Display for JackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ERROR (line {}:{}): {}",
            self.span.line, self.span.col, self.message
        )
    }
}

impl std::error::Error for JackError {}
