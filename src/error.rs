//! Error taxonomy and source-location tracking shared by every pipeline stage.

use thiserror::Error;

/// Location of a line in the original source, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// The kind of failure recorded against a source line.
///
/// `IOError` is the only kind that aborts the pipeline; every other kind is
/// collected into a stage's error list and processing continues so a single
/// run can report as many diagnostics as possible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("malformed line structure")]
    ParseError,
    #[error("duplicate symbol '{0}'")]
    DuplicateSymbol(String),
    #[error("undefined symbol '{0}'")]
    UndefinedSymbol(String),
    #[error("unknown mnemonic '{0}'")]
    OpcodeError(String),
    #[error("invalid numeric or character literal")]
    FormatError,
    #[error("displacement out of range")]
    DisplacementError,
    #[error("{0}")]
    IOError(String),
}

/// A single diagnostic, rendered as `Line <N>: <message>` per the user-visible
/// error format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl AsmError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn duplicate_symbol(label: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::DuplicateSymbol(label.to_string()),
            format!("duplicate symbol '{label}'"),
            span,
        )
    }

    pub fn undefined_symbol(label: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UndefinedSymbol(label.to_string()),
            format!("undefined symbol '{label}'"),
            span,
        )
    }
}

impl std::fmt::Display for AsmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.span.line, self.message)
    }
}
