//! # Parser
//!
//! Turns lexer output into classified, structured lines: each line is
//! tagged `Comment`, `Directive`, or `Instruction` using the operation
//! tables, ready for Pass 1 to walk and assign addresses.
//!
//! Label syntax validation and unknown-mnemonic detection are *not* done
//! here — per the pipeline's error-ownership split, both are recorded by
//! Pass 1 so that a single error taxonomy (with address context) owns them.

#[cfg(test)]
mod tests;

use crate::error::{AsmError, Span};
use crate::lexer::RawLine;
use crate::optab;

/// What kind of statement a line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Comment,
    Directive,
    Instruction,
}

/// A classified source line, ready for address assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub line_number: usize,
    pub original_text: String,
    pub label: Option<String>,
    pub mnemonic: Option<String>,
    pub operand: String,
    pub comment: Option<String>,
    pub classification: Classification,
    pub span: Span,
}

pub struct ParseResult {
    pub lines: Vec<ParsedLine>,
    pub errors: Vec<AsmError>,
}

#[must_use]
pub fn parse_lines(lines: Vec<RawLine>) -> ParseResult {
    let parsed = lines.into_iter().map(classify_line).collect();
    ParseResult {
        lines: parsed,
        errors: Vec::new(),
    }
}

fn classify_line(line: RawLine) -> ParsedLine {
    let classification = if line.is_comment {
        Classification::Comment
    } else {
        match &line.mnemonic {
            Some(mnemonic) => {
                let (base, _) = optab::strip_extended_prefix(mnemonic);
                if optab::is_directive(base) {
                    Classification::Directive
                } else {
                    Classification::Instruction
                }
            }
            None => Classification::Comment,
        }
    };

    ParsedLine {
        line_number: line.line_number,
        original_text: line.original_text,
        label: line.label,
        mnemonic: line.mnemonic,
        operand: line.operand,
        comment: line.comment,
        classification,
        span: line.span,
    }
}
