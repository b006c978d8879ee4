//! # Source Lexer
//!
//! Splits raw source text into per-line fields: an optional label, an
//! optional mnemonic, an operand remainder, and an optional comment.
//!
//! Unlike a token-stream lexer for a free-form language, SIC/XE source is
//! column-sensitive at the line level (label presence is decided by whether
//! the line itself starts with whitespace), so this stage operates
//! line-by-line rather than producing a flat token stream.

pub mod cursor;


use crate::error::{AsmError, Span};
use cursor::Cursor;

pub struct LexResult {
    pub lines: Vec<RawLine>,
    pub errors: Vec<AsmError>,
}

/// One physical source line, decomposed into its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub line_number: usize,
    pub original_text: String,
    pub is_comment: bool,
    pub label: Option<String>,
    pub mnemonic: Option<String>,
    pub operand: String,
    pub comment: Option<String>,
    pub span: Span,
}

#[must_use]
pub fn tokenize(source: &str) -> LexResult {
    let mut lines = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        lines.push(lex_line(raw, i + 1));
    }
    LexResult {
        lines,
        errors: Vec::new(),
    }
}

fn lex_line(raw: &str, line_number: usize) -> RawLine {
    let original_text = raw.to_string();
    let span = Span::new(line_number, 1);

    let stripped = raw.trim_start();
    if stripped.is_empty() {
        return RawLine {
            line_number,
            original_text,
            is_comment: true,
            label: None,
            mnemonic: None,
            operand: String::new(),
            comment: None,
            span,
        };
    }

    if stripped.starts_with('.') {
        return RawLine {
            line_number,
            original_text,
            is_comment: true,
            label: None,
            mnemonic: None,
            operand: String::new(),
            comment: Some(stripped.to_string()),
            span,
        };
    }

    let cursor = Cursor::new(raw);
    let has_leading_whitespace = cursor.peek().is_some_and(|c| c == ' ' || c == '\t');
    let (code_part, comment) = split_inline_comment(raw);
    let (label, mnemonic, operand) = tokenize_fields(code_part, has_leading_whitespace);

    RawLine {
        line_number,
        original_text,
        is_comment: false,
        label,
        mnemonic,
        operand,
        comment,
        span,
    }
}

/// Split off a trailing inline comment at the first `.` that is not inside a
/// quoted character/hex-literal body (so `BYTE C'END.'` isn't corrupted).
fn split_inline_comment(line: &str) -> (&str, Option<String>) {
    let mut in_quote = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            '.' if !in_quote => return (&line[..idx], Some(line[idx..].to_string())),
            _ => {}
        }
    }
    (line, None)
}

/// Split whitespace-delimited fields, collapsing runs of whitespace, up to
/// `max_parts` parts (the final part retains any embedded whitespace).
fn split_ws_limited(s: &str, max_parts: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = s;
    for _ in 1..max_parts {
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            return parts;
        }
        match trimmed.find(char::is_whitespace) {
            Some(idx) => {
                parts.push(trimmed[..idx].to_string());
                rest = &trimmed[idx..];
            }
            None => {
                parts.push(trimmed.to_string());
                return parts;
            }
        }
    }
    let remainder = rest.trim();
    if !remainder.is_empty() {
        parts.push(remainder.to_string());
    }
    parts
}

fn tokenize_fields(
    code: &str,
    has_leading_whitespace: bool,
) -> (Option<String>, Option<String>, String) {
    let code = code.trim_end();

    if has_leading_whitespace {
        let fields = split_ws_limited(code, 2);
        let mnemonic = fields.first().map(|m| m.to_ascii_uppercase());
        let operand = fields.get(1).cloned().unwrap_or_default();
        (None, mnemonic, operand)
    } else {
        let fields = split_ws_limited(code, 3);
        let label = fields.first().cloned();
        let mnemonic = fields.get(1).map(|m| m.to_ascii_uppercase());
        let operand = fields.get(2).cloned().unwrap_or_default();
        (label, mnemonic, operand)
    }
}
