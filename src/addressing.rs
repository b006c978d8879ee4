//! Addressing-mode parsing for format-3/4 operands.
//!
//! Per the redesign note this assembler follows: the `#`/`@`/`,X` prefix
//! sniffing happens exactly once, here, and the result is carried on the
//! instruction record so the encoder never re-parses the operand string.

/// Addressing mode selected by an operand's prefix character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// No prefix: `V`
    Simple,
    /// `#V`
    Immediate,
    /// `@V`
    Indirect,
}

/// A format-3/4 operand, decomposed once at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedOperand {
    pub mode: AddrMode,
    pub indexed: bool,
    /// The operand with its mode prefix and `,X` suffix stripped: a symbol
    /// name, a literal (`=...`), or a bare decimal constant. Empty for
    /// instructions with no operand (`RSUB`).
    pub target_text: String,
}

/// Strip a trailing `,X` (case-insensitive) and return whether it was present.
fn strip_index_suffix(operand: &str) -> (&str, bool) {
    let trimmed = operand.trim_end();
    for suffix in [",X", ",x"] {
        if let Some(base) = trimmed.strip_suffix(suffix) {
            return (base.trim_end(), true);
        }
    }
    (trimmed, false)
}

/// Parse a format-3/4 operand into its addressing mode, index flag, and
/// target text.
pub fn parse_addressed_operand(operand: &str) -> AddressedOperand {
    let (body, indexed) = strip_index_suffix(operand.trim());

    let (mode, target_text) = if let Some(rest) = body.strip_prefix('#') {
        (AddrMode::Immediate, rest.trim())
    } else if let Some(rest) = body.strip_prefix('@') {
        (AddrMode::Indirect, rest.trim())
    } else {
        (AddrMode::Simple, body.trim())
    };

    AddressedOperand {
        mode,
        indexed,
        target_text: target_text.to_string(),
    }
}
