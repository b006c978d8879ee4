//! The central record that flows from Pass 1 through Pass 2 to the Object
//! and Listing Writers.

use crate::addressing::AddressedOperand;
use crate::parser::Classification;

/// Object code for one instruction, tagged rather than sentinel-valued so a
/// "not yet generated" line can never be confused with a real all-zero code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ObjectCode {
    #[default]
    None,
    Hex(String),
    Error,
}

/// One source line, carried through the whole pipeline and progressively
/// enriched: the lexer and parser fill in everything through
/// `classification`; Pass 1 fills in `address` and `format`; Pass 2 fills in
/// `addressed_operand` and `object_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub line_number: usize,
    pub original_text: String,
    pub address: u32,
    pub label: Option<String>,
    pub mnemonic: Option<String>,
    pub operand: String,
    pub comment: Option<String>,
    pub classification: Classification,
    /// Instruction format (1, 2, 3, or 4); `None` for comments and most
    /// directives.
    pub format: Option<u8>,
    pub addressed_operand: Option<AddressedOperand>,
    pub object_code: ObjectCode,
}

impl Instruction {
    pub fn is_extended(&self) -> bool {
        self.format == Some(4)
    }
}
