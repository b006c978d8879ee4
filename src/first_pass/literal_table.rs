//! LITTAB: the literal pool.
//!
//! Each unique literal text is recorded once, the first time it is used.
//! Addresses are assigned in FIFO order whenever a flush point (`LTORG`,
//! `END`) is reached, to the literals registered since the previous flush.

use crate::literal::parse_literal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralEntry {
    pub hex: String,
    pub length: usize,
    pub address: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct LiteralTable {
    entries: Vec<(String, LiteralEntry)>,
    pending: Vec<String>,
}

impl LiteralTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `literal` (the full text including its leading `=`) the
    /// first time it's seen. Returns an error if the literal's constant form
    /// can't be parsed.
    pub fn register(&mut self, literal: &str) -> Result<(), String> {
        if self.entries.iter().any(|(text, _)| text == literal) {
            return Ok(());
        }
        let body = literal.strip_prefix('=').unwrap_or(literal);
        let parsed = parse_literal(body)?;
        self.entries.push((
            literal.to_string(),
            LiteralEntry {
                hex: parsed.hex,
                length: parsed.length,
                address: None,
            },
        ));
        self.pending.push(literal.to_string());
        Ok(())
    }

    /// Assigns addresses to all literals pending since the last flush, in
    /// FIFO order, advancing `locctr` by each literal's length. Returns the
    /// final `locctr`.
    pub fn flush(&mut self, mut locctr: u32) -> u32 {
        for text in std::mem::take(&mut self.pending) {
            let entry = self
                .entries
                .iter_mut()
                .find(|(t, _)| *t == text)
                .map(|(_, e)| e)
                .expect("pending literal must already be registered");
            entry.address = Some(locctr);
            locctr += entry.length as u32;
        }
        locctr
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn address_of(&self, literal: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(t, _)| t == literal)
            .and_then(|(_, e)| e.address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, LiteralEntry)> {
        self.entries.iter()
    }
}
