//! # Pass 2 — Code Generator
//!
//! Synthesizes object code for each instruction using the tables Pass 1
//! built, choosing a PC-relative, base-relative, or extended displacement
//! encoding per format-3/4 instruction and accumulating modification
//! records for the loader.

#[cfg(test)]
mod tests;

use crate::addressing::{AddrMode, AddressedOperand};
use crate::error::{AsmError, ErrorKind, Span};
use crate::first_pass::literal_table::LiteralTable;
use crate::first_pass::symbol_table::SymbolTable;
use crate::instruction::{Instruction, ObjectCode};
use crate::literal::parse_char_or_hex;
use crate::optab;

/// A loader relocation site: (address, length in half-bytes).
pub type ModificationRecord = (u32, u8);

pub struct EncodeResult {
    pub instructions: Vec<Instruction>,
    pub modification_records: Vec<ModificationRecord>,
    pub errors: Vec<AsmError>,
}

struct Pass2<'a> {
    symbol_table: &'a SymbolTable,
    literal_table: &'a LiteralTable,
    base_register: u32,
    modification_records: Vec<ModificationRecord>,
    errors: Vec<AsmError>,
}

/// Runs Pass 2 over Pass 1's output.
#[must_use]
pub fn encode(
    instructions: Vec<Instruction>,
    symbol_table: &SymbolTable,
    literal_table: &LiteralTable,
) -> EncodeResult {
    let mut pass = Pass2 {
        symbol_table,
        literal_table,
        base_register: 0,
        modification_records: Vec::new(),
        errors: Vec::new(),
    };

    let instructions = instructions
        .into_iter()
        .map(|instr| pass.encode_one(instr))
        .collect();

    EncodeResult {
        instructions,
        modification_records: pass.modification_records,
        errors: pass.errors,
    }
}

/// Target address a format-3/4 operand resolves to.
enum Target {
    /// `RSUB`-style empty operand: always encodes as displacement 0,
    /// never run through PC/base-relative math (which would spuriously
    /// overflow against a bogus target of 0).
    Empty,
    /// A numeric immediate constant (`#3`) used as a raw value, not a
    /// memory reference — never relocated, never base/PC-relative.
    RawImmediate(u32),
    /// A literal or symbol address.
    Resolved(u32),
}

impl Pass2<'_> {
    fn encode_one(&mut self, mut instr: Instruction) -> Instruction {
        use crate::parser::Classification;

        if instr.classification == Classification::Comment {
            return instr;
        }

        let mnemonic = match &instr.mnemonic {
            Some(m) => m.clone(),
            None => return instr,
        };

        if mnemonic == "START" || mnemonic == "END" {
            return instr;
        }

        match mnemonic.as_str() {
            "BASE" => {
                self.set_base(&instr);
                return instr;
            }
            "NOBASE" => {
                self.base_register = 0;
                return instr;
            }
            _ => {}
        }

        if optab::is_directive(&mnemonic) {
            self.encode_directive(&mnemonic, &mut instr);
            return instr;
        }

        self.encode_instruction(&mnemonic, &mut instr);
        instr
    }

    fn set_base(&mut self, instr: &Instruction) {
        if instr.operand.is_empty() {
            return;
        }
        if let Some(addr) = self.symbol_table.get(&instr.operand) {
            self.base_register = addr;
        } else if let Ok(addr) = u32::from_str_radix(&instr.operand, 16) {
            self.base_register = addr;
        } else {
            self.errors.push(AsmError::new(
                ErrorKind::FormatError,
                format!(
                    "BASE operand '{}' is neither a symbol nor a hex value",
                    instr.operand
                ),
                Span::new(instr.line_number, 1),
            ));
        }
    }

    fn encode_directive(&mut self, mnemonic: &str, instr: &mut Instruction) {
        let span = Span::new(instr.line_number, 1);
        match mnemonic {
            "WORD" => match parse_signed_decimal(&instr.operand) {
                Some(value) => {
                    instr.object_code = ObjectCode::Hex(format!("{:06X}", value & 0x00FF_FFFF));
                }
                None => {
                    self.errors.push(AsmError::new(
                        ErrorKind::FormatError,
                        format!("WORD requires a numeric operand, got '{}'", instr.operand),
                        span,
                    ));
                    instr.object_code = ObjectCode::Error;
                }
            },
            "BYTE" => {
                if instr.operand.starts_with("X'") && hex_body(&instr.operand).len() % 2 != 0 {
                    self.errors.push(AsmError::new(
                        ErrorKind::FormatError,
                        format!("odd-length BYTE hex constant '{}'", instr.operand),
                        span,
                    ));
                    instr.object_code = ObjectCode::Error;
                } else {
                    match parse_char_or_hex(&instr.operand) {
                        Ok(parsed) => instr.object_code = ObjectCode::Hex(parsed.hex),
                        Err(msg) => {
                            self.errors
                                .push(AsmError::new(ErrorKind::FormatError, msg, span));
                            instr.object_code = ObjectCode::Error;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn encode_instruction(&mut self, mnemonic: &str, instr: &mut Instruction) {
        let span = Span::new(instr.line_number, 1);
        let entry = match optab::lookup(mnemonic) {
            Some(entry) => entry,
            None => {
                self.errors.push(AsmError::new(
                    ErrorKind::OpcodeError(mnemonic.to_string()),
                    format!("unknown mnemonic '{mnemonic}'"),
                    span,
                ));
                instr.object_code = ObjectCode::Error;
                return;
            }
        };

        match instr.format {
            Some(1) => {
                instr.object_code = ObjectCode::Hex(format!("{:02X}", entry.opcode));
            }
            Some(2) => {
                self.encode_format2(entry.opcode, instr);
            }
            Some(format @ (3 | 4)) => {
                self.encode_format34(entry.opcode, format, instr);
            }
            _ => {}
        }
    }

    fn encode_format2(&mut self, opcode: u8, instr: &mut Instruction) {
        let span = Span::new(instr.line_number, 1);
        let mut regs = [0u8; 2];
        for (slot, token) in regs.iter_mut().zip(instr.operand.split(',')) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match optab::register_code(token) {
                Some(code) => *slot = code,
                None => {
                    self.errors.push(AsmError::new(
                        ErrorKind::FormatError,
                        format!("unrecognized register '{token}'"),
                        span,
                    ));
                    instr.object_code = ObjectCode::Error;
                    return;
                }
            }
        }
        instr.object_code = ObjectCode::Hex(format!("{opcode:02X}{:01X}{:01X}", regs[0], regs[1]));
    }

    fn encode_format34(&mut self, opcode: u8, format: u8, instr: &mut Instruction) {
        let span = Span::new(instr.line_number, 1);
        let addressed = instr
            .addressed_operand
            .clone()
            .unwrap_or_else(|| crate::addressing::parse_addressed_operand(&instr.operand));

        let target = match self.resolve_target(&addressed) {
            Some(t) => t,
            None => {
                self.errors
                    .push(AsmError::undefined_symbol(&addressed.target_text, span));
                instr.object_code = ObjectCode::Error;
                return;
            }
        };

        let (n, i) = match addressed.mode {
            AddrMode::Simple => (1u8, 1u8),
            AddrMode::Immediate => (0u8, 1u8),
            AddrMode::Indirect => (1u8, 0u8),
        };
        let x = addressed.indexed as u8;

        let (b, p, e, disp, modification) = match target {
            Target::Empty => (0u8, 0u8, if format == 4 { 1 } else { 0 }, 0u32, None),
            Target::RawImmediate(value) => {
                if format == 4 {
                    (0u8, 0u8, 1u8, value & 0x000F_FFFF, None)
                } else if value <= 0xFFF {
                    (0u8, 0u8, 0u8, value, None)
                } else {
                    self.errors.push(AsmError::new(
                        ErrorKind::DisplacementError,
                        format!("immediate value {value} does not fit in 12 bits"),
                        span,
                    ));
                    instr.object_code = ObjectCode::Error;
                    return;
                }
            }
            Target::Resolved(target) => {
                if format == 4 {
                    (
                        0u8,
                        0u8,
                        1u8,
                        target & 0x000F_FFFF,
                        Some((instr.address + 1, 5u8)),
                    )
                } else {
                    let pc = instr.address + 3;
                    let disp_pc = target as i64 - pc as i64;
                    if (-2048..=2047).contains(&disp_pc) {
                        (0u8, 1u8, 0u8, (disp_pc as i32 & 0xFFF) as u32, None)
                    } else if self.base_register != 0
                        && (0..=4095).contains(&(target as i64 - self.base_register as i64))
                    {
                        let diff = target - self.base_register;
                        (1u8, 0u8, 0u8, diff, None)
                    } else {
                        self.errors.push(AsmError::new(
                            ErrorKind::DisplacementError,
                            format!(
                                "target 0x{target:06X} unreachable from 0x{:06X} (no usable base)",
                                instr.address
                            ),
                            span,
                        ));
                        instr.object_code = ObjectCode::Error;
                        return;
                    }
                }
            }
        };

        if let Some(record) = modification {
            self.modification_records.push(record);
        }

        let byte0 = (opcode & 0xFC) | (n << 1) | i;
        let xbpe_nibble = (x << 3) | (b << 2) | (p << 1) | e;

        let hex = if format == 4 {
            let high_nibble = ((disp >> 16) & 0xF) as u8;
            let byte1 = (xbpe_nibble << 4) | high_nibble;
            let rest = disp & 0xFFFF;
            format!("{byte0:02X}{byte1:02X}{rest:04X}")
        } else {
            let high_nibble = ((disp >> 8) & 0xF) as u8;
            let byte1 = (xbpe_nibble << 4) | high_nibble;
            let rest = disp & 0xFF;
            format!("{byte0:02X}{byte1:02X}{rest:02X}")
        };
        instr.object_code = ObjectCode::Hex(hex);
    }

    fn resolve_target(&self, addressed: &AddressedOperand) -> Option<Target> {
        let text = addressed.target_text.as_str();
        if text.is_empty() {
            return Some(Target::Empty);
        }
        if text.starts_with('=') {
            return self.literal_table.address_of(text).map(Target::Resolved);
        }
        if addressed.mode == AddrMode::Immediate && text.chars().all(|c| c.is_ascii_digit()) {
            return text.parse().ok().map(Target::RawImmediate);
        }
        self.symbol_table.get(text).map(Target::Resolved)
    }
}

fn hex_body(operand: &str) -> &str {
    operand
        .strip_prefix("X'")
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or("")
}

fn parse_signed_decimal(operand: &str) -> Option<i64> {
    if operand.is_empty() {
        return None;
    }
    let (negative, digits) = match operand.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, operand),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Given the literal table Pass 1 built, produce the (address, hex,
/// length) triples the Object Writer lays into the text record stream
/// alongside instruction object code — literals never get their own
/// `Instruction` record (§4.4).
pub fn literal_chunks(literal_table: &LiteralTable) -> Vec<(u32, String, usize)> {
    literal_table
        .iter()
        .filter_map(|(_, entry)| {
            entry
                .address
                .map(|addr| (addr, entry.hex.clone(), entry.length))
        })
        .collect()
}
