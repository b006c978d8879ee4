//! # First Pass — Address Assigner
//!
//! Walks the classified source once, assigning every instruction and
//! directive its address, resolving instruction formats, and building
//! SYMTAB and LITTAB. Pass 2 never recomputes an address; everything it
//! needs is already attached to the `Instruction` records this pass
//! produces.
//!
//! ## State Machine
//!
//! - `WaitingForStart`: expecting `START` (or any other first instruction,
//!   which defaults the program to origin 0)
//! - `Processing`: normal address assignment
//! - `AfterEnd`: `END` seen; later lines are not address-assigned
//!
//! This mirrors the state machine every example assembler in this pipeline
//! uses to keep .ORIG/.END-style bracketing explicit rather than tracked
//! with ad-hoc booleans.

pub mod literal_table;
pub mod symbol_table;


use crate::addressing::parse_addressed_operand;
use crate::error::{AsmError, ErrorKind, Span};
use crate::instruction::Instruction;
use crate::literal::parse_char_or_hex;
use crate::optab;
use crate::parser::{Classification, ParsedLine};
use literal_table::LiteralTable;
use symbol_table::SymbolTable;

pub struct FirstPassResult {
    pub instructions: Vec<Instruction>,
    pub symbol_table: SymbolTable,
    pub literal_table: LiteralTable,
    pub start_address: u32,
    pub program_length: u32,
    pub errors: Vec<AsmError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblerState {
    WaitingForStart,
    Processing,
    AfterEnd,
}

struct Pass1 {
    symbol_table: SymbolTable,
    literal_table: LiteralTable,
    errors: Vec<AsmError>,
    locctr: u32,
    instructions: Vec<Instruction>,
}

/// Runs Pass 1 over the parser's output, returning fully address-assigned
/// instructions plus the completed symbol and literal tables.
#[must_use]
pub fn first_pass(lines: Vec<ParsedLine>) -> FirstPassResult {
    let mut state = AssemblerState::WaitingForStart;
    let mut start_address: u32 = 0;
    let mut pass = Pass1 {
        symbol_table: SymbolTable::new(),
        literal_table: LiteralTable::new(),
        errors: Vec::new(),
        locctr: 0,
        instructions: Vec::with_capacity(lines.len()),
    };

    let mut first_real_line_seen = false;
    for line in lines {
        if line.classification == Classification::Comment {
            pass.instructions.push(blank_instruction(line, pass.locctr));
            continue;
        }

        if !first_real_line_seen {
            first_real_line_seen = true;
            if line.mnemonic.as_deref() == Some("START") {
                start_address = parse_hex_operand(&line.operand).unwrap_or(0);
                pass.locctr = start_address;
                pass.instructions
                    .push(address_instruction(line, start_address, None));
                state = AssemblerState::Processing;
                continue;
            }
            state = AssemblerState::Processing;
        }

        if state == AssemblerState::AfterEnd {
            pass.instructions.push(blank_instruction(line, pass.locctr));
            continue;
        }

        let mut address = pass.locctr;
        let is_equ = line.mnemonic.as_deref() == Some("EQU");

        if let Some(label) = line.label.clone() {
            if !is_equ {
                pass.record_label(&label, address, line.span);
            }
        }

        if line.operand.starts_with('=') {
            if let Err(msg) = pass.literal_table.register(&line.operand) {
                pass.errors
                    .push(AsmError::new(ErrorKind::FormatError, msg, line.span));
            }
        }

        let mnemonic = line.mnemonic.clone().unwrap_or_default();
        let mut format = None;

        match line.classification {
            Classification::Directive => {
                pass.process_directive(&mnemonic, &line, &mut state);
                if mnemonic == "WORD" {
                    format = Some(3);
                }
                if mnemonic == "END" {
                    // process_directive just ran the implicit literal flush;
                    // the END row's address is the final counter (§4.2.3).
                    address = pass.locctr;
                }
            }
            Classification::Instruction => {
                format = pass.process_instruction(&mnemonic, &line);
            }
            Classification::Comment => unreachable!(),
        }

        let addressed_operand = format
            .filter(|f| *f == 3 || *f == 4)
            .map(|_| parse_addressed_operand(&line.operand));

        pass.instructions.push(Instruction {
            line_number: line.line_number,
            original_text: line.original_text,
            address,
            label: line.label,
            mnemonic: line.mnemonic,
            operand: line.operand,
            comment: line.comment,
            classification: line.classification,
            format,
            addressed_operand,
            object_code: crate::instruction::ObjectCode::None,
        });
    }

    pass.locctr = pass.literal_table.flush(pass.locctr);

    FirstPassResult {
        instructions: pass.instructions,
        symbol_table: pass.symbol_table,
        literal_table: pass.literal_table,
        start_address,
        program_length: pass.locctr.saturating_sub(start_address),
        errors: pass.errors,
    }
}

fn blank_instruction(line: ParsedLine, address: u32) -> Instruction {
    Instruction {
        line_number: line.line_number,
        original_text: line.original_text,
        address,
        label: line.label,
        mnemonic: line.mnemonic,
        operand: line.operand,
        comment: line.comment,
        classification: line.classification,
        format: None,
        addressed_operand: None,
        object_code: crate::instruction::ObjectCode::None,
    }
}

fn address_instruction(line: ParsedLine, address: u32, format: Option<u8>) -> Instruction {
    Instruction {
        line_number: line.line_number,
        original_text: line.original_text,
        address,
        label: line.label,
        mnemonic: line.mnemonic,
        operand: line.operand,
        comment: line.comment,
        classification: line.classification,
        format,
        addressed_operand: None,
        object_code: crate::instruction::ObjectCode::None,
    }
}

fn parse_hex_operand(operand: &str) -> Option<u32> {
    if operand.is_empty() {
        return Some(0);
    }
    u32::from_str_radix(operand, 16).ok()
}

fn parse_decimal_operand(operand: &str) -> Option<u32> {
    operand.parse().ok()
}

impl Pass1 {
    fn record_label(&mut self, label: &str, address: u32, span: Span) {
        if !is_valid_label(label) {
            self.errors.push(AsmError::new(
                ErrorKind::ParseError,
                format!("invalid label '{label}'"),
                span,
            ));
            return;
        }
        if !self.symbol_table.insert(label, address) {
            self.errors.push(AsmError::duplicate_symbol(label, span));
        }
    }

    fn process_directive(&mut self, mnemonic: &str, line: &ParsedLine, state: &mut AssemblerState) {
        match mnemonic {
            "RESW" => {
                let n = parse_decimal_operand(&line.operand).unwrap_or(0);
                self.locctr += 3 * n;
            }
            "RESB" => {
                let n = parse_decimal_operand(&line.operand).unwrap_or(0);
                self.locctr += n;
            }
            "WORD" => {
                self.locctr += 3;
            }
            "BYTE" => match parse_char_or_hex(&line.operand) {
                Ok(parsed) => self.locctr += parsed.length as u32,
                Err(msg) => self
                    .errors
                    .push(AsmError::new(ErrorKind::FormatError, msg, line.span)),
            },
            "BASE" | "NOBASE" => {}
            "USE" => {
                self.errors.push(AsmError::new(
                    ErrorKind::FormatError,
                    "USE is recognized but program blocks are unsupported",
                    line.span,
                ));
            }
            "LTORG" => {
                self.locctr = self.literal_table.flush(self.locctr);
            }
            "EQU" => {
                if let Some(label) = &line.label {
                    let value = if line.operand == "*" {
                        Some(self.locctr)
                    } else {
                        parse_hex_operand(&line.operand)
                    };
                    if let Some(value) = value {
                        if self.symbol_table.contains(label) {
                            self.errors
                                .push(AsmError::duplicate_symbol(label, line.span));
                        } else {
                            self.symbol_table.insert(label, value);
                        }
                    } else {
                        self.errors.push(AsmError::new(
                            ErrorKind::FormatError,
                            format!("invalid EQU operand '{}'", line.operand),
                            line.span,
                        ));
                    }
                }
            }
            "ORG" => {
                if !line.operand.is_empty() && line.operand != "*" {
                    match parse_hex_operand(&line.operand) {
                        Some(addr) => self.locctr = addr,
                        None => self.errors.push(AsmError::new(
                            ErrorKind::FormatError,
                            format!("invalid ORG operand '{}'", line.operand),
                            line.span,
                        )),
                    }
                }
            }
            "END" => {
                self.locctr = self.literal_table.flush(self.locctr);
                *state = AssemblerState::AfterEnd;
            }
            "START" => {
                self.errors.push(AsmError::new(
                    ErrorKind::ParseError,
                    "START may only appear as the first instruction",
                    line.span,
                ));
            }
            other => {
                self.errors.push(AsmError::new(
                    ErrorKind::ParseError,
                    format!("unhandled directive '{other}'"),
                    line.span,
                ));
            }
        }
    }

    fn process_instruction(&mut self, mnemonic: &str, line: &ParsedLine) -> Option<u8> {
        match optab::lookup(mnemonic) {
            Some(entry) => {
                let (_, extended) = optab::strip_extended_prefix(mnemonic);
                let format = if extended { 4 } else { entry.format };
                self.locctr += format as u32;
                Some(format)
            }
            None => {
                self.errors.push(AsmError::new(
                    ErrorKind::OpcodeError(mnemonic.to_string()),
                    format!("unknown mnemonic '{mnemonic}'"),
                    line.span,
                ));
                None
            }
        }
    }
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > 6 {
        return false;
    }
    let mut chars = label.chars();
    let first = chars.next().unwrap();
    first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric())
}
