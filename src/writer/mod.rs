//! # Object Writer & Listing Writer
//!
//! Emits the canonical H/T/M/E object record stream and, optionally, a
//! columnar listing file, from Pass 2's completed instruction stream.
//!
//! Literals never get their own `Instruction` record (§4.4), so their
//! bytes are merged into the text-record stream here, by address, beside
//! the instructions that reference them.


use crate::encoder::{literal_chunks, ModificationRecord};
use crate::first_pass::literal_table::LiteralTable;
use crate::first_pass::symbol_table::SymbolTable;
use crate::instruction::{Instruction, ObjectCode};
use crate::parser::Classification;

const MAX_TEXT_RECORD_BYTES: usize = 30;

/// A contiguous run of object-code bytes destined for one `T` record.
struct TextRecord {
    start: u32,
    hex: String,
}

/// Accumulates object-code bytes into maximal runs no longer than 30 bytes,
/// the way `output_generator.py._generate_text_records` folds codes into
/// `current_record` one instruction at a time.
#[derive(Default)]
struct TextRecordBuilder {
    records: Vec<TextRecord>,
    start: Option<u32>,
    hex: String,
}

impl TextRecordBuilder {
    fn push(&mut self, addr: u32, code: &str) {
        if self.start.is_none() {
            self.start = Some(addr);
        }
        if self.hex.len() + code.len() > MAX_TEXT_RECORD_BYTES * 2 {
            self.flush();
            self.start = Some(addr);
        }
        self.hex.push_str(code);
    }

    /// Ends the current record, if any bytes have accumulated. Called both
    /// on overflow and whenever a non-comment line emits no object code —
    /// directives that emit no code terminate the current record (§4.7iii).
    fn flush(&mut self) {
        if let Some(start) = self.start.take() {
            if !self.hex.is_empty() {
                self.records.push(TextRecord {
                    start,
                    hex: std::mem::take(&mut self.hex),
                });
            }
        }
    }

    fn finish(mut self) -> Vec<TextRecord> {
        self.flush();
        self.records
    }
}

/// Walk instructions in program order, flushing the current text record
/// whenever a non-comment line yields no object code, and interleaving
/// literal-pool bytes (which never get their own `Instruction` record) at
/// the address their flush point assigned them.
fn build_text_records(
    instructions: &[Instruction],
    literal_table: &LiteralTable,
) -> Vec<TextRecord> {
    let mut literals = literal_chunks(literal_table);
    literals.sort_by_key(|(addr, _, _)| *addr);
    let mut literals = literals.into_iter().peekable();

    let mut builder = TextRecordBuilder::default();

    for instr in instructions {
        if instr.classification == Classification::Comment {
            continue;
        }
        while let Some(&(addr, _, _)) = literals.peek() {
            if addr >= instr.address {
                break;
            }
            let (addr, hex, _) = literals.next().unwrap();
            builder.push(addr, &hex);
        }
        match &instr.object_code {
            ObjectCode::Hex(hex) => builder.push(instr.address, hex),
            ObjectCode::None | ObjectCode::Error => builder.flush(),
        }
    }
    for (addr, hex, _) in literals {
        builder.push(addr, &hex);
    }

    builder.finish()
}

/// Produce the full object-program text: one `H` record, the `T` records,
/// one `M` record per relocation site, then one `E` record.
#[must_use]
pub fn write_object(
    program_name: &str,
    start_address: u32,
    program_length: u32,
    instructions: &[Instruction],
    literal_table: &LiteralTable,
    modification_records: &[ModificationRecord],
    symbol_table: &SymbolTable,
) -> String {
    let mut out = String::new();

    let name: String = program_name.chars().take(6).collect();
    out.push_str(&format!(
        "H^{name:<6}^{start_address:06X}^{program_length:06X}\n"
    ));

    for record in build_text_records(instructions, literal_table) {
        let length = record.hex.len() / 2;
        out.push_str(&format!(
            "T^{:06X}^{length:02X}^{}\n",
            record.start, record.hex
        ));
    }

    for (addr, len) in modification_records {
        out.push_str(&format!("M^{addr:06X}^{len:02X}\n"));
    }

    let entry = end_entry_address(instructions, symbol_table);
    out.push_str(&format!("E^{entry:06X}\n"));

    out
}

fn end_entry_address(instructions: &[Instruction], symbol_table: &SymbolTable) -> u32 {
    instructions
        .iter()
        .find(|instr| instr.mnemonic.as_deref() == Some("END"))
        .filter(|instr| !instr.operand.is_empty())
        .and_then(|instr| symbol_table.get(&instr.operand))
        .unwrap_or(0)
}

/// Produce the columnar listing: a header row, a separator row, then one
/// row per source line (blank LOC/OBJECT CODE columns for pure comments).
#[must_use]
pub fn write_listing(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    out.push_str("LINE  LOC   OBJECT CODE   SOURCE STATEMENT\n");
    out.push_str("====  ====  ============  ================\n");

    for instr in instructions {
        let line = format!("{:>4}", instr.line_number);

        if instr.classification == Classification::Comment {
            out.push_str(&format!(
                "{line}                             {}\n",
                instr.original_text
            ));
            continue;
        }

        let loc = format!("{:04X}", instr.address);
        let object_code = match &instr.object_code {
            ObjectCode::Hex(hex) => hex.clone(),
            ObjectCode::Error => "ERROR".to_string(),
            ObjectCode::None => String::new(),
        };

        let label = instr.label.as_deref().unwrap_or("");
        let mnemonic = instr.mnemonic.as_deref().unwrap_or("");
        out.push_str(&format!(
            "{line}  {loc:4}  {object_code:<12}  {label:<8} {mnemonic:<8} {}\n",
            instr.operand
        ));
    }

    out
}
