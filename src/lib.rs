//! # SIC/XE Assembler
//!
//! A two-pass assembler for the SIC/XE (Simplified Instructional Computer,
//! Extended) architecture.
//!
//! ## Pipeline
//!
//! Five components run in strict sequence:
//!
//! 1. **Operation Tables** (`optab`) — static mnemonic/directive/register
//!    tables.
//! 2. **Source Parser** (`lexer` + `parser`) — tokenizes and classifies
//!    each line.
//! 3. **Pass 1** (`first_pass`) — assigns addresses, builds SYMTAB and
//!    LITTAB.
//! 4. **Pass 2** (`encoder`) — generates object code and relocation
//!    records.
//! 5. **Object Writer** (`writer`) — emits H/T/M/E object records and the
//!    listing file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sicxe_assembler::{lexer::tokenize, parser::parse_lines, first_pass::first_pass, encoder::encode, writer};
//!
//! let source = std::fs::read_to_string("program.asm").unwrap();
//! let lexed = tokenize(&source);
//! let parsed = parse_lines(lexed.lines);
//! let first = first_pass(parsed.lines);
//! let encoded = encode(first.instructions, &first.symbol_table, &first.literal_table);
//!
//! let object = writer::write_object(
//!     "PROG",
//!     first.start_address,
//!     first.program_length,
//!     &encoded.instructions,
//!     &first.literal_table,
//!     &encoded.modification_records,
//!     &first.symbol_table,
//! );
//! ```

pub mod addressing;
pub mod encoder;
pub mod error;
pub mod first_pass;
pub mod instruction;
pub mod lexer;
pub mod literal;
pub mod optab;
pub mod parser;
pub mod writer;
