use sicxe_assembler::encoder::encode;
use sicxe_assembler::error::{AsmError, ErrorKind};
use sicxe_assembler::first_pass::first_pass;
use sicxe_assembler::lexer::tokenize;
use sicxe_assembler::parser::parse_lines;
use sicxe_assembler::writer::{write_listing, write_object};

struct Assembled {
    object: String,
    listing: String,
    errors: Vec<AsmError>,
}

fn assemble(source: &str) -> Assembled {
    let lexed = tokenize(source);
    let parsed = parse_lines(lexed.lines);
    let first = first_pass(parsed.lines);
    let encoded = encode(
        first.instructions,
        &first.symbol_table,
        &first.literal_table,
    );

    let program_name = encoded
        .instructions
        .iter()
        .find(|i| i.mnemonic.as_deref() == Some("START"))
        .and_then(|i| i.label.as_deref())
        .unwrap_or("")
        .to_string();

    let object = write_object(
        &program_name,
        first.start_address,
        first.program_length,
        &encoded.instructions,
        &first.literal_table,
        &encoded.modification_records,
        &first.symbol_table,
    );
    let listing = write_listing(&encoded.instructions);

    let mut errors = Vec::new();
    errors.extend(lexed.errors);
    errors.extend(parsed.errors);
    errors.extend(first.errors);
    errors.extend(encoded.errors);

    Assembled {
        object,
        listing,
        errors,
    }
}

/// Scenario A — minimal program (spec §8): two instructions, a WORD
/// constant, a reserved word, assembled end to end into an object file.
#[test]
fn scenario_a_minimal_program() {
    let source = "COPY    START   1000\n\
                  FIRST   LDA     ALPHA\n\
                  \x20       STA     BETA\n\
                  ALPHA   WORD    5\n\
                  BETA    RESW    1\n\
                  \x20       END     FIRST\n";
    let result = assemble(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);

    let lines: Vec<&str> = result.object.lines().collect();
    assert_eq!(lines[0], "H^COPY  ^001000^00000C");
    assert_eq!(lines[1], "T^001000^09^0320030F2003000005");
    assert_eq!(lines[2], "E^001000");

    assert!(result.listing.contains("FIRST"));
}

/// Scenario B — format 4 forces a full 20-bit address and a modification
/// record for the loader.
#[test]
fn scenario_b_format_four_relocation() {
    let source = "PROG    START   1000\n\
                  \x20       ORG     1010\n\
                  \x20       +JSUB   SUB1\n\
                  SUB1    EQU     2040\n\
                  \x20       END     PROG\n";
    let result = assemble(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.object.contains("4B102040"));
    assert!(result.object.lines().any(|l| l == "M^001011^05"));
}

/// Scenario C — a numeric `#` immediate is a raw value, not a symbol, so
/// no modification record is ever generated for it.
#[test]
fn scenario_c_immediate_numeric() {
    let source = "PROG    START   0\n        LDA     #3\n        END     PROG\n";
    let result = assemble(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(!result.object.lines().any(|l| l.starts_with('M')));
}

/// Scenario D — a target out of PC-relative range falls back to
/// base-relative addressing once BASE names a register value.
#[test]
fn scenario_d_base_relative_fallback() {
    let source = "PROG    START   1000\n\
                  \x20       BASE    B1\n\
                  \x20       LDA     TARGET\n\
                  \x20       ORG     3000\n\
                  B1      RESB    1\n\
                  \x20       ORG     3500\n\
                  TARGET  RESB    1\n\
                  \x20       END     PROG\n";
    let result = assemble(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.object.contains("034500"));
}

/// Scenario E — literals flush at LTORG, which itself emits no code and so
/// terminates the record in progress; the flushed literal then shares the
/// next record with the code that follows it, even though it has no
/// `Instruction` record of its own.
#[test]
fn scenario_e_literals_and_ltorg() {
    let source = "PROG    START   0\n\
                  \x20       LDA     =C'EOF'\n\
                  \x20       LTORG\n\
                  \x20       LDA     =X'05'\n\
                  \x20       END     PROG\n";
    let result = assemble(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let text_lines: Vec<&str> = result
        .object
        .lines()
        .filter(|l| l.starts_with('T'))
        .collect();
    assert_eq!(
        text_lines,
        ["T^000000^03^032000", "T^000003^07^454F4603200005"]
    );
}

/// Scenario F — a duplicate symbol is reported but assembly continues,
/// and the location counter still advances past the duplicate line.
#[test]
fn scenario_f_duplicate_symbol() {
    let source = "PROG    START   0\n\
                  X       RESB    1\n\
                  X       RESB    1\n\
                  NEXT    RESB    1\n\
                  \x20       END     PROG\n";
    let result = assemble(source);
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(&e.kind, ErrorKind::DuplicateSymbol(s) if s == "X")));
    assert!(result.listing.contains("NEXT"));
}

#[test]
fn displacement_out_of_range_without_base() {
    let source = "PROG    START   0\n\
                  \x20       LDA     FAR\n\
                  \x20       ORG     5000\n\
                  FAR     RESB    1\n\
                  \x20       END     PROG\n";
    let result = assemble(source);
    assert!(result
        .errors
        .iter()
        .any(|e| e.kind == ErrorKind::DisplacementError));
}

#[test]
fn unknown_mnemonic_is_reported_and_assembly_continues() {
    let source = "PROG    START   0\n        BOGUS   X\nNEXT    RESB    1\n        END     PROG\n";
    let result = assemble(source);
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(&e.kind, ErrorKind::OpcodeError(m) if m == "BOGUS")));
    assert!(result.listing.contains("NEXT"));
}

#[test]
fn round_trip_text_record_bytes_cover_the_program() {
    let source = "COPY    START   1000\n\
                  FIRST   LDA     ALPHA\n\
                  \x20       STA     BETA\n\
                  ALPHA   WORD    5\n\
                  BETA    RESW    1\n\
                  \x20       END     FIRST\n";
    let result = assemble(source);
    let text_bytes: usize = result
        .object
        .lines()
        .filter(|l| l.starts_with('T'))
        .map(|l| {
            let len_field = l.split('^').nth(2).unwrap();
            usize::from_str_radix(len_field, 16).unwrap()
        })
        .sum();
    // program_length (0xC) minus the one reserved word (BETA RESW 1 = 3 bytes).
    assert_eq!(text_bytes, 0xC - 3);
}
