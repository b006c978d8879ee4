use super::*;
use crate::first_pass::first_pass;
use crate::instruction::ObjectCode;
use crate::lexer::tokenize;
use crate::parser::parse_lines;

fn run(source: &str) -> EncodeResult {
    let lexed = tokenize(source);
    let parsed = parse_lines(lexed.lines);
    let first = first_pass(parsed.lines);
    encode(
        first.instructions,
        &first.symbol_table,
        &first.literal_table,
    )
}

fn hex_of(result: &EncodeResult, line: usize) -> &str {
    match &result.instructions[line - 1].object_code {
        ObjectCode::Hex(h) => h,
        other => panic!("line {line}: expected Hex, got {other:?}"),
    }
}

#[test]
fn scenario_a_minimal_program() {
    let result = run("COPY    START   1000\n\
         FIRST   LDA     ALPHA\n\
         \x20       STA     BETA\n\
         ALPHA   WORD    5\n\
         BETA    RESW    1\n\
         \x20       END     FIRST\n");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(hex_of(&result, 2), "032003");
    assert_eq!(hex_of(&result, 3), "0F2003");
    assert_eq!(hex_of(&result, 4), "000005");
}

#[test]
fn scenario_b_format_four_relocation() {
    let result = run("PROG    START   1000\n\
         \x20       ORG     1010\n\
         \x20       +JSUB   SUB1\n\
         SUB1    EQU     2040\n\
         \x20       END     PROG\n");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(hex_of(&result, 3), "4B102040");
    assert_eq!(result.modification_records, vec![(0x1011, 5)]);
}

#[test]
fn scenario_c_immediate_numeric_no_symbol_lookup() {
    let result = run("PROG    START   0\n\
         \x20       LDA     #3\n\
         \x20       END     PROG\n");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    // n=0,i=1 -> byte0 = (opcode&0xFC)|0|1 = 0x01; raw value 3, b=p=e=0.
    assert_eq!(hex_of(&result, 2), "010003");
    assert!(result.modification_records.is_empty());
}

#[test]
fn scenario_d_base_relative_fallback() {
    let result = run("PROG    START   1000\n\
         \x20       BASE    B1\n\
         \x20       LDA     TARGET\n\
         \x20       ORG     3000\n\
         B1      RESB    1\n\
         \x20       ORG     3500\n\
         TARGET  RESB    1\n\
         \x20       END     PROG\n");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    // disp = 0x3500 - 0x3000 = 0x500, b=1,p=0.
    assert_eq!(hex_of(&result, 3), "034500");
}

#[test]
fn rsub_encodes_with_zero_displacement() {
    let result = run("PROG    START   1000\n        RSUB\n        END     PROG\n");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(hex_of(&result, 2), "4F0000");
}

#[test]
fn undefined_symbol_is_an_error() {
    let result = run("PROG    START   0\n        LDA     MISSING\n        END     PROG\n");
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e.kind, ErrorKind::UndefinedSymbol(ref s) if s == "MISSING")));
}

#[test]
fn word_with_symbol_operand_is_a_format_error() {
    let result =
        run("PROG    START   0\nALPHA   RESW    1\nVAL     WORD    ALPHA\n        END     PROG\n");
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e.kind, ErrorKind::FormatError)));
}

#[test]
fn format_two_encodes_two_registers() {
    let result = run("PROG    START   0\n        COMPR   A,B\n        END     PROG\n");
    assert_eq!(hex_of(&result, 2), "A003");
}

#[test]
fn format_one_is_just_the_opcode() {
    let result = run("PROG    START   0\n        FIX\n        END     PROG\n");
    assert_eq!(hex_of(&result, 2), "C4");
}
