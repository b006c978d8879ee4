use super::*;
use crate::lexer::tokenize;

fn classify(source: &str) -> Classification {
    let lexed = tokenize(source);
    let parsed = parse_lines(lexed.lines);
    parsed.lines[0].classification
}

#[test]
fn comment_line_classified() {
    assert_eq!(classify(".a comment\n"), Classification::Comment);
}

#[test]
fn blank_line_classified_as_comment() {
    assert_eq!(classify("\n"), Classification::Comment);
}

#[test]
fn start_is_a_directive() {
    assert_eq!(
        classify("COPY    START   1000\n"),
        Classification::Directive
    );
}

#[test]
fn lda_is_an_instruction() {
    assert_eq!(
        classify("FIRST   LDA     ALPHA\n"),
        Classification::Instruction
    );
}

#[test]
fn extended_format_instruction_still_classified_as_instruction() {
    assert_eq!(
        classify("        +JSUB   SUB1\n"),
        Classification::Instruction
    );
}

#[test]
fn unknown_mnemonic_classified_as_instruction_not_error() {
    // Unknown mnemonics are flagged by Pass 1, not the parser.
    assert_eq!(classify("        BOGUS   X\n"), Classification::Instruction);
}
