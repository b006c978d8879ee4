fn main() {
    use sicxe_assembler::encoder::encode;
    use sicxe_assembler::first_pass::first_pass;
    use sicxe_assembler::lexer::tokenize;
    use sicxe_assembler::parser::parse_lines;
    use sicxe_assembler::writer::write_object;

    let source = "PROG    START   0\n\
                  \x20       LDA     =C'EOF'\n\
                  \x20       LTORG\n\
                  \x20       LDA     =X'05'\n\
                  \x20       END     PROG\n";
    let lexed = tokenize(source);
    let parsed = parse_lines(lexed.lines);
    let first = first_pass(parsed.lines);
    let encoded = encode(first.instructions, &first.symbol_table, &first.literal_table);
    let object = write_object("PROG", 0, 0x000A, &encoded.instructions, &first.literal_table, &encoded.modification_records, &first.symbol_table);
    println!("{object}");
}
