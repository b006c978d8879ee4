use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use sicxe_assembler::encoder::encode;
use sicxe_assembler::error::AsmError;
use sicxe_assembler::first_pass::first_pass;
use sicxe_assembler::lexer::tokenize;
use sicxe_assembler::parser::parse_lines;
use sicxe_assembler::writer::{write_listing, write_object};

/// A two-pass assembler for the SIC/XE instructional computer architecture.
#[derive(Parser)]
#[command(version, author)]
struct Opts {
    /// SIC/XE assembly source file.
    input: PathBuf,

    /// Skip writing the `.lst` listing file.
    #[arg(long)]
    no_listing: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let opts = Opts::parse();

    let source = fs::read_to_string(&opts.input)
        .with_context(|| format!("failed to read '{}'", opts.input.display()))?;
    debug!(path = %opts.input.display(), bytes = source.len(), "read source");

    let lexed = tokenize(&source);
    report_errors(&lexed.errors);

    let parsed = parse_lines(lexed.lines);
    report_errors(&parsed.errors);

    let first = first_pass(parsed.lines);
    debug!(
        symbols = first.symbol_table.len(),
        start = format!("{:06X}", first.start_address),
        length = format!("{:06X}", first.program_length),
        "pass 1 complete"
    );
    report_errors(&first.errors);

    let encoded = encode(
        first.instructions,
        &first.symbol_table,
        &first.literal_table,
    );
    debug!(
        modifications = encoded.modification_records.len(),
        "pass 2 complete"
    );
    report_errors(&encoded.errors);

    let program_name = encoded
        .instructions
        .iter()
        .find(|i| i.mnemonic.as_deref() == Some("START"))
        .and_then(|i| i.label.as_deref())
        .unwrap_or("");

    let object = write_object(
        program_name,
        first.start_address,
        first.program_length,
        &encoded.instructions,
        &first.literal_table,
        &encoded.modification_records,
        &first.symbol_table,
    );

    let stem = opts
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let obj_path = opts.input.with_file_name(format!("{stem}.obj"));
    fs::write(&obj_path, object)
        .with_context(|| format!("failed to write '{}'", obj_path.display()))?;
    info!(path = %obj_path.display(), "wrote object file");

    if !opts.no_listing {
        let listing = write_listing(&encoded.instructions);
        let lst_path = opts.input.with_file_name(format!("{stem}.lst"));
        fs::write(&lst_path, listing)
            .with_context(|| format!("failed to write '{}'", lst_path.display()))?;
        info!(path = %lst_path.display(), "wrote listing file");
    }

    Ok(())
}

fn report_errors(errors: &[AsmError]) {
    for err in errors {
        eprintln!("{err}");
    }
}
