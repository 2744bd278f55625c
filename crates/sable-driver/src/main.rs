use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sable_driver::{
    format_plain, format_type_table, load_program, load_source, run_check, to_json, CheckRun,
};
use sable_typeck::Diagnostic;

#[derive(Parser)]
#[command(
    name = "sable",
    version = "0.1.0",
    about = "Sable structural type checker",
    long_about = "Type checks a name-resolved Sable program tree and reports\nstructural type errors."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type check a resolved program tree (JSON)
    Check {
        /// Input program tree
        input: PathBuf,

        /// Source text the tree was parsed from, used to render diagnostics with context
        #[arg(long)]
        source: Option<PathBuf>,

        /// Print the type table after checking
        #[arg(long)]
        dump_types: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Diagnostics for people
    Human,
    /// `{ program, type_table, diagnostics }` on stdout
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            input,
            source,
            dump_types,
            format,
            verbose,
        } => {
            init_tracing(verbose);
            check_command(input, source, dump_types, format)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose && std::env::var_os("RUST_LOG").is_none() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn check_command(
    input: PathBuf,
    source: Option<PathBuf>,
    dump_types: bool,
    format: OutputFormat,
) -> ExitCode {
    tracing::debug!(input = %input.display(), "type checking");

    let program = match load_program(&input) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source_text = match source.as_deref().map(load_source).transpose() {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let run = run_check(program);

    match format {
        OutputFormat::Json => match to_json(&run) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: cannot serialize results: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Human => print_human(&run, source_text.as_deref(), dump_types),
    }

    if run.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_human(run: &CheckRun, source: Option<&str>, dump_types: bool) {
    if dump_types {
        print!("{}", format_type_table(&run.output.type_table));
    }

    for diag in &run.output.diagnostics {
        match source {
            Some(source) => {
                if let Err(e) = report_error(diag, source) {
                    tracing::warn!(error = %e, "falling back to plain diagnostics");
                    eprintln!("{}", format_plain(diag));
                }
            }
            None => eprintln!("{}", format_plain(diag)),
        }
    }

    match run.output.diagnostics.len() {
        0 => println!("Type check passed!"),
        1 => eprintln!("1 type error"),
        n => eprintln!("{} type errors", n),
    }
}

fn report_error(diag: &Diagnostic, source: &str) -> io::Result<()> {
    let filename = diag.location.file.as_str();
    let span = (filename, diag.location.start..diag.location.end);

    Report::build(ReportKind::Error, span.clone())
        .with_code("E2000")
        .with_message("Type error")
        .with_label(
            Label::new(span)
                .with_message(&diag.message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}
