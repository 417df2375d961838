use std::fs;
use std::path::PathBuf;

use clap::Parser;
use jabberwock::Interpreter;
use miette::IntoDiagnostic;
use miette::WrapErr;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Evaluates a JABBERWOCK program and prints every variable it binds.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program to run, one assignment per line.
    filename: PathBuf,

    /// Render each diagnostic as a full report with the offending source.
    #[arg(long)]
    report: bool,
}

fn main() -> miette::Result<()> {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }

    let args = Args::parse();

    let file_contents = fs::read_to_string(&args.filename)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading `{}` failed", args.filename.display()))?;

    let environment = Interpreter::new(args.filename.to_str(), &file_contents).run(|line, e| {
        eprintln!("[line {line}] Error: {e}");
        if args.report {
            eprintln!("{e:?}");
        }
    });

    print!("{environment}");
    Ok(())
}
