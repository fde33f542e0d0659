//! Command-line interface for selconv.
//!
//! Usage:
//!   selconv [OPTIONS] <PATHS>...
//!
//! Each selection file is converted next to itself, with its extension
//! replaced. A file that fails to parse is reported and skipped; the others
//! are still converted.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use selconv::interface::{Batch, Outcome, Sink};
use selconv::render::Format;
use selconv::settings::Loader;

#[derive(Parser, Debug)]
#[command(name = "selconv", version, about = "Converts legacy selection files into structured queries")]
struct Cli {
    /// Selection files to convert
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// TOML settings file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Facet name to drop (repeatable)
    #[arg(long, short = 'x', value_name = "NAME")]
    exclude: Vec<String>,

    /// Extension substituted on the input path for the output
    #[arg(long, short = 'e')]
    extension: Option<String>,

    /// Worker threads, 0 for one per CPU
    #[arg(long, short = 'j')]
    workers: Option<usize>,

    /// Output format (text or json)
    #[arg(long, short = 'f')]
    format: Option<Format>,

    /// Refuse to replace existing outputs
    #[arg(long)]
    no_overwrite: bool,

    /// Print renderings instead of writing files
    #[arg(long)]
    stdout: bool,

    /// More logging (repeatable)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> selconv::Result<selconv::settings::Settings> {
    let mut loader = Loader::new();
    loader = match &cli.config {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file("selconv.toml"),
    };
    loader = loader.with_env().exclude(cli.exclude.iter().cloned());
    if let Some(extension) = &cli.extension {
        loader = loader.set_override("output_extension", extension.trim_start_matches('.').to_string())?;
    }
    if let Some(workers) = cli.workers {
        loader = loader.set_override("workers", workers as i64)?;
    }
    if let Some(format) = cli.format {
        loader = loader.set_override("format", format.to_string())?;
    }
    if cli.no_overwrite {
        loader = loader.set_override("overwrite", false)?;
    }
    loader.build()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            error!(%e, "invalid settings");
            return ExitCode::from(2);
        }
    };
    let sink = if cli.stdout { Sink::Collect } else { Sink::Files };
    let reports = Batch::new(settings).with_sink(sink).run(&cli.paths);

    let mut failures = 0usize;
    for report in &reports {
        match &report.outcome {
            Outcome::Written(output) => println!("{} -> {}", report.path.display(), output.display()),
            Outcome::Collected(rendered) => {
                println!("# {}", report.path.display());
                print!("{}", rendered);
            }
            Outcome::Empty => println!("{}: empty, nothing written", report.path.display()),
            Outcome::Skipped(reason) => println!("{}: skipped, {}", report.path.display(), reason),
            Outcome::Cancelled => println!("{}: cancelled", report.path.display()),
            Outcome::Failed(e) => {
                failures += 1;
                eprintln!("{}: {}", report.path.display(), e);
            }
        }
    }
    if failures > 0 {
        error!(failures, total = reports.len(), "some files failed to convert");
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
