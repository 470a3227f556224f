//! The Folio Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the library: loading, rendering and printing.

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, FolioArgs};
use crate::engine::{self, BuildOptions};
use crate::errors::{print_error, FolioError};

pub mod args;
pub mod output;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "FOLIO_LOG";

/// The main entry point for the CLI.
pub fn run() {
    let args = FolioArgs::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Build {
            portfolio,
            out,
            sequential,
        } => handle_build(&portfolio, out, !sequential, false),
        Command::Check { portfolio } => handle_build(&portfolio, None, true, true),
        Command::Stages { template, json } => handle_stages(&template, json).map_err(|e| vec![e]),
        Command::Show { portfolio, json } => handle_show(&portfolio, json).map_err(|e| vec![e]),
    };

    if let Err(errors) = result {
        for error in errors {
            print_error(error);
        }
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "folio=warn",
        1 => "folio=info",
        _ => "folio=debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Handles `build` and `check`. Every page failure is reported, not only the first.
fn handle_build(path: &Path, outdir: Option<PathBuf>, parallel: bool, dry_run: bool) -> Result<(), Vec<FolioError>> {
    let portfolio = engine::load_portfolio(path).map_err(|e| vec![e])?;
    let options = BuildOptions {
        outdir,
        dry_run,
        parallel,
    };
    let report = engine::build_site(&portfolio, &options);

    output::print_pages(if dry_run { "checked" } else { "wrote" }, &report.pages);
    output::print_summary(report.pages.len(), report.failures.len());

    if report.is_success() {
        Ok(())
    } else {
        Err(report.failures)
    }
}

fn handle_stages(path: &Path, json: bool) -> Result<(), FolioError> {
    let template = engine::load_template(path)?;
    if json {
        output::print_json(&template.stages).map_err(|e| stdout_error(e.into()))
    } else {
        print!("{template}");
        Ok(())
    }
}

fn handle_show(path: &Path, json: bool) -> Result<(), FolioError> {
    let portfolio = engine::load_portfolio(path)?;
    if json {
        output::print_json(&portfolio).map_err(|e| stdout_error(e.into()))
    } else {
        output::print_portfolio(&portfolio);
        Ok(())
    }
}

fn stdout_error(error: io::Error) -> FolioError {
    FolioError::io("could not write", Path::new("<stdout>"), &error)
}
