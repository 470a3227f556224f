//! Defines the command-line arguments and subcommands for the Folio CLI.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Generates static portfolio pages from templates."
)]
pub struct FolioArgs {
    /// More log output (-v info, -vv debug). FOLIO_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the home page and every persona page into the output directory.
    Build {
        /// The portfolio file.
        #[arg(required = true)]
        portfolio: PathBuf,
        /// Write pages here instead of the portfolio's `$outdir`.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Render persona pages one after another instead of in parallel.
        #[arg(long)]
        sequential: bool,
    },
    /// Parse the portfolio and its templates and render every page without writing.
    Check {
        #[arg(required = true)]
        portfolio: PathBuf,
    },
    /// Print the stage tree of a template.
    Stages {
        #[arg(required = true)]
        template: PathBuf,
        /// Print the tree as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the parsed portfolio.
    Show {
        #[arg(required = true)]
        portfolio: PathBuf,
        /// Print the portfolio as JSON.
        #[arg(long)]
        json: bool,
    },
}
