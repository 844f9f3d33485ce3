//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputMode;

#[derive(Debug, Parser)]
#[command(
    name = "rigger",
    version,
    about = "Find the design parameters in a front-end project and wire them to custom properties"
)]
pub struct Cli {
    /// Project root
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputMode::Auto)]
    pub output: OutputMode,

    /// Log at debug level (otherwise RIGGER_LOG, default warn)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Detect the project, pick a stylesheet and list its parameters
    Scan {
        /// Use this stylesheet instead of the top-ranked one
        #[arg(long)]
        css: Option<PathBuf>,
    },
    /// Rank the project's stylesheets
    Candidates,
    /// Extract parameters from one stylesheet
    Css { file: PathBuf },
    /// Extract parameters from one theme configuration
    Tokens {
        file: PathBuf,
        /// Maximum number of tokens (defaults to `token_limit`)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the rewrite as a unified diff
    Plan {
        #[arg(long)]
        css: Option<PathBuf>,
        /// Overrides file: a snapshot or a bare `{ "id": value }` object
        #[arg(long)]
        overrides: Option<PathBuf>,
    },
    /// Rewrite the stylesheet and write the configuration document
    Apply {
        #[arg(long)]
        css: Option<PathBuf>,
        #[arg(long)]
        overrides: Option<PathBuf>,
    },
    /// Write a snapshot of the current parameter values
    Snapshot {
        #[arg(long)]
        css: Option<PathBuf>,
        #[arg(long)]
        overrides: Option<PathBuf>,
    },
}
