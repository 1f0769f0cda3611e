//! Argument parsing for the `relnotes` binary.
//!
//! Exposed as a library so `xtask` can render man pages and shell completions
//! from the same definition ([`command()`]), and so command handlers can be
//! unit tested without spawning the binary.

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// When to colorize human-readable output.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Plain text.
    Never,
}

impl ColorChoice {
    /// Set the process-wide `owo-colors` override.
    pub fn apply(self) {
        match self {
            Self::Auto => {}
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG             Log filter (e.g., debug, relnotes_core=trace)
    RELNOTES_LOG_PATH    Write logs to this file
    RELNOTES_LOG_DIR     Write logs to relnotes.jsonl in this directory
";

/// Top-level arguments.
#[derive(Parser)]
#[command(name = "relnotes")]
#[command(
    about = "Convert a release notes changelog into an AppStream <releases> block",
    long_about = None
)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Load this config file after any discovered ones
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub chdir: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,
}

/// Subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a changelog into an XML <releases> block
    Convert(commands::convert::ConvertArgs),

    /// Show version and effective configuration
    Info(commands::info::InfoArgs),

    /// Report config discovery and logging environment
    Doctor(commands::doctor::DoctorArgs),
}

/// The clap command tree, for man pages and completions.
pub fn command() -> clap::Command {
    Cli::command()
}
