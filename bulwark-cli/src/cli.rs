//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Bulwark -- advisory repository export tool.
///
/// Use `bulwark <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "bulwark", version, about, long_about = None)]
pub struct Cli {
    /// Path to the bulwark.toml configuration file.
    #[arg(short, long, global = true, default_value = "bulwark.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Format of command reports (the export stream itself is unaffected).
    #[arg(long, global = true, default_value = "text")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export merged advisory data from one or more advisories repositories.
    Export(ExportArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- export ----

/// Merge advisory documents across repositories and stream them out.
///
/// When the same package appears in several repositories, the document from
/// the first listed repository is exported.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory containing an advisories repository (repeatable, first wins).
    #[arg(short = 'a', long = "advisories-repo-dir", value_delimiter = ',')]
    pub advisories_repo_dirs: Vec<PathBuf>,

    /// Output location (default: stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format (jsonl, yaml).
    #[arg(long)]
    pub format: Option<String>,

    /// Do not auto-detect the distro from the current directory's git remotes.
    #[arg(long)]
    pub no_distro_detection: bool,
}

// ---- config ----

/// Manage bulwark configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, index, export).
        #[arg(long)]
        section: Option<String>,
    },
}
