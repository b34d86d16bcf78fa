//! CLI-specific error types and exit code mapping

use bulwark_advisory::AdvisoryIndexError;
use bulwark_core::error::{BulwarkError, ConfigError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// No advisories repository given and auto-detection failed.
    #[error("no advisories repo dir specified, and distro auto-detection failed: {0}")]
    Distro(String),

    /// Indexing, merging or streaming advisory data failed.
    #[error("{0}")]
    Export(String),

    /// The output file could not be created.
    #[error("unable to create output file {path}: {source}")]
    CreateOutput {
        path: String,
        source: std::io::Error,
    },

    /// JSON serialisation failed during report rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout/stderr write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from bulwark-core.
    #[error("{0}")]
    Core(BulwarkError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                        |
    /// |------|--------------------------------|
    /// | 0    | Success                        |
    /// | 1    | General / export error         |
    /// | 2    | Configuration error            |
    /// | 3    | Distro detection failed        |
    /// | 10   | IO error                       |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Core(BulwarkError::Config(_)) => 2,
            Self::Distro(_) => 3,
            Self::Io(_) | Self::CreateOutput { .. } | Self::Core(BulwarkError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Export(_) | Self::Core(_) => 1,
        }
    }
}

impl From<BulwarkError> for CliError {
    fn from(e: BulwarkError) -> Self {
        Self::Core(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Core(BulwarkError::Config(e))
    }
}

impl From<AdvisoryIndexError> for CliError {
    fn from(e: AdvisoryIndexError) -> Self {
        match e {
            AdvisoryIndexError::Config { .. } => Self::Core(e.into()),
            other => Self::Export(other.to_string()),
        }
    }
}
