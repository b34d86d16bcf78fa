//! tracing subscriber setup
//!
//! Log lines always go to stderr; stdout belongs to the export stream.

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use bulwark_core::config::GeneralConfig;

/// Install the global subscriber from `[general]`.
///
/// `RUST_LOG`, when set, replaces `log_level`. `log_format` selects JSON lines
/// (`json`) or the multi-line human format (`pretty`).
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let json = match config.log_format.as_str() {
        "json" => true,
        "pretty" => false,
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let pretty_layer = (!json).then(|| fmt::layer().pretty().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}
