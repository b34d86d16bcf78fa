//! Report rendering for `bulwark` subcommands
//!
//! `config` reports go to stdout. `export` reports go to stderr, since stdout
//! may be carrying the export stream itself.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Renders reports as text or pretty JSON according to `--output-format`.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a report to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        self.render_to(payload, &mut std::io::stdout().lock())
    }

    /// Render a report to stderr, leaving stdout to the export sink.
    pub fn render_stderr<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        self.render_to(payload, &mut std::io::stderr().lock())
    }

    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        w.flush()?;
        Ok(())
    }
}

/// Text form of a report; the JSON form comes from `Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}
