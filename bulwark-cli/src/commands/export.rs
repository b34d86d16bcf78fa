//! `bulwark export` command handler

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use bulwark_advisory::{
    AdvisoryIndexConfig, AdvisoryIndexError, ExportFormat, ExportOptions, IndexSet, export,
};
use bulwark_core::config::BulwarkConfig;

use crate::cli::ExportArgs;
use crate::distro::{self, DetectedDistro};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `export` command.
pub async fn execute(
    args: ExportArgs,
    config: &BulwarkConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let roots = resolve_roots(&args, config, distro::detect)?;
    let format = resolve_format(&args, config)?;
    let output = resolve_output(&args, config);
    let index_config = AdvisoryIndexConfig::from_core(&config.index);

    info!(
        roots = roots.len(),
        format = %format,
        output = output
            .as_deref()
            .map_or_else(|| "stdout".to_owned(), |p| p.display().to_string()),
        "exporting advisory data"
    );

    let set = IndexSet::build(&roots, &index_config)
        .await
        .map_err(index_error)?;

    let options = ExportOptions { format };
    let sink_path = output.clone();
    let summary = tokio::task::spawn_blocking(move || -> Result<_, CliError> {
        let mut sink = open_sink(sink_path.as_deref())?;
        export(&set, &options, &mut sink)
            .map_err(|e| CliError::Export(format!("unable to export advisory data: {e}")))
    })
    .await
    .map_err(|e| CliError::Command(format!("export task failed: {e}")))??;

    let report = ExportReport {
        repositories: roots.iter().map(|r| r.display().to_string()).collect(),
        output: output.map_or_else(|| "stdout".to_owned(), |p| p.display().to_string()),
        format: format.to_string(),
        records: summary.records,
        bytes: summary.bytes,
        shadowed: summary.shadowed,
    };
    writer.render_stderr(&report)?;

    Ok(())
}

/// Decide which repositories to index, in precedence order.
///
/// Flags win over `[export].advisories_repo_dirs`. With neither, `detect` runs
/// unless detection is disabled by flag or config. The returned list is never
/// empty, so no output file is created for an export without sources.
fn resolve_roots<F>(
    args: &ExportArgs,
    config: &BulwarkConfig,
    detect: F,
) -> Result<Vec<PathBuf>, CliError>
where
    F: FnOnce() -> Result<DetectedDistro, CliError>,
{
    if !args.advisories_repo_dirs.is_empty() {
        return Ok(args.advisories_repo_dirs.clone());
    }

    if !config.export.advisories_repo_dirs.is_empty() {
        return Ok(config
            .export
            .advisories_repo_dirs
            .iter()
            .map(PathBuf::from)
            .collect());
    }

    if args.no_distro_detection || !config.export.detect_distro {
        return Err(CliError::Command(
            "no advisories repo dir specified".to_owned(),
        ));
    }

    let detected = detect()?;
    eprint!("{}", distro::render_detected_distro(&detected));
    Ok(vec![detected.advisories_repo_dir])
}

fn resolve_format(args: &ExportArgs, config: &BulwarkConfig) -> Result<ExportFormat, CliError> {
    let name = args.format.as_deref().unwrap_or(&config.export.format);
    ExportFormat::from_str_loose(name).ok_or_else(|| {
        CliError::Command(format!(
            "unknown export format: {} (expected: {})",
            name,
            ExportFormat::NAMES.join(", ")
        ))
    })
}

fn resolve_output(args: &ExportArgs, config: &BulwarkConfig) -> Option<PathBuf> {
    args.output.clone().or_else(|| {
        (!config.export.output.is_empty()).then(|| PathBuf::from(&config.export.output))
    })
}

fn index_error(e: AdvisoryIndexError) -> CliError {
    match e {
        AdvisoryIndexError::Config { .. } => e.into(),
        other => CliError::Export(format!("unable to index advisory configs: {other}")),
    }
}

/// stdout when no path is given, otherwise a newly created (truncated) file.
fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>, CliError> {
    match path {
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::CreateOutput {
                path: path.display().to_string(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

/// Export summary report.
#[derive(Serialize)]
pub struct ExportReport {
    /// Indexed repositories in precedence order
    pub repositories: Vec<String>,
    /// Output location
    pub output: String,
    /// Export format
    pub format: String,
    /// Records written
    pub records: usize,
    /// Bytes written
    pub bytes: usize,
    /// Documents dropped in favor of an earlier repository
    pub shadowed: usize,
}

impl Render for ExportReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Exported {} advisory records ({} bytes, {}) to {}",
            self.records.to_string().bold(),
            self.bytes,
            self.format,
            self.output.bold()
        )?;
        for (i, repo) in self.repositories.iter().enumerate() {
            writeln!(w, "  [{}] {}", i + 1, repo)?;
        }
        if self.shadowed > 0 {
            writeln!(
                w,
                "  {} documents shadowed by earlier repositories",
                self.shadowed.to_string().yellow()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distro::KNOWN_DISTROS;

    fn args(dirs: &[&str]) -> ExportArgs {
        ExportArgs {
            advisories_repo_dirs: dirs.iter().map(PathBuf::from).collect(),
            output: None,
            format: None,
            no_distro_detection: false,
        }
    }

    fn never_detect() -> Result<DetectedDistro, CliError> {
        panic!("distro detection should not run");
    }

    #[test]
    fn test_resolve_roots_prefers_flags() {
        let mut config = BulwarkConfig::default();
        config.export.advisories_repo_dirs = vec!["/from/config".to_owned()];

        let roots = resolve_roots(&args(&["/a", "/b"]), &config, never_detect).unwrap();
        assert_eq!(roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn test_resolve_roots_falls_back_to_config() {
        let mut config = BulwarkConfig::default();
        config.export.advisories_repo_dirs = vec!["/x".to_owned(), "/y".to_owned()];

        let roots = resolve_roots(&args(&[]), &config, never_detect).unwrap();
        assert_eq!(roots, vec![PathBuf::from("/x"), PathBuf::from("/y")]);
    }

    #[test]
    fn test_resolve_roots_detection_disabled_by_flag() {
        let mut a = args(&[]);
        a.no_distro_detection = true;
        let err = resolve_roots(&a, &BulwarkConfig::default(), never_detect).unwrap_err();
        assert_eq!(err.to_string(), "no advisories repo dir specified");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_resolve_roots_detection_disabled_by_config() {
        let mut config = BulwarkConfig::default();
        config.export.detect_distro = false;
        let err = resolve_roots(&args(&[]), &config, never_detect).unwrap_err();
        assert!(err.to_string().contains("no advisories repo dir specified"));
    }

    #[tokio::test]
    async fn test_execute_without_roots_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.jsonl");

        let mut config = BulwarkConfig::default();
        config.export.advisories_repo_dirs = Vec::new();
        config.export.detect_distro = false;
        let export_args = ExportArgs {
            advisories_repo_dirs: Vec::new(),
            output: Some(out.clone()),
            format: None,
            no_distro_detection: false,
        };
        let writer = OutputWriter::new(crate::cli::OutputFormat::Json);

        let err = execute(export_args, &config, &writer).await.unwrap_err();
        assert!(err.to_string().contains("no advisories repo dir specified"));
        assert!(!out.exists(), "output file must not be created");
    }

    #[test]
    fn test_resolve_roots_uses_detected_distro() {
        let roots = resolve_roots(&args(&[]), &BulwarkConfig::default(), || {
            Ok(DetectedDistro {
                distro: &KNOWN_DISTROS[0],
                distro_repo_dir: None,
                advisories_repo_dir: PathBuf::from("/src/advisories"),
            })
        })
        .unwrap();
        assert_eq!(roots, vec![PathBuf::from("/src/advisories")]);
    }

    #[test]
    fn test_resolve_roots_propagates_detection_failure() {
        let err = resolve_roots(&args(&[]), &BulwarkConfig::default(), || {
            Err(CliError::Distro("not a git repository".to_owned()))
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_resolve_format_flag_overrides_config() {
        let mut a = args(&[]);
        a.format = Some("yml".to_owned());
        assert_eq!(
            resolve_format(&a, &BulwarkConfig::default()).unwrap(),
            ExportFormat::Yaml
        );
        assert_eq!(
            resolve_format(&args(&[]), &BulwarkConfig::default()).unwrap(),
            ExportFormat::Jsonl
        );
    }

    #[test]
    fn test_resolve_format_rejects_unknown() {
        let mut a = args(&[]);
        a.format = Some("csv".to_owned());
        let err = resolve_format(&a, &BulwarkConfig::default()).unwrap_err();
        assert!(err.to_string().contains("unknown export format"));
    }

    #[test]
    fn test_resolve_output() {
        let mut config = BulwarkConfig::default();
        assert_eq!(resolve_output(&args(&[]), &config), None);

        config.export.output = "/tmp/from-config.jsonl".to_owned();
        assert_eq!(
            resolve_output(&args(&[]), &config),
            Some(PathBuf::from("/tmp/from-config.jsonl"))
        );

        let mut a = args(&[]);
        a.output = Some(PathBuf::from("/tmp/flag.jsonl"));
        assert_eq!(
            resolve_output(&a, &config),
            Some(PathBuf::from("/tmp/flag.jsonl"))
        );
    }

    #[test]
    fn test_index_error_names_context() {
        let err = index_error(AdvisoryIndexError::RootUnavailable {
            root: "/missing".to_owned(),
            reason: "No such file or directory".to_owned(),
        });
        assert!(err.to_string().contains("unable to index advisory configs"));
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn test_open_sink_reports_create_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.jsonl");
        let err = open_sink(Some(&path)).err().expect("create should fail");
        assert_eq!(err.exit_code(), 10);
    }

    #[tokio::test]
    async fn test_execute_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("advisories");
        std::fs::create_dir_all(&repo).unwrap();
        std::fs::write(
            repo.join("curl.advisories.yaml"),
            "package:\n  name: curl\nadvisories: []\n",
        )
        .unwrap();
        let out = dir.path().join("out.jsonl");

        let export_args = ExportArgs {
            advisories_repo_dirs: vec![repo],
            output: Some(out.clone()),
            format: None,
            no_distro_detection: true,
        };
        let writer = OutputWriter::new(crate::cli::OutputFormat::Json);
        execute(export_args, &BulwarkConfig::default(), &writer)
            .await
            .unwrap();

        let written = std::fs::read_to_string(out).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("\"id\":\"curl\""));
    }

    #[test]
    fn test_export_report_render_text() {
        colored::control::set_override(false);
        let report = ExportReport {
            repositories: vec!["/a".to_owned(), "/b".to_owned()],
            output: "stdout".to_owned(),
            format: "jsonl".to_owned(),
            records: 3,
            bytes: 120,
            shadowed: 1,
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("Exported 3 advisory records"));
        assert!(output.contains("[2] /b"));
        assert!(output.contains("1 documents shadowed"));
    }
}
