//! Distro auto-detection from the current directory's git remotes
//!
//! When `export` is run without `-a`, bulwark inspects the git repository that
//! contains the working directory. If one of its remotes points at a known
//! distro's advisories repository, that checkout is used directly. If it points
//! at the distro's package repository, a sibling checkout of the advisories
//! repository is looked up next to it.
//!
//! Detection is a plain function result consumed once by the `export` command.

use std::path::{Path, PathBuf};

use colored::Colorize;
use git2::Repository;
use tracing::debug;

use crate::error::CliError;

/// A distribution whose repositories bulwark knows how to recognize.
#[derive(Debug, PartialEq, Eq)]
pub struct KnownDistro {
    /// Display name.
    pub name: &'static str,
    /// `owner/repo` slug of the package definitions repository.
    pub distro_repo: &'static str,
    /// `owner/repo` slug of the advisories repository.
    pub advisories_repo: &'static str,
}

/// Distros recognized by auto-detection.
pub static KNOWN_DISTROS: [KnownDistro; 2] = [
    KnownDistro {
        name: "Wolfi",
        distro_repo: "wolfi-dev/os",
        advisories_repo: "wolfi-dev/advisories",
    },
    KnownDistro {
        name: "Chainguard",
        distro_repo: "chainguard-dev/enterprise-packages",
        advisories_repo: "chainguard-dev/enterprise-advisories",
    },
];

/// Result of a successful detection.
#[derive(Debug)]
pub struct DetectedDistro {
    pub distro: &'static KnownDistro,
    /// Local checkout of the package repository, when detection started there.
    pub distro_repo_dir: Option<PathBuf>,
    /// Local checkout of the advisories repository.
    pub advisories_repo_dir: PathBuf,
}

/// Detect the distro from the process's current directory.
pub fn detect() -> Result<DetectedDistro, CliError> {
    let cwd = std::env::current_dir()
        .map_err(|e| CliError::Distro(format!("unable to read current directory: {e}")))?;
    detect_from(&cwd)
}

/// Detect the distro from the git repository containing `dir`.
pub fn detect_from(dir: &Path) -> Result<DetectedDistro, CliError> {
    let (repo_dir, urls) = remote_urls(dir).map_err(|e| {
        CliError::Distro(format!(
            "unable to read git remotes of {}: {}",
            dir.display(),
            e.message()
        ))
    })?;

    if urls.is_empty() {
        return Err(CliError::Distro(format!(
            "git repository {} has no remotes",
            repo_dir.display()
        )));
    }

    for url in &urls {
        let Some(slug) = normalize_remote(url) else {
            continue;
        };

        for distro in &KNOWN_DISTROS {
            if slug == distro.advisories_repo {
                debug!(distro = distro.name, remote = %url, "detected advisories repository");
                return Ok(DetectedDistro {
                    distro,
                    distro_repo_dir: None,
                    advisories_repo_dir: repo_dir,
                });
            }

            if slug == distro.distro_repo {
                debug!(distro = distro.name, remote = %url, "detected distro repository");
                let advisories_repo_dir =
                    find_sibling_checkout(&repo_dir, distro.advisories_repo).ok_or_else(|| {
                        CliError::Distro(format!(
                            "{} repository detected, but no checkout of {} found next to {}",
                            distro.name,
                            distro.advisories_repo,
                            repo_dir.display()
                        ))
                    })?;
                return Ok(DetectedDistro {
                    distro,
                    distro_repo_dir: Some(repo_dir),
                    advisories_repo_dir,
                });
            }
        }
    }

    Err(CliError::Distro(format!(
        "no git remote of {} matches a known distro ({})",
        repo_dir.display(),
        urls.join(", ")
    )))
}

/// Open the repository containing `dir` and return its working directory and remote URLs.
fn remote_urls(dir: &Path) -> Result<(PathBuf, Vec<String>), git2::Error> {
    let repo = Repository::discover(dir)?;
    let workdir = repo
        .workdir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.to_path_buf());

    let mut urls = Vec::new();
    for name in repo.remotes()?.iter().flatten() {
        let remote = repo.find_remote(name)?;
        if let Some(url) = remote.url() {
            urls.push(url.to_owned());
        }
    }
    Ok((workdir, urls))
}

/// Look for a directory next to `repo_dir` whose git remote is `slug`.
fn find_sibling_checkout(repo_dir: &Path, slug: &str) -> Option<PathBuf> {
    let parent = repo_dir.parent()?;
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(parent)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path != repo_dir)
        .collect();
    candidates.sort();

    candidates.into_iter().find(|candidate| {
        // the candidate itself must be a repository root
        Repository::open(candidate)
            .ok()
            .and_then(|repo| {
                let names = repo.remotes().ok()?;
                let matched = names.iter().flatten().any(|name| {
                    repo.find_remote(name)
                        .ok()
                        .and_then(|remote| remote.url().and_then(normalize_remote))
                        .is_some_and(|s| s == slug)
                });
                Some(matched)
            })
            .unwrap_or(false)
    })
}

/// Reduce a git remote URL to a lowercase `owner/repo` slug.
///
/// Handles `https://host/owner/repo(.git)`, `ssh://git@host/owner/repo` and
/// scp-like `git@host:owner/repo.git` forms.
pub fn normalize_remote(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let path = match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path)?,
        None => url.split_once(':').map(|(_, path)| path)?,
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., owner, repo] => Some(format!("{owner}/{repo}").to_lowercase()),
        _ => None,
    }
}

/// Notice printed to stderr after a successful detection.
pub fn render_detected_distro(detected: &DetectedDistro) -> String {
    let mut out = format!(
        "{} {}\n",
        "Auto-detected distro:".bold(),
        detected.distro.name.cyan().bold()
    );
    if let Some(dir) = &detected.distro_repo_dir {
        out.push_str(&format!("  Distro repo:     {}\n", dir.display()));
    }
    out.push_str(&format!(
        "  Advisories repo: {}\n\n",
        detected.advisories_repo_dir.display()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo(dir: &Path, remote: Option<&str>) {
        std::fs::create_dir_all(dir).unwrap();
        let repo = Repository::init(dir).unwrap();
        if let Some(url) = remote {
            repo.remote("origin", url).unwrap();
        }
    }

    #[test]
    fn test_normalize_remote_forms() {
        let cases = [
            ("https://github.com/wolfi-dev/os.git", "wolfi-dev/os"),
            ("https://github.com/wolfi-dev/os", "wolfi-dev/os"),
            ("https://github.com/wolfi-dev/os/", "wolfi-dev/os"),
            ("git@github.com:wolfi-dev/advisories.git", "wolfi-dev/advisories"),
            (
                "ssh://git@github.com/chainguard-dev/enterprise-advisories",
                "chainguard-dev/enterprise-advisories",
            ),
            ("https://GitHub.com/Wolfi-Dev/OS.git", "wolfi-dev/os"),
        ];
        for (url, expected) in cases {
            assert_eq!(normalize_remote(url).as_deref(), Some(expected), "url: {url}");
        }
    }

    #[test]
    fn test_normalize_remote_rejects_unparseable() {
        assert_eq!(normalize_remote("not-a-url"), None);
        assert_eq!(normalize_remote("https://github.com"), None);
    }

    #[test]
    fn test_detect_from_advisories_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let advisories = dir.path().join("advisories");
        init_repo(&advisories, Some("https://github.com/wolfi-dev/advisories.git"));

        let detected = detect_from(&advisories).unwrap();
        assert_eq!(detected.distro.name, "Wolfi");
        assert!(detected.distro_repo_dir.is_none());
        assert_eq!(
            detected.advisories_repo_dir.canonicalize().unwrap(),
            advisories.canonicalize().unwrap()
        );
    }

    #[test]
    fn test_detect_from_subdirectory_of_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let advisories = dir.path().join("enterprise-advisories");
        init_repo(
            &advisories,
            Some("git@github.com:chainguard-dev/enterprise-advisories.git"),
        );
        let nested = advisories.join("curl");
        std::fs::create_dir_all(&nested).unwrap();

        let detected = detect_from(&nested).unwrap();
        assert_eq!(detected.distro.name, "Chainguard");
        assert_eq!(
            detected.advisories_repo_dir.canonicalize().unwrap(),
            advisories.canonicalize().unwrap()
        );
    }

    #[test]
    fn test_detect_from_distro_checkout_finds_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let os = dir.path().join("os");
        let advisories = dir.path().join("wolfi-advisories");
        init_repo(&os, Some("https://github.com/wolfi-dev/os.git"));
        init_repo(&advisories, Some("https://github.com/wolfi-dev/advisories.git"));
        init_repo(&dir.path().join("unrelated"), Some("https://github.com/acme/tools"));

        let detected = detect_from(&os).unwrap();
        assert_eq!(detected.distro.name, "Wolfi");
        assert!(detected.distro_repo_dir.is_some());
        assert_eq!(
            detected.advisories_repo_dir.canonicalize().unwrap(),
            advisories.canonicalize().unwrap()
        );
    }

    #[test]
    fn test_detect_from_distro_checkout_without_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let os = dir.path().join("os");
        init_repo(&os, Some("https://github.com/wolfi-dev/os.git"));

        let err = detect_from(&os).unwrap_err();
        assert!(matches!(err, CliError::Distro(_)));
        assert!(err.to_string().contains("wolfi-dev/advisories"));
    }

    #[test]
    fn test_detect_from_unknown_remote() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path(), Some("https://github.com/acme/widgets.git"));

        let err = detect_from(dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("acme/widgets"));
    }

    #[test]
    fn test_detect_from_repo_without_remotes() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path(), None);

        let err = detect_from(dir.path()).unwrap_err();
        assert!(err.to_string().contains("has no remotes"));
    }

    #[test]
    fn test_render_detected_distro() {
        colored::control::set_override(false);
        let detected = DetectedDistro {
            distro: &KNOWN_DISTROS[0],
            distro_repo_dir: None,
            advisories_repo_dir: PathBuf::from("/src/advisories"),
        };
        let rendered = render_detected_distro(&detected);
        assert!(rendered.contains("Auto-detected distro: Wolfi"));
        assert!(rendered.contains("/src/advisories"));
    }
}
