//! 문서 소스 -- 저장소 루트에서 advisory 문서를 찾아 파싱합니다.
//!
//! [`DocumentSource`] trait은 루트 하나가 주어졌을 때 `(경로, 키, 본문)` 항목의
//! 시퀀스를 만들어내는 협력자 인터페이스입니다. [`FsDocumentSource`]는 파일시스템을
//! 재귀적으로 탐색하는 기본 구현입니다.
//!
//! # 탐색 규칙
//!
//! - 파일명이 `file_suffix`로 끝나는 일반 파일만 처리
//! - `skip_hidden`이면 `.`으로 시작하는 항목(`.git`, `.github` 등)을 하위 트리째 건너뜀
//! - 디렉토리 항목은 파일명 순으로 정렬하여 탐색 (진단 메시지가 매번 동일하도록)

use std::path::{Path, PathBuf};

use metrics::counter;
use serde_json::Value;
use walkdir::{DirEntry, WalkDir};

use bulwark_core::metrics as m;

use crate::config::AdvisoryIndexConfig;
use crate::document::{AdvisoryKey, parse_document};
use crate::error::AdvisoryIndexError;

/// 소스가 만들어내는 항목 하나
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// 저장소 루트 기준 상대 경로
    pub path: PathBuf,
    /// 문서 식별 키
    pub key: AdvisoryKey,
    /// 파싱된 문서 본문
    pub content: Value,
}

/// 항목 시퀀스 타입
pub type SourceEntries<'a> =
    Box<dyn Iterator<Item = Result<SourceEntry, AdvisoryIndexError>> + 'a>;

/// advisory 문서 소스 trait
///
/// 루트를 열 수 없으면 즉시 에러를 반환하고, 그 외에는 문서마다 항목 또는 에러를
/// 하나씩 만들어냅니다.
pub trait DocumentSource: Send + Sync {
    /// 루트 아래의 모든 문서를 순회합니다.
    fn entries<'a>(&'a self, root: &'a Path) -> Result<SourceEntries<'a>, AdvisoryIndexError>;
}

/// 파일시스템 기반 문서 소스
pub struct FsDocumentSource {
    config: AdvisoryIndexConfig,
}

impl FsDocumentSource {
    /// 설정으로 소스를 생성합니다.
    pub fn new(config: AdvisoryIndexConfig) -> Self {
        Self { config }
    }

    /// 이 소스가 처리할 파일인지 확인합니다.
    fn is_document(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&self.config.file_suffix))
    }

    /// 문서 파일 하나를 읽고 파싱합니다.
    fn load(&self, root: &Path, path: &Path) -> Result<SourceEntry, AdvisoryIndexError> {
        let result = self.read_and_parse(root, path);
        if result.is_err() {
            counter!(m::INDEX_PARSE_ERRORS_TOTAL).increment(1);
        }
        result
    }

    fn read_and_parse(&self, root: &Path, path: &Path) -> Result<SourceEntry, AdvisoryIndexError> {
        let display = path.display().to_string();

        let metadata = std::fs::metadata(path).map_err(|e| AdvisoryIndexError::DocumentParse {
            path: display.clone(),
            reason: format!("failed to read file metadata: {e}"),
        })?;

        if metadata.len() > self.config.max_file_size as u64 {
            return Err(AdvisoryIndexError::DocumentParse {
                path: display,
                reason: format!(
                    "file too large: {} bytes (max: {})",
                    metadata.len(),
                    self.config.max_file_size
                ),
            });
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| AdvisoryIndexError::DocumentParse {
                path: display.clone(),
                reason: format!("failed to read file: {e}"),
            })?;

        let (key, value) = parse_document(&content, &display)?;
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();

        Ok(SourceEntry {
            path: relative,
            key,
            content: value,
        })
    }
}

impl Default for FsDocumentSource {
    fn default() -> Self {
        Self::new(AdvisoryIndexConfig::default())
    }
}

impl DocumentSource for FsDocumentSource {
    fn entries<'a>(&'a self, root: &'a Path) -> Result<SourceEntries<'a>, AdvisoryIndexError> {
        let root_display = root.display().to_string();

        let metadata = std::fs::metadata(root).map_err(|e| AdvisoryIndexError::RootUnavailable {
            root: root_display.clone(),
            reason: e.to_string(),
        })?;

        if !metadata.is_dir() {
            return Err(AdvisoryIndexError::RootUnavailable {
                root: root_display,
                reason: "not a directory".to_owned(),
            });
        }

        let skip_hidden = self.config.skip_hidden;
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && entry.depth() > 0 && is_hidden(entry)));

        let entries = walker.filter_map(move |entry| match entry {
            Ok(entry) if self.is_document(&entry) => Some(self.load(root, entry.path())),
            Ok(_) => None,
            Err(e) => Some(Err(AdvisoryIndexError::RootUnavailable {
                root: root_display.clone(),
                reason: format!("traversal failed: {e}"),
            })),
        });

        Ok(Box::new(entries))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
