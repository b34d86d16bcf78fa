//! 저장소 인덱스 -- 루트 하나에서 빌드되는 불변 advisory 문서 맵
//!
//! [`RepositoryIndex`]는 한 번 빌드된 뒤 읽기 전용으로만 사용됩니다.
//! 문서는 식별 키 순으로 정렬되어 보관되므로 병합 단계에서 추가 정렬이 필요 없습니다.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use metrics::counter;
use tracing::info;

use bulwark_core::metrics as m;

use crate::config::AdvisoryIndexConfig;
use crate::document::{AdvisoryKey, Document, Provenance};
use crate::error::AdvisoryIndexError;
use crate::source::{DocumentSource, FsDocumentSource};

/// 저장소 인덱스
///
/// 식별 키 → 문서 매핑. 같은 저장소 안에서 키는 유일합니다.
#[derive(Debug)]
pub struct RepositoryIndex {
    root: PathBuf,
    documents: BTreeMap<AdvisoryKey, Document>,
}

impl RepositoryIndex {
    /// 파일시스템 소스로 루트의 인덱스를 빌드합니다.
    ///
    /// # Errors
    ///
    /// - 루트를 열 수 없으면 `RootUnavailable`
    /// - 문서 파싱 실패 시 `DocumentParse`
    /// - 같은 키를 가진 문서가 둘 이상이면 `DuplicateIdentity`
    pub fn build(
        root: impl AsRef<Path>,
        config: &AdvisoryIndexConfig,
    ) -> Result<Self, AdvisoryIndexError> {
        config.validate()?;
        let source = FsDocumentSource::new(config.clone());
        Self::build_with(root, &source)
    }

    /// 주어진 문서 소스로 루트의 인덱스를 빌드합니다.
    pub fn build_with(
        root: impl AsRef<Path>,
        source: &dyn DocumentSource,
    ) -> Result<Self, AdvisoryIndexError> {
        let root = root.as_ref();
        let result = Self::collect(root, source);

        let label = if result.is_ok() { "success" } else { "failure" };
        counter!(m::INDEX_BUILDS_TOTAL, m::LABEL_RESULT => label).increment(1);

        let index = result?;
        counter!(m::INDEX_DOCUMENTS_TOTAL).increment(index.len() as u64);
        info!(
            root = %root.display(),
            documents = index.len(),
            "indexed advisory repository"
        );
        Ok(index)
    }

    fn collect(root: &Path, source: &dyn DocumentSource) -> Result<Self, AdvisoryIndexError> {
        let mut documents: BTreeMap<AdvisoryKey, Document> = BTreeMap::new();

        for entry in source.entries(root)? {
            let entry = entry?;
            match documents.entry(entry.key) {
                Entry::Occupied(existing) => {
                    let existing: &Document = existing.get();
                    return Err(AdvisoryIndexError::DuplicateIdentity {
                        key: existing.key().to_string(),
                        root: root.display().to_string(),
                        first: existing.provenance().path().display().to_string(),
                        second: entry.path.display().to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    let key = slot.key().clone();
                    let provenance = Provenance::new(root.to_path_buf(), entry.path);
                    slot.insert(Document::new(key, entry.content, provenance));
                }
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            documents,
        })
    }

    /// 인덱스가 빌드된 저장소 루트
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 문서 수
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// 문서가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// 키로 문서를 조회합니다.
    pub fn get(&self, key: &AdvisoryKey) -> Option<&Document> {
        self.documents.get(key)
    }

    /// 키를 정렬 순서로 순회합니다.
    pub fn keys(&self) -> impl Iterator<Item = &AdvisoryKey> {
        self.documents.keys()
    }

    /// 문서를 키 순서로 순회합니다.
    pub fn documents(&self) -> std::collections::btree_map::Values<'_, AdvisoryKey, Document> {
        self.documents.values()
    }
}
