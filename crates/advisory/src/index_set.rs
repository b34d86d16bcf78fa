//! 인덱스 집합 -- 한 번의 내보내기에 참여하는 저장소 인덱스의 순서 있는 목록
//!
//! 목록 순서는 호출자가 지정한 루트 순서이며, 같은 식별 키가 여러 저장소에 있을 때
//! 앞선 저장소의 문서가 우선합니다.
//!
//! # 동시 빌드
//!
//! `parallel_build`가 켜져 있으면 루트마다 `spawn_blocking` 작업을 띄워 동시에 빌드합니다.
//! 결과는 완료 순서와 관계없이 호출자 순서대로 수집되며, 실패가 여러 개면 호출자 순서상
//! 가장 앞선 루트의 에러를 반환합니다.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::AdvisoryIndexConfig;
use crate::error::AdvisoryIndexError;
use crate::index::RepositoryIndex;

/// 순서 있는 저장소 인덱스 집합
#[derive(Debug, Default)]
pub struct IndexSet {
    indices: Vec<RepositoryIndex>,
}

impl IndexSet {
    /// 이미 빌드된 인덱스로 집합을 구성합니다. 순서가 곧 우선순위입니다.
    pub fn new(indices: Vec<RepositoryIndex>) -> Self {
        Self { indices }
    }

    /// 루트 목록으로부터 인덱스 집합을 빌드합니다.
    ///
    /// `config.parallel_build`에 따라 동시 또는 순차로 빌드합니다.
    /// 어느 루트든 실패하면 전체가 실패합니다.
    pub async fn build(
        roots: &[PathBuf],
        config: &AdvisoryIndexConfig,
    ) -> Result<Self, AdvisoryIndexError> {
        config.validate()?;

        if !config.parallel_build || roots.len() < 2 {
            return Self::build_blocking(roots, config);
        }

        debug!(roots = roots.len(), "building repository indices concurrently");

        let handles: Vec<_> = roots
            .iter()
            .cloned()
            .map(|root| {
                let config = config.clone();
                tokio::task::spawn_blocking(move || RepositoryIndex::build(&root, &config))
            })
            .collect();

        // 모든 작업이 끝날 때까지 기다린 뒤 호출자 순서로 첫 에러를 고릅니다.
        let mut results = Vec::with_capacity(roots.len());
        for (root, handle) in roots.iter().zip(handles) {
            let result = handle
                .await
                .map_err(|e| AdvisoryIndexError::RootUnavailable {
                    root: root.display().to_string(),
                    reason: format!("index task failed: {e}"),
                })
                .and_then(|built| built);
            results.push(result);
        }

        let indices = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        let set = Self::new(indices);
        set.log_summary();
        Ok(set)
    }

    /// 현재 스레드에서 루트를 순서대로 빌드합니다.
    pub fn build_blocking(
        roots: &[PathBuf],
        config: &AdvisoryIndexConfig,
    ) -> Result<Self, AdvisoryIndexError> {
        let indices = roots
            .iter()
            .map(|root| RepositoryIndex::build(root, config))
            .collect::<Result<Vec<_>, _>>()?;

        let set = Self::new(indices);
        set.log_summary();
        Ok(set)
    }

    fn log_summary(&self) {
        info!(
            repositories = self.len(),
            documents = self.document_count(),
            "advisory index set ready"
        );
    }

    /// 인덱스 수
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// 인덱스가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// 모든 인덱스의 문서 수 합계 (중복 키 포함)
    pub fn document_count(&self) -> usize {
        self.indices.iter().map(RepositoryIndex::len).sum()
    }

    /// 인덱스를 우선순위 순서로 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, RepositoryIndex> {
        self.indices.iter()
    }

    /// 인덱스 루트 목록 (우선순위 순서)
    pub fn roots(&self) -> Vec<&Path> {
        self.indices.iter().map(RepositoryIndex::root).collect()
    }
}

impl<'a> IntoIterator for &'a IndexSet {
    type Item = &'a RepositoryIndex;
    type IntoIter = std::slice::Iter<'a, RepositoryIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
