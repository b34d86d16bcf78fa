//! advisory 인덱스 설정
//!
//! [`AdvisoryIndexConfig`]는 core의 [`IndexConfig`](bulwark_core::config::IndexConfig)에서
//! 파생되며, 문서 탐색 규칙과 인덱스 빌드 방식을 정의합니다.
//!
//! # 사용 예시
//!
//! ```
//! use bulwark_advisory::AdvisoryIndexConfigBuilder;
//!
//! let config = AdvisoryIndexConfigBuilder::new()
//!     .file_suffix(".advisories.yaml")
//!     .parallel_build(false)
//!     .build()
//!     .unwrap();
//! assert!(!config.parallel_build);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AdvisoryIndexError;

/// 문서 파일 크기 상한 (100 MB)
const MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// advisory 인덱스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryIndexConfig {
    /// advisory 문서 파일명 접미사 (예: `.advisories.yaml`)
    pub file_suffix: String,
    /// 문서 파일 최대 크기 (바이트)
    pub max_file_size: usize,
    /// 이름이 `.`으로 시작하는 파일/디렉토리 건너뛰기
    pub skip_hidden: bool,
    /// 심볼릭 링크 따라가기
    pub follow_links: bool,
    /// 저장소별 인덱스를 blocking 스레드 풀에서 동시에 빌드
    pub parallel_build: bool,
}

impl Default for AdvisoryIndexConfig {
    fn default() -> Self {
        Self::from_core(&bulwark_core::config::IndexConfig::default())
    }
}

impl AdvisoryIndexConfig {
    /// core의 `IndexConfig`에서 인덱스 설정을 생성합니다.
    pub fn from_core(core: &bulwark_core::config::IndexConfig) -> Self {
        Self {
            file_suffix: core.file_suffix.clone(),
            max_file_size: core.max_file_size,
            skip_hidden: core.skip_hidden,
            follow_links: core.follow_links,
            parallel_build: core.parallel_build,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `file_suffix`: 비어 있으면 안 되며 경로 구분자를 포함할 수 없음
    /// - `max_file_size`: 1-104857600 (100MB)
    pub fn validate(&self) -> Result<(), AdvisoryIndexError> {
        if self.file_suffix.is_empty() {
            return Err(AdvisoryIndexError::Config {
                field: "file_suffix".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.file_suffix.contains(['/', '\\']) {
            return Err(AdvisoryIndexError::Config {
                field: "file_suffix".to_owned(),
                reason: format!("'{}' must not contain path separators", self.file_suffix),
            });
        }

        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE {
            return Err(AdvisoryIndexError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE}"),
            });
        }

        Ok(())
    }
}

/// [`AdvisoryIndexConfig`] 빌더
///
/// 빌드 시 유효성 검증을 수행합니다.
#[derive(Default)]
pub struct AdvisoryIndexConfigBuilder {
    config: AdvisoryIndexConfig,
}

impl AdvisoryIndexConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 문서 파일명 접미사를 설정합니다.
    pub fn file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.file_suffix = suffix.into();
        self
    }

    /// 최대 파일 크기(바이트)를 설정합니다.
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// 숨김 항목 건너뛰기 여부를 설정합니다.
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.config.skip_hidden = skip;
        self
    }

    /// 심볼릭 링크 추적 여부를 설정합니다.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.config.follow_links = follow;
        self
    }

    /// 동시 빌드 여부를 설정합니다.
    pub fn parallel_build(mut self, parallel: bool) -> Self {
        self.config.parallel_build = parallel;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `AdvisoryIndexError::Config` 반환
    pub fn build(self) -> Result<AdvisoryIndexConfig, AdvisoryIndexError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AdvisoryIndexConfig::default();
        config.validate().unwrap();
        assert_eq!(config.file_suffix, ".advisories.yaml");
    }

    #[test]
    fn from_core_preserves_values() {
        let core = bulwark_core::config::IndexConfig {
            file_suffix: ".yaml".to_owned(),
            max_file_size: 4096,
            skip_hidden: false,
            follow_links: true,
            parallel_build: false,
        };
        let config = AdvisoryIndexConfig::from_core(&core);
        assert_eq!(config.file_suffix, ".yaml");
        assert_eq!(config.max_file_size, 4096);
        assert!(!config.skip_hidden);
        assert!(config.follow_links);
        assert!(!config.parallel_build);
    }

    #[test]
    fn validate_rejects_empty_suffix() {
        let config = AdvisoryIndexConfig {
            file_suffix: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_suffix_with_separator() {
        let config = AdvisoryIndexConfig {
            file_suffix: "sub/.yaml".to_owned(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("path separators"));
    }

    #[test]
    fn validate_rejects_zero_max_file_size() {
        let config = AdvisoryIndexConfig {
            max_file_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_too_large_max_file_size() {
        let config = AdvisoryIndexConfig {
            max_file_size: 200 * 1024 * 1024,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_all_setters() {
        let config = AdvisoryIndexConfigBuilder::new()
            .file_suffix(".adv.yml")
            .max_file_size(1024)
            .skip_hidden(false)
            .follow_links(true)
            .parallel_build(false)
            .build()
            .unwrap();

        assert_eq!(config.file_suffix, ".adv.yml");
        assert_eq!(config.max_file_size, 1024);
        assert!(!config.skip_hidden);
        assert!(config.follow_links);
        assert!(!config.parallel_build);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = AdvisoryIndexConfigBuilder::new().max_file_size(0).build();
        assert!(result.is_err());
    }
}
