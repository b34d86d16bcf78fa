//! 설정 관리 -- bulwark.toml 파싱 및 런타임 설정
//!
//! [`BulwarkConfig`]는 모든 단계의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`BULWARK_EXPORT_FORMAT=yaml` 형식)
//! 3. 설정 파일 (`bulwark.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), bulwark_core::error::BulwarkError> {
//! use bulwark_core::config::BulwarkConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = BulwarkConfig::load("bulwark.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = BulwarkConfig::parse("[export]\nformat = \"yaml\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BulwarkError, ConfigError};
use crate::types::ExportFormat;

/// 문서 파일 크기 설정 상한값
const MAX_FILE_SIZE_LIMIT: usize = 100 * 1024 * 1024; // 100 MB

/// Bulwark 통합 설정
///
/// `bulwark.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulwarkConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 저장소 인덱싱 설정
    #[serde(default)]
    pub index: IndexConfig,
    /// 내보내기 설정
    #[serde(default)]
    pub export: ExportConfig,
}

impl BulwarkConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BulwarkError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에서 시작합니다.
    ///
    /// 파일이 존재하지만 읽거나 파싱할 수 없는 경우는 에러입니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, BulwarkError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(BulwarkError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, BulwarkError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BulwarkError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                BulwarkError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, BulwarkError> {
        toml::from_str(toml_str).map_err(|e| {
            BulwarkError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `BULWARK_{SECTION}_{FIELD}`
    /// 예: `BULWARK_EXPORT_ADVISORIES_REPO_DIRS=/src/a,/src/b`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "BULWARK_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "BULWARK_GENERAL_LOG_FORMAT");

        // Index
        override_string(&mut self.index.file_suffix, "BULWARK_INDEX_FILE_SUFFIX");
        override_usize(&mut self.index.max_file_size, "BULWARK_INDEX_MAX_FILE_SIZE");
        override_bool(&mut self.index.skip_hidden, "BULWARK_INDEX_SKIP_HIDDEN");
        override_bool(&mut self.index.follow_links, "BULWARK_INDEX_FOLLOW_LINKS");
        override_bool(
            &mut self.index.parallel_build,
            "BULWARK_INDEX_PARALLEL_BUILD",
        );

        // Export
        override_csv(
            &mut self.export.advisories_repo_dirs,
            "BULWARK_EXPORT_ADVISORIES_REPO_DIRS",
        );
        override_string(&mut self.export.output, "BULWARK_EXPORT_OUTPUT");
        override_string(&mut self.export.format, "BULWARK_EXPORT_FORMAT");
        override_bool(
            &mut self.export.detect_distro,
            "BULWARK_EXPORT_DETECT_DISTRO",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), BulwarkError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.index.file_suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "index.file_suffix".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.index.max_file_size == 0 || self.index.max_file_size > MAX_FILE_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "index.max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE_LIMIT}"),
            }
            .into());
        }

        if self.export.format_kind().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "export.format".to_owned(),
                reason: format!("must be one of: {}", ExportFormat::NAMES.join(", ")),
            }
            .into());
        }

        if self.export.advisories_repo_dirs.iter().any(|d| d.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "export.advisories_repo_dirs".to_owned(),
                reason: "repository directory path must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 저장소 인덱싱 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// advisory 문서 파일명 접미사
    pub file_suffix: String,
    /// 문서 파일 최대 크기 (바이트)
    pub max_file_size: usize,
    /// 숨김 파일/디렉토리(`.git` 등) 건너뛰기
    pub skip_hidden: bool,
    /// 심볼릭 링크 따라가기
    pub follow_links: bool,
    /// 저장소별 인덱스를 동시에 빌드
    pub parallel_build: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            file_suffix: ".advisories.yaml".to_owned(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            skip_hidden: true,
            follow_links: false,
            parallel_build: true,
        }
    }
}

/// 내보내기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// advisory 저장소 디렉토리 목록 (앞에 나온 저장소가 충돌 시 우선)
    pub advisories_repo_dirs: Vec<String>,
    /// 출력 파일 경로 (비어 있으면 stdout)
    pub output: String,
    /// 출력 형식 (jsonl, yaml)
    pub format: String,
    /// 저장소가 지정되지 않았을 때 배포판 자동 감지 사용
    pub detect_distro: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            advisories_repo_dirs: Vec::new(),
            output: String::new(),
            format: ExportFormat::default().to_string(),
            detect_distro: true,
        }
    }
}

impl ExportConfig {
    /// `format` 문자열을 [`ExportFormat`]으로 해석합니다.
    pub fn format_kind(&self) -> Option<ExportFormat> {
        ExportFormat::from_str_loose(&self.format)
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
