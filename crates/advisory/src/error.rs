//! advisory 인덱스 에러 타입
//!
//! [`AdvisoryIndexError`]는 인덱스 빌드, 병합, 직렬화 중 발생할 수 있는 모든 에러를
//! 나타냅니다. `From<AdvisoryIndexError> for BulwarkError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **저장소 접근**: `RootUnavailable`
//! - **문서 파싱**: `DocumentParse`
//! - **식별 키 중복**: `DuplicateIdentity`
//! - **병합 입력**: `NoSources`
//! - **출력**: `SinkWrite`, `Encode`
//! - **설정**: `Config`

use bulwark_core::error::{AdvisoryError, BulwarkError, ConfigError};

/// advisory 인덱스 도메인 에러
///
/// 모든 변형은 원인을 재실행 없이 진단할 수 있도록 루트 경로, 문서 경로,
/// 식별 키 중 하나 이상을 포함합니다.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryIndexError {
    /// 저장소 루트를 열거나 탐색할 수 없음
    #[error("root unavailable: {root}: {reason}")]
    RootUnavailable {
        /// 저장소 루트 경로
        root: String,
        /// 실패 사유
        reason: String,
    },

    /// 문서 파싱 실패
    #[error("document parse error: {path}: {reason}")]
    DocumentParse {
        /// 문서 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 한 저장소 안에서 같은 식별 키를 가진 문서가 둘 이상 존재
    #[error("duplicate advisory id '{key}' in {root}: {first} and {second}")]
    DuplicateIdentity {
        /// 중복된 식별 키
        key: String,
        /// 저장소 루트 경로
        root: String,
        /// 먼저 발견된 문서 경로
        first: String,
        /// 나중에 발견된 문서 경로
        second: String,
    },

    /// 병합할 인덱스가 없음
    #[error("no advisory sources to export")]
    NoSources,

    /// 출력 대상 쓰기 실패
    #[error("sink write error after {written} records: {source}")]
    SinkWrite {
        /// 완전히 기록된 레코드 수
        written: usize,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 레코드 인코딩 실패
    #[error("record encode error: {key}: {reason}")]
    Encode {
        /// 인코딩 중이던 문서의 식별 키
        key: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<AdvisoryIndexError> for BulwarkError {
    fn from(err: AdvisoryIndexError) -> Self {
        match err {
            AdvisoryIndexError::RootUnavailable { root, reason } => BulwarkError::Advisory(
                AdvisoryError::RootUnavailable(format!("{root}: {reason}")),
            ),
            AdvisoryIndexError::DocumentParse { path, reason } => BulwarkError::Advisory(
                AdvisoryError::DocumentParse(format!("{path}: {reason}")),
            ),
            err @ AdvisoryIndexError::DuplicateIdentity { .. } => {
                BulwarkError::Advisory(AdvisoryError::DuplicateIdentity(err.to_string()))
            }
            AdvisoryIndexError::NoSources => BulwarkError::Advisory(AdvisoryError::NoSources),
            err @ AdvisoryIndexError::SinkWrite { .. } => {
                BulwarkError::Advisory(AdvisoryError::SinkWrite(err.to_string()))
            }
            AdvisoryIndexError::Encode { key, reason } => {
                BulwarkError::Advisory(AdvisoryError::Encode(format!("{key}: {reason}")))
            }
            AdvisoryIndexError::Config { field, reason } => {
                BulwarkError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_unavailable_display() {
        let err = AdvisoryIndexError::RootUnavailable {
            root: "/src/advisories".to_owned(),
            reason: "not a directory".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/src/advisories"));
        assert!(msg.contains("not a directory"));
    }

    #[test]
    fn document_parse_display() {
        let err = AdvisoryIndexError::DocumentParse {
            path: "openssl.advisories.yaml".to_owned(),
            reason: "missing package.name".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("openssl.advisories.yaml"));
        assert!(msg.contains("missing package.name"));
    }

    #[test]
    fn duplicate_identity_display_names_both_paths() {
        let err = AdvisoryIndexError::DuplicateIdentity {
            key: "openssl".to_owned(),
            root: "/src/advisories".to_owned(),
            first: "openssl.advisories.yaml".to_owned(),
            second: "old/openssl.advisories.yaml".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'openssl'"));
        assert!(msg.contains("/src/advisories"));
        assert!(msg.contains("old/openssl.advisories.yaml"));
    }

    #[test]
    fn sink_write_display_includes_count() {
        let err = AdvisoryIndexError::SinkWrite {
            written: 42,
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("pipe closed"));
    }

    #[test]
    fn converts_to_bulwark_error_root_unavailable() {
        let err = AdvisoryIndexError::RootUnavailable {
            root: "/missing".to_owned(),
            reason: "no such file".to_owned(),
        };
        let bulwark_err: BulwarkError = err.into();
        assert!(matches!(
            bulwark_err,
            BulwarkError::Advisory(AdvisoryError::RootUnavailable(_))
        ));
    }

    #[test]
    fn converts_to_bulwark_error_duplicate() {
        let err = AdvisoryIndexError::DuplicateIdentity {
            key: "zlib".to_owned(),
            root: "/r".to_owned(),
            first: "a".to_owned(),
            second: "b".to_owned(),
        };
        let bulwark_err: BulwarkError = err.into();
        assert!(matches!(
            bulwark_err,
            BulwarkError::Advisory(AdvisoryError::DuplicateIdentity(_))
        ));
        assert!(bulwark_err.to_string().contains("zlib"));
    }

    #[test]
    fn converts_to_bulwark_error_no_sources() {
        let bulwark_err: BulwarkError = AdvisoryIndexError::NoSources.into();
        assert!(matches!(
            bulwark_err,
            BulwarkError::Advisory(AdvisoryError::NoSources)
        ));
    }

    #[test]
    fn converts_to_bulwark_error_encode() {
        let err = AdvisoryIndexError::Encode {
            key: "curl".to_owned(),
            reason: "unsupported value".to_owned(),
        };
        let bulwark_err: BulwarkError = err.into();
        match bulwark_err {
            BulwarkError::Advisory(AdvisoryError::Encode(msg)) => {
                assert_eq!(msg, "curl: unsupported value");
            }
            other => panic!("expected Advisory(Encode), got {other:?}"),
        }
    }

    #[test]
    fn converts_to_bulwark_error_sink_write() {
        let err = AdvisoryIndexError::SinkWrite {
            written: 3,
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        let bulwark_err: BulwarkError = err.into();
        assert!(matches!(
            bulwark_err,
            BulwarkError::Advisory(AdvisoryError::SinkWrite(_))
        ));
    }

    #[test]
    fn converts_to_bulwark_error_config() {
        let err = AdvisoryIndexError::Config {
            field: "file_suffix".to_owned(),
            reason: "must not be empty".to_owned(),
        };
        let bulwark_err: BulwarkError = err.into();
        assert!(matches!(
            bulwark_err,
            BulwarkError::Config(ConfigError::InvalidValue { .. })
        ));
    }
}
