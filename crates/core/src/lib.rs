//! Bulwark 공통 크레이트
//!
//! advisory 인덱스/내보내기 크레이트와 CLI가 공유하는 에러 타입, 설정,
//! 도메인 타입, 메트릭 이름을 정의합니다.

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{AdvisoryError, BulwarkError, ConfigError};

// 설정
pub use config::{BulwarkConfig, ExportConfig, GeneralConfig, IndexConfig};

// 도메인 타입
pub use types::ExportFormat;
