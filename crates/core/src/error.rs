//! 에러 타입 -- 도메인별 에러 정의

/// Bulwark 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum BulwarkError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// advisory 인덱싱/내보내기 에러
    #[error("advisory error: {0}")]
    Advisory(#[from] AdvisoryError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// advisory 인덱싱/내보내기 에러
///
/// 도메인 크레이트(`bulwark-advisory`)의 상세 에러가 이 카테고리로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// 저장소 루트에 접근할 수 없음
    #[error("root unavailable: {0}")]
    RootUnavailable(String),

    /// 문서 파싱 실패
    #[error("document parse failed: {0}")]
    DocumentParse(String),

    /// 한 저장소 안에서 식별 키 중복
    #[error("duplicate identity: {0}")]
    DuplicateIdentity(String),

    /// 내보낼 인덱스가 없음
    #[error("no advisory sources")]
    NoSources,

    /// 출력 대상 쓰기 실패
    #[error("sink write failed: {0}")]
    SinkWrite(String),

    /// 레코드 인코딩 실패 (출력 대상은 정상)
    #[error("record encode failed: {0}")]
    Encode(String),
}
