//! 도메인 타입 -- 크레이트 간 공유 타입

use std::fmt;

use serde::{Deserialize, Serialize};

/// 내보내기 출력 형식
///
/// 두 형식 모두 레코드 단위로 자기 구분(self-delimiting)되므로
/// 전체 레코드 수를 미리 알 필요 없이 스트리밍할 수 있습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// JSON Lines -- 한 줄에 JSON 객체 하나
    #[default]
    Jsonl,
    /// YAML 멀티 문서 스트림 -- 레코드마다 `---` 구분자
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jsonl => write!(f, "jsonl"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl ExportFormat {
    /// 지원하는 형식 이름 목록
    pub const NAMES: [&'static str; 2] = ["jsonl", "yaml"];

    /// 문자열에서 형식을 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "jsonl" | "ndjson" | "json-lines" => Some(Self::Jsonl),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}
