//! advisory 문서 모델 -- 식별 키, 출처, 문서 본문
//!
//! [`Document`]는 advisory 레코드 하나를 나타냅니다. 본문은 병합 엔진이 해석하지 않는
//! 구조화된 값이며, 병합 시 동등성은 오직 [`AdvisoryKey`]로만 판단합니다.
//!
//! # 문서 형식
//!
//! ```yaml
//! schema-version: "2"
//! package:
//!   name: openssl
//! advisories:
//!   - id: CVE-2023-0286
//!     events:
//!       - timestamp: 2023-02-08T00:00:00Z
//!         type: fixed
//!         data:
//!           fixed-version: 3.0.8-r0
//! ```
//!
//! 식별 키는 `package.name` 필드입니다.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::AdvisoryIndexError;

/// advisory 문서 식별 키
///
/// 한 저장소 인덱스 안에서는 유일하지만, 여러 저장소에 걸쳐서는 중복될 수 있습니다.
/// 정렬 순서는 바이트 단위 사전식 순서이며, 내보내기 출력 순서를 결정합니다.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AdvisoryKey(String);

impl AdvisoryKey {
    /// 문자열로부터 키를 생성합니다.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// 키 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdvisoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AdvisoryKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// 문서 출처 -- 어떤 저장소의 어떤 파일에서 로드되었는지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    root: PathBuf,
    path: PathBuf,
}

impl Provenance {
    pub(crate) fn new(root: PathBuf, path: PathBuf) -> Self {
        Self { root, path }
    }

    /// 문서가 속한 저장소 루트
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 저장소 루트 기준 상대 경로
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.join(&self.path).display())
    }
}

/// advisory 문서
///
/// 저장소 인덱스 빌드 중에만 생성되며 이후에는 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct Document {
    key: AdvisoryKey,
    content: Value,
    provenance: Provenance,
}

impl Document {
    pub(crate) fn new(key: AdvisoryKey, content: Value, provenance: Provenance) -> Self {
        Self {
            key,
            content,
            provenance,
        }
    }

    /// 식별 키
    pub fn key(&self) -> &AdvisoryKey {
        &self.key
    }

    /// 문서 본문 (해석되지 않은 구조화 값)
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// 문서 출처
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document({} from {})", self.key, self.provenance)
    }
}

/// YAML 문서 텍스트를 파싱하여 식별 키와 본문을 반환합니다.
///
/// # Arguments
///
/// - `content`: 문서 텍스트 (UTF-8)
/// - `source`: 원본 파일 경로 (에러 메시지용)
///
/// # Errors
///
/// YAML 문법 오류, 최상위가 매핑이 아닌 경우, `package.name`이 없거나 비어 있는 경우
/// `AdvisoryIndexError::DocumentParse`를 반환합니다.
pub fn parse_document(
    content: &str,
    source: &str,
) -> Result<(AdvisoryKey, Value), AdvisoryIndexError> {
    let parse_err = |reason: String| AdvisoryIndexError::DocumentParse {
        path: source.to_owned(),
        reason,
    };

    let value: Value =
        serde_yaml::from_str(content).map_err(|e| parse_err(format!("YAML parse error: {e}")))?;

    if !value.is_object() {
        return Err(parse_err("top-level value must be a mapping".to_owned()));
    }

    let name = match value.pointer("/package/name") {
        Some(Value::String(name)) => name.trim(),
        Some(_) => return Err(parse_err("package.name must be a string".to_owned())),
        None => return Err(parse_err("missing package.name".to_owned())),
    };

    if name.is_empty() {
        return Err(parse_err("package.name must not be empty".to_owned()));
    }

    let key = AdvisoryKey::new(name);
    Ok((key, value))
}
