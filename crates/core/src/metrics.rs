//! 메트릭 이름 상수
//!
//! advisory 크레이트는 이 상수로 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `bulwark_`
//! - 단계명: `index_`, `merge_`, `export_`
//! - 접미어: `_total` (counter)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Index 메트릭 ──────────────────────────────────────────────────

/// Index: 인덱싱된 문서 수 (counter)
pub const INDEX_DOCUMENTS_TOTAL: &str = "bulwark_index_documents_total";

/// Index: 문서 파싱 실패 수 (counter)
pub const INDEX_PARSE_ERRORS_TOTAL: &str = "bulwark_index_parse_errors_total";

/// Index: 저장소 인덱스 빌드 수 (counter, label: result)
pub const INDEX_BUILDS_TOTAL: &str = "bulwark_index_builds_total";

// ─── Merge 메트릭 ──────────────────────────────────────────────────

/// Merge: 앞선 저장소에 가려져 제외된 문서 수 (counter)
pub const MERGE_SHADOWED_TOTAL: &str = "bulwark_merge_shadowed_total";

// ─── Export 메트릭 ─────────────────────────────────────────────────

/// Export: 출력된 레코드 수 (counter)
pub const EXPORT_RECORDS_TOTAL: &str = "bulwark_export_records_total";

/// Export: 출력된 바이트 수 (counter)
pub const EXPORT_BYTES_TOTAL: &str = "bulwark_export_bytes_total";
