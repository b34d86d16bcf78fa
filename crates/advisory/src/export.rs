//! 내보내기 -- 병합과 스트림 직렬화를 묶은 진입점

use std::io::Write;

use tracing::info;

use bulwark_core::types::ExportFormat;

use crate::error::AdvisoryIndexError;
use crate::index_set::IndexSet;
use crate::merge::merge;
use crate::serialize::StreamSerializer;

/// 내보내기 옵션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// 출력 형식
    pub format: ExportFormat,
}

/// 내보내기 결과 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// 기록된 레코드 수
    pub records: usize,
    /// 기록된 바이트 수
    pub bytes: usize,
    /// 앞선 저장소에 가려져 제외된 문서 수
    pub shadowed: usize,
}

/// 인덱스 집합을 병합하여 출력 대상에 스트리밍합니다.
///
/// # Errors
///
/// - 집합이 비어 있으면 `NoSources` (출력 대상에는 아무것도 쓰지 않음)
/// - 쓰기 실패 시 `SinkWrite`
pub fn export<W>(
    set: &IndexSet,
    options: &ExportOptions,
    sink: &mut W,
) -> Result<ExportSummary, AdvisoryIndexError>
where
    W: Write + ?Sized,
{
    let mut merged = merge(set)?;
    let serialized = StreamSerializer::new(options.format).serialize(&mut merged, sink)?;

    let summary = ExportSummary {
        records: serialized.records,
        bytes: serialized.bytes,
        shadowed: merged.shadowed(),
    };
    info!(
        repositories = set.len(),
        records = summary.records,
        shadowed = summary.shadowed,
        format = %options.format,
        "advisory export completed"
    );
    Ok(summary)
}
