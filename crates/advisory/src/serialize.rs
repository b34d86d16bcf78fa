//! 스트림 직렬화 -- 병합된 문서 시퀀스를 출력 대상에 한 레코드씩 씁니다.
//!
//! 직렬화기는 시퀀스에서 문서를 하나 꺼내 인코딩하고 곧바로 출력 대상에 기록한 뒤
//! 다음 문서를 꺼냅니다. 전체 출력을 메모리에 모으지 않으므로 메모리 사용량은
//! 가장 큰 레코드 하나의 크기에 비례합니다.
//!
//! # 레코드 형식
//!
//! 각 레코드는 다음 필드를 가집니다.
//!
//! | 필드 | 내용 |
//! |------|------|
//! | `id` | 식별 키 |
//! | `source` | 저장소 루트 기준 상대 경로 (`/` 구분) |
//! | `document` | 원본 문서 본문 |
//!
//! 루트의 절대 경로는 레코드에 포함하지 않으므로 같은 저장소 내용이면 체크아웃 위치와
//! 관계없이 바이트 단위로 같은 출력이 나옵니다.

use std::io::Write;
use std::path::{Component, Path};

use metrics::counter;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use bulwark_core::metrics as m;
use bulwark_core::types::ExportFormat;

use crate::document::Document;
use crate::error::AdvisoryIndexError;

/// 출력 레코드 하나
#[derive(Debug, Serialize)]
pub struct ExportRecord<'a> {
    /// 식별 키
    pub id: &'a str,
    /// 저장소 루트 기준 상대 경로
    pub source: String,
    /// 문서 본문
    pub document: &'a Value,
}

impl<'a> ExportRecord<'a> {
    /// 문서로부터 레코드를 만듭니다.
    pub fn from_document(doc: &'a Document) -> Self {
        Self {
            id: doc.key().as_str(),
            source: portable_path(doc.provenance().path()),
            document: doc.content(),
        }
    }
}

/// 레코드 인코더 trait
///
/// 인코더는 레코드 하나를 자기 구분되는 바이트열로 `buf` 끝에 덧붙입니다.
/// 출력 대상에 직접 쓰지 않으므로 부분 레코드가 기록되는 일이 없습니다.
pub trait RecordEncoder: Send + Sync {
    /// 형식 이름
    fn name(&self) -> &'static str;

    /// 레코드를 인코딩하여 `buf`에 덧붙입니다.
    fn encode(&self, record: &ExportRecord<'_>, buf: &mut Vec<u8>)
    -> Result<(), AdvisoryIndexError>;
}

/// JSON Lines 인코더 -- 레코드마다 한 줄
pub struct JsonLinesEncoder;

impl RecordEncoder for JsonLinesEncoder {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn encode(
        &self,
        record: &ExportRecord<'_>,
        buf: &mut Vec<u8>,
    ) -> Result<(), AdvisoryIndexError> {
        serde_json::to_writer(&mut *buf, record).map_err(|e| AdvisoryIndexError::Encode {
            key: record.id.to_owned(),
            reason: e.to_string(),
        })?;
        buf.push(b'\n');
        Ok(())
    }
}

/// YAML 멀티 문서 인코더 -- 레코드마다 `---` 구분자로 시작
pub struct YamlStreamEncoder;

impl RecordEncoder for YamlStreamEncoder {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn encode(
        &self,
        record: &ExportRecord<'_>,
        buf: &mut Vec<u8>,
    ) -> Result<(), AdvisoryIndexError> {
        buf.extend_from_slice(b"---\n");
        serde_yaml::to_writer(&mut *buf, record).map_err(|e| AdvisoryIndexError::Encode {
            key: record.id.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// 직렬화 결과 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeSummary {
    /// 기록된 레코드 수
    pub records: usize,
    /// 기록된 바이트 수
    pub bytes: usize,
}

/// pull 방식 스트림 직렬화기
pub struct StreamSerializer {
    encoder: Box<dyn RecordEncoder>,
}

impl StreamSerializer {
    /// 출력 형식에 맞는 인코더로 직렬화기를 생성합니다.
    pub fn new(format: ExportFormat) -> Self {
        let encoder: Box<dyn RecordEncoder> = match format {
            ExportFormat::Jsonl => Box::new(JsonLinesEncoder),
            ExportFormat::Yaml => Box::new(YamlStreamEncoder),
        };
        Self::with_encoder(encoder)
    }

    /// 지정한 인코더로 직렬화기를 생성합니다.
    pub fn with_encoder(encoder: Box<dyn RecordEncoder>) -> Self {
        Self { encoder }
    }

    /// 인코더 형식 이름
    pub fn format_name(&self) -> &'static str {
        self.encoder.name()
    }

    /// 문서 시퀀스를 끝까지 소비하며 출력 대상에 기록합니다.
    ///
    /// 레코드마다 인코딩 직후 `write_all`로 기록하고, 시퀀스가 끝나면 `flush`합니다.
    ///
    /// # Errors
    ///
    /// - 쓰기 또는 flush 실패 시 `SinkWrite` (그 시점까지 완전히 기록된 레코드 수 포함)
    /// - 인코딩 실패 시 `Encode`
    ///
    /// 에러가 나면 즉시 중단하며, 이미 기록된 레코드는 되돌리지 않습니다.
    pub fn serialize<'a, I, W>(
        &self,
        documents: I,
        sink: &mut W,
    ) -> Result<SerializeSummary, AdvisoryIndexError>
    where
        I: IntoIterator<Item = &'a Document>,
        W: Write + ?Sized,
    {
        let mut summary = SerializeSummary::default();
        let mut buf = Vec::with_capacity(4096);

        for doc in documents {
            buf.clear();
            self.encoder
                .encode(&ExportRecord::from_document(doc), &mut buf)?;

            sink.write_all(&buf)
                .map_err(|source| AdvisoryIndexError::SinkWrite {
                    written: summary.records,
                    source,
                })?;

            summary.records += 1;
            summary.bytes += buf.len();
            counter!(m::EXPORT_RECORDS_TOTAL).increment(1);
            counter!(m::EXPORT_BYTES_TOTAL).increment(buf.len() as u64);
        }

        sink.flush().map_err(|source| AdvisoryIndexError::SinkWrite {
            written: summary.records,
            source,
        })?;

        debug!(
            format = self.encoder.name(),
            records = summary.records,
            bytes = summary.bytes,
            "advisory stream serialized"
        );
        Ok(summary)
    }
}

/// 플랫폼과 관계없이 `/`로 구분된 상대 경로 문자열을 만듭니다.
fn portable_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
