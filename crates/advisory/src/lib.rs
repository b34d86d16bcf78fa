//! Bulwark advisory -- 저장소 인덱싱, 병합, 스트리밍 내보내기
//!
//! 하나 이상의 advisory 저장소 디렉토리를 읽어 저장소별 인덱스를 만들고,
//! 식별 키 기준으로 병합한 결과를 출력 대상에 한 레코드씩 기록합니다.
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 타입 (`AdvisoryIndexError`)
//! - [`config`]: 인덱스 설정 (`AdvisoryIndexConfig`, builder)
//! - [`document`]: 문서 모델 (`Document`, `AdvisoryKey`, `Provenance`)
//! - [`source`]: 문서 소스 (`DocumentSource` trait, `FsDocumentSource`)
//! - [`index`]: 저장소 인덱스 (`RepositoryIndex`)
//! - [`index_set`]: 순서 있는 인덱스 집합 (`IndexSet`)
//! - [`merge`]: 지연 k-way 병합 (`MergedDocuments`)
//! - [`serialize`]: 스트림 직렬화 (`StreamSerializer`, `RecordEncoder`)
//! - [`export`]: 병합 + 직렬화 진입점
//!
//! # Architecture
//!
//! ```text
//! roots[0] --> FsDocumentSource --> RepositoryIndex --+
//! roots[1] --> FsDocumentSource --> RepositoryIndex --+--> IndexSet
//!   ...                                               |
//!                                                     v
//!                                     merge() --> MergedDocuments (lazy)
//!                                                     |
//!                                                     v
//!                                     StreamSerializer --> io::Write
//! ```
//!
//! 같은 식별 키가 여러 저장소에 있으면 `roots` 목록에서 앞선 저장소의 문서가 우선합니다.

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod index;
pub mod index_set;
pub mod merge;
pub mod serialize;
pub mod source;

// --- Public API Re-exports ---

// Configuration
pub use config::{AdvisoryIndexConfig, AdvisoryIndexConfigBuilder};

// Error
pub use error::AdvisoryIndexError;

// Document model
pub use document::{AdvisoryKey, Document, Provenance, parse_document};

// Source
pub use source::{DocumentSource, FsDocumentSource, SourceEntries, SourceEntry};

// Index
pub use index::RepositoryIndex;
pub use index_set::IndexSet;

// Merge
pub use merge::{MergedDocuments, merge};

// Serialize
pub use serialize::{
    ExportRecord, JsonLinesEncoder, RecordEncoder, SerializeSummary, StreamSerializer,
    YamlStreamEncoder,
};

// Export
pub use export::{ExportOptions, ExportSummary, export};

pub use bulwark_core::types::ExportFormat;
