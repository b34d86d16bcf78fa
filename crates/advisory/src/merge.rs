//! 병합 엔진 -- 인덱스 집합을 식별 키 순서의 지연 시퀀스로 병합합니다.
//!
//! 각 저장소 인덱스는 이미 키 순으로 정렬되어 있으므로, 인덱스마다 선두 항목 하나만
//! 힙에 두는 k-way 병합으로 전체 병합 결과를 만들지 않고 한 번에 한 문서씩 내보냅니다.
//!
//! # 충돌 규칙
//!
//! 같은 키가 여러 인덱스에 있으면 집합에서 가장 앞선 인덱스의 문서가 선택되고
//! 나머지는 내용과 관계없이 버려집니다. 필드 단위 병합은 하지 않습니다.
//!
//! ```text
//! index[0]: curl(A) openssl(A)
//! index[1]: curl(B)            zlib(B)
//!            |       |          |
//! output:   curl(A) openssl(A) zlib(B)
//! ```

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::btree_map::Values;

use metrics::counter;
use tracing::debug;

use bulwark_core::metrics as m;

use crate::document::{AdvisoryKey, Document};
use crate::error::AdvisoryIndexError;
use crate::index::RepositoryIndex;
use crate::index_set::IndexSet;

/// 인덱스 집합을 병합한 지연 시퀀스를 만듭니다.
///
/// # Errors
///
/// 집합이 비어 있으면 `NoSources`를 반환합니다. 그 외에는 실패하지 않습니다.
pub fn merge(set: &IndexSet) -> Result<MergedDocuments<'_>, AdvisoryIndexError> {
    if set.is_empty() {
        return Err(AdvisoryIndexError::NoSources);
    }
    Ok(MergedDocuments::new(set))
}

/// 병합된 문서의 지연 시퀀스
///
/// `next()`가 호출될 때마다 다음 키의 우선 문서 하나를 계산합니다.
pub struct MergedDocuments<'a> {
    cursors: Vec<Values<'a, AdvisoryKey, Document>>,
    heads: Vec<Option<&'a Document>>,
    /// (키, 인덱스 순번) 최소 힙 -- 같은 키면 순번이 작은 쪽이 먼저 나옵니다.
    heap: BinaryHeap<Reverse<(&'a AdvisoryKey, usize)>>,
    shadowed: usize,
}

impl<'a> MergedDocuments<'a> {
    fn new(set: &'a IndexSet) -> Self {
        let cursors: Vec<_> = set.iter().map(RepositoryIndex::documents).collect();
        let count = cursors.len();
        let mut merged = Self {
            cursors,
            heads: vec![None; count],
            heap: BinaryHeap::with_capacity(count),
            shadowed: 0,
        };
        for ordinal in 0..count {
            merged.advance(ordinal);
        }
        merged
    }

    /// 해당 인덱스의 커서를 한 칸 전진시키고 새 선두를 힙에 넣습니다.
    fn advance(&mut self, ordinal: usize) {
        let next = self.cursors[ordinal].next();
        self.heads[ordinal] = next;
        if let Some(doc) = next {
            self.heap.push(Reverse((doc.key(), ordinal)));
        }
    }

    /// 지금까지 앞선 저장소에 가려져 버려진 문서 수
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }
}

impl<'a> Iterator for MergedDocuments<'a> {
    type Item = &'a Document;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse((key, ordinal)) = self.heap.pop()?;
        let winner = self.heads[ordinal]?;
        self.advance(ordinal);

        loop {
            match self.heap.peek() {
                Some(Reverse((next_key, _))) if *next_key == key => {}
                _ => break,
            }
            let Some(Reverse((_, other))) = self.heap.pop() else {
                break;
            };
            if let Some(dropped) = self.heads[other] {
                self.shadowed += 1;
                counter!(m::MERGE_SHADOWED_TOTAL).increment(1);
                debug!(
                    key = %key,
                    kept = %winner.provenance(),
                    dropped = %dropped.provenance(),
                    "advisory document shadowed by earlier repository"
                );
            }
            self.advance(other);
        }

        Some(winner)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // 힙이 비어 있지 않으면 최소 한 개의 키가 남아 있습니다.
        let remaining: usize = self.cursors.iter().map(ExactSizeIterator::len).sum::<usize>()
            + self.heap.len();
        let lower = usize::from(!self.heap.is_empty());
        (lower, Some(remaining))
    }
}
