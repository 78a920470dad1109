//! 커서 — 컬렉션 위의 단방향 배치 순회
//!
//! 커서는 컬렉션 참조와 오프셋 하나만 가집니다. 같은 컬렉션 위의
//! 커서들은 서로 독립적으로 진행하며, 순회 중 컬렉션은 변경되지 않습니다.
//!
//! 소진 신호는 두 가지입니다. [`Cursor::next`]는
//! [`QueryError::CursorExhausted`]를 반환하고, [`Cursor::next_batch`]는
//! 끝에서 짧거나 빈 배치를 돌려줄 뿐 에러를 내지 않습니다.

use crate::collection::Collection;
use crate::error::QueryError;
use crate::schema::Document;

/// `next_batch`의 기본 배치 크기
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// 컬렉션 시작부터 끝까지 한 방향으로 진행하는 커서
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    collection: &'a Collection,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(collection: &'a Collection) -> Self {
        Cursor {
            collection,
            offset: 0,
        }
    }

    /// 다음에 반환될 문서의 위치 (0부터 시작)
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 아직 반환되지 않은 문서 수
    pub fn remaining(&self) -> usize {
        self.collection.len() - self.offset
    }

    /// 현재 위치의 문서를 반환하고 한 칸 전진합니다.
    ///
    /// 컬렉션 끝에 도달했으면 [`QueryError::CursorExhausted`]를 반환합니다.
    pub fn next(&mut self) -> Result<&'a Document, QueryError> {
        match self.collection.get(self.offset) {
            Some(document) => {
                self.offset += 1;
                Ok(document)
            }
            None => Err(QueryError::CursorExhausted {
                offset: self.offset,
            }),
        }
    }

    /// 현재 위치부터 최대 `size`개의 문서를 반환하고 그만큼 전진합니다.
    ///
    /// 꼬리에서는 짧은 배치를, 소진 후에는 빈 배치를 돌려줍니다.
    /// 빈 배치가 곧 소진 신호이므로 에러를 내지 않습니다.
    pub fn next_batch(&mut self, size: usize) -> Vec<&'a Document> {
        let take = size.min(self.remaining());
        let start = self.offset;
        self.offset += take;

        (start..start + take)
            .filter_map(|i| self.collection.get(i))
            .collect()
    }

    /// [`DEFAULT_BATCH_SIZE`] 크기의 배치를 반환합니다.
    pub fn next_default_batch(&mut self) -> Vec<&'a Document> {
        self.next_batch(DEFAULT_BATCH_SIZE)
    }
}
