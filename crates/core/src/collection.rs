//! 컬렉션 — 문서 집합과 AND 결합 쿼리
//!
//! [`Collection`]은 적재된 순서를 보존하는 인메모리 문서 목록입니다.
//! [`find`]는 모든 (경로, 셀렉터) 항목을 만족하는 문서만 모아 새 컬렉션을
//! 돌려주며 원본은 변경하지 않습니다. OR/NOT 결합은 지원하지 않습니다.
//! 확장 방향은 DESIGN.md에 기록되어 있습니다.
//!
//! [`find`]: Collection::find

use rand::seq::index;
use tracing::debug;

use crate::cursor::Cursor;
use crate::error::QueryError;
use crate::paths::resolve_path;
use crate::projection::{Projection, ProjectionSpec};
use crate::schema::{Document, Node};
use crate::selector::Selector;

/// 경로별 셀렉터의 AND 결합
///
/// 리터럴은 [`Selector`]로 암묵 변환되므로 다음 두 쿼리는 동일합니다.
///
/// ```
/// use nvdex_core::{Query, selector};
///
/// let implicit = Query::new().with("cve.year", 2016);
/// let explicit = Query::new().with("cve.year", selector::eq(2016));
/// assert_eq!(implicit.entries().len(), explicit.entries().len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    entries: Vec<(String, Selector)>,
}

impl Query {
    /// 빈 쿼리를 만듭니다. 빈 쿼리는 모든 문서와 일치합니다.
    pub fn new() -> Self {
        Query::default()
    }

    /// (경로, 셀렉터) 항목을 추가합니다.
    pub fn with(mut self, path: impl Into<String>, selector: impl Into<Selector>) -> Self {
        self.entries.push((path.into(), selector.into()));
        self
    }

    /// 항목이 하나도 없으면 true.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 추가된 순서대로 항목을 반환합니다.
    pub fn entries(&self) -> &[(String, Selector)] {
        &self.entries
    }
}

/// 컬렉션을 뒷받침하는 저장 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdapterKind {
    /// 인메모리 저장 (현재 유일한 구현)
    #[default]
    Memory,
}

/// 순서가 보존되는 문서 집합
///
/// 문서 목록은 생성 이후 변경되지 않습니다. 유일한 가변 상태는
/// 표시용 이름뿐입니다.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    documents: Vec<Document>,
    name: Option<String>,
    kind: AdapterKind,
}

impl Collection {
    /// 문서 목록으로 컬렉션을 만듭니다.
    pub fn new(documents: Vec<Document>) -> Self {
        Collection {
            documents,
            name: None,
            kind: AdapterKind::Memory,
        }
    }

    /// 문서 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// 문서가 하나도 없으면 true.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// 적재 순서 그대로의 문서 슬라이스를 반환합니다.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// 주어진 위치의 문서를 반환합니다.
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// 저장 방식 태그를 반환합니다.
    pub fn kind(&self) -> AdapterKind {
        self.kind
    }

    /// 표시용 이름을 설정합니다.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// 표시용 이름을 반환합니다. `find` 결과는 이름이 초기화된 상태입니다.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 모든 쿼리 항목을 만족하는 문서를 모아 새 컬렉션을 만듭니다.
    ///
    /// 결과는 원본의 상대 순서를 보존하고, 이름은 초기화됩니다.
    /// 빈 쿼리는 전체 복사본을 돌려줍니다.
    pub fn find(&self, query: &Query) -> Collection {
        let matched: Vec<Document> = self
            .documents
            .iter()
            .filter(|doc| {
                let tree = doc.to_value();
                query
                    .entries()
                    .iter()
                    .all(|(path, selector)| selector.matches(&resolve_path(&tree, path)))
            })
            .cloned()
            .collect();

        debug!(
            matched = matched.len(),
            total = self.documents.len(),
            terms = query.entries().len(),
            "find complete"
        );

        Collection {
            documents: matched,
            name: None,
            kind: self.kind,
        }
    }

    /// 비복원 추출로 `n`개의 문서를 무작위로 뽑습니다.
    ///
    /// `n`이 컬렉션 크기를 넘으면
    /// [`QueryError::InsufficientDocuments`]를 반환합니다.
    pub fn sample(&self, n: usize) -> Result<Vec<Document>, QueryError> {
        if n > self.documents.len() {
            return Err(QueryError::InsufficientDocuments {
                requested: n,
                available: self.documents.len(),
            });
        }
        let mut rng = rand::thread_rng();
        let picked = index::sample(&mut rng, self.documents.len(), n);
        Ok(picked
            .into_iter()
            .map(|i| self.documents[i].clone())
            .collect())
    }

    /// 컬렉션 시작 위치의 커서를 만듭니다.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }

    /// 앞에서부터 최대 `sample_size`개의 문서를 렌더링합니다.
    ///
    /// `None`이면 전체를 렌더링합니다. 문서 사이는 빈 줄로 구분합니다.
    pub fn pretty(&self, sample_size: Option<usize>) -> String {
        let take = sample_size
            .unwrap_or(self.documents.len())
            .min(self.documents.len());

        let rendered: Vec<String> = self.documents[..take]
            .iter()
            .map(Document::pretty)
            .collect();
        rendered.join("\n")
    }

    /// 각 문서에 같은 프로젝션을 적용한 결과를 순서대로 반환합니다.
    pub fn project(&self, spec: &ProjectionSpec) -> Vec<Projection> {
        self.documents.iter().map(|doc| doc.project(spec)).collect()
    }
}
