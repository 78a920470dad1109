#![doc = include_str!("../README.md")]

pub mod collection;
pub mod config;
pub mod cursor;
pub mod error;
pub mod paths;
pub mod projection;
pub mod schema;
pub mod selector;
pub mod value;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, FeedError, NvdexError, QueryError};

// 설정
pub use config::NvdexConfig;

// 값 트리
pub use value::{TIMESTAMP_FORMAT, Value};

// 스키마 노드
pub use schema::{
    Affects, Configurations, Cve, Cvss, Document, Impact, Node, Product, References,
};

// 경로 해석
pub use paths::{resolve, resolve_path};

// 셀렉터 (생성자 함수는 `selector::gt(...)` 형태로 모듈 경유 사용)
pub use selector::Selector;

// 프로젝션
pub use projection::{Projection, ProjectionSpec};

// 컬렉션과 커서
pub use collection::{AdapterKind, Collection, Query};
pub use cursor::{Cursor, DEFAULT_BATCH_SIZE};
