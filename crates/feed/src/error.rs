//! 피드 크레이트 에러 타입
//!
//! [`FeedFetchError`]는 피드 다운로드/검증/적재에서 발생할 수 있는 모든 에러를
//! 나타냅니다. `From<FeedFetchError> for NvdexError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **피드 식별**: `InvalidFeedId`
//! - **다운로드**: `ClientBuild`, `Download`
//! - **메타데이터**: `Metadata`
//! - **검증**: `ChecksumMismatch`, `Decompress`
//! - **저장소**: `StoreIo`
//! - **적재**: `Ingest`
//! - **실행 제어**: `Cancelled`, `Task`

use nvdex_core::error::{FeedError, NvdexError};

use crate::id::FeedId;

/// 피드 도메인 에러
///
/// 다운로드 파이프라인의 모든 에러 시나리오를 포함합니다.
///
/// # 에러 변환
///
/// `From<FeedFetchError> for NvdexError` 구현으로
/// `nvdex-cli`에서 사용하는 최상위 에러 타입으로 자동 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum FeedFetchError {
    /// 파싱할 수 없는 피드 식별자
    #[error("invalid feed id '{input}': expected a year 2002..=2999, 'recent', or 'modified'")]
    InvalidFeedId {
        /// 입력 문자열
        input: String,
    },

    /// HTTP 클라이언트 생성 실패
    #[error("http client build failed: {source}")]
    ClientBuild {
        /// 원본 reqwest 에러
        source: reqwest::Error,
    },

    /// 메타데이터 또는 아카이브 다운로드 실패
    #[error("download failed for {feed}: {source}")]
    Download {
        /// 대상 피드
        feed: FeedId,
        /// 원본 reqwest 에러
        source: reqwest::Error,
    },

    /// `.meta` 파일 파싱 실패
    #[error("metadata error for {feed}: {reason}")]
    Metadata {
        /// 대상 피드
        feed: FeedId,
        /// 실패 사유
        reason: String,
    },

    /// 다운로드한 아카이브의 sha256 불일치
    #[error("checksum mismatch for {feed}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// 대상 피드
        feed: FeedId,
        /// `.meta`가 선언한 다이제스트
        expected: String,
        /// 실제 계산된 다이제스트
        actual: String,
    },

    /// gzip 아카이브 해제 실패
    #[error("decompress failed for {feed}: {source}")]
    Decompress {
        /// 대상 피드
        feed: FeedId,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 로컬 피드 저장소 I/O 실패
    #[error("store io error: {path}: {source}")]
    StoreIo {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 피드 JSON을 문서 컬렉션으로 변환 실패
    #[error("ingest failed: {reason}")]
    Ingest {
        /// 실패 사유
        reason: String,
    },

    /// 취소 신호로 중단됨
    #[error("fetch cancelled for {feed}")]
    Cancelled {
        /// 대상 피드
        feed: FeedId,
    },

    /// 백그라운드 태스크 join 실패
    #[error("task failed for {feed}: {reason}")]
    Task {
        /// 대상 피드
        feed: FeedId,
        /// 실패 사유
        reason: String,
    },
}

impl From<FeedFetchError> for NvdexError {
    fn from(err: FeedFetchError) -> Self {
        match err {
            FeedFetchError::InvalidFeedId { input } => NvdexError::Feed(FeedError::InvalidId(input)),
            FeedFetchError::ClientBuild { source } => NvdexError::Feed(FeedError::Download(
                format!("http client build failed: {source}"),
            )),
            FeedFetchError::Download { feed, source } => {
                NvdexError::Feed(FeedError::Download(format!("{feed}: {source}")))
            }
            FeedFetchError::Metadata { feed, reason } => {
                NvdexError::Feed(FeedError::Metadata(format!("{feed}: {reason}")))
            }
            FeedFetchError::ChecksumMismatch {
                feed,
                expected,
                actual,
            } => NvdexError::Feed(FeedError::Checksum(format!(
                "{feed}: expected {expected}, got {actual}"
            ))),
            FeedFetchError::Decompress { feed, source } => NvdexError::Feed(FeedError::Download(
                format!("{feed}: decompress failed: {source}"),
            )),
            FeedFetchError::StoreIo { path, source } => {
                NvdexError::Feed(FeedError::Store(format!("{path}: {source}")))
            }
            FeedFetchError::Ingest { reason } => NvdexError::Feed(FeedError::Ingest(reason)),
            FeedFetchError::Cancelled { feed } => {
                NvdexError::Feed(FeedError::Cancelled(feed.to_string()))
            }
            FeedFetchError::Task { feed, reason } => {
                NvdexError::Feed(FeedError::Download(format!("{feed}: task failed: {reason}")))
            }
        }
    }
}
