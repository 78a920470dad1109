//! 피드 다운로더 — 메타 비교, 병렬 다운로드, 체크섬 검증
//!
//! 피드 하나의 동기화는 세 단계입니다: `.meta`를 받아 서버 쪽 다이제스트를
//! 확인하고, 로컬 캐시와 다르면 `.json.gz` 아카이브를 받아 압축을 푼 뒤,
//! 다이제스트를 검증하고 저장소에 기록합니다. 여러 피드는 세마포어로
//! 동시성을 제한한 태스크들이 나눠 받습니다.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use flate2::read::GzDecoder;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use nvdex_core::NvdexConfig;

use crate::error::FeedFetchError;
use crate::id::FeedId;
use crate::meta::FeedMetadata;
use crate::store::{self, FeedStore};

/// 피드 하나를 동기화한 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// 로컬 캐시가 서버 다이제스트와 일치해 다운로드를 건너뜀
    UpToDate,
    /// 아카이브를 새로 내려받아 캐시를 갱신함
    Downloaded,
}

/// 피드별 동기화 결과 묶음
#[derive(Debug)]
pub struct FeedOutcome {
    /// 대상 피드
    pub feed: FeedId,
    /// 성공 시 상태, 실패 시 원인
    pub result: Result<FetchStatus, FeedFetchError>,
}

/// NVD 피드 미러링 클라이언트
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    store: FeedStore,
    meta_base_url: String,
    data_base_url: String,
    limiter: Arc<Semaphore>,
    verify_checksums: bool,
    cancel: CancellationToken,
}

impl FeedClient {
    /// 설정에서 클라이언트를 만듭니다.
    pub fn new(config: &NvdexConfig) -> Result<Self, FeedFetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.feed.timeout_secs))
            .build()
            .map_err(|source| FeedFetchError::ClientBuild { source })?;

        Ok(FeedClient {
            http,
            store: FeedStore::new(config.general.data_dir.as_str()),
            meta_base_url: config.feed.meta_base_url.clone(),
            data_base_url: config.feed.data_base_url.clone(),
            limiter: Arc::new(Semaphore::new(config.feed.concurrency)),
            verify_checksums: config.feed.verify_checksums,
            cancel: CancellationToken::new(),
        })
    }

    /// 취소 토큰. 시그널 핸들러가 이 토큰을 쥐고 진행 중인 다운로드를 멈춥니다.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 클라이언트가 쓰는 로컬 저장소
    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    /// 피드 목록을 병렬로 동기화하고 피드별 결과를 입력 순서대로 돌려줍니다.
    ///
    /// 개별 피드의 실패는 [`FeedOutcome`]에 담길 뿐 다른 피드를 멈추지
    /// 않습니다. 저장소 디렉터리 생성 실패만 전체 에러로 반환됩니다.
    pub async fn fetch_all(&self, feeds: &[FeedId]) -> Result<Vec<FeedOutcome>, FeedFetchError> {
        self.store.ensure_dir().await?;
        info!(
            feeds = feeds.len(),
            concurrency = self.limiter.available_permits(),
            "starting feed sync"
        );

        let mut handles = Vec::with_capacity(feeds.len());
        for &feed in feeds {
            let client = self.clone();
            handles.push((feed, tokio::spawn(async move { client.fetch_one(feed).await })));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (feed, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(FeedFetchError::Task {
                    feed,
                    reason: format!("join failed: {e}"),
                }),
            };
            if let Err(ref e) = result {
                warn!(feed = %feed, error = %e, "feed sync failed");
            }
            outcomes.push(FeedOutcome { feed, result });
        }

        let downloaded = count_status(&outcomes, FetchStatus::Downloaded);
        let up_to_date = count_status(&outcomes, FetchStatus::UpToDate);
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(downloaded, up_to_date, failed, "feed sync finished");

        Ok(outcomes)
    }

    /// 피드 하나를 동기화합니다. 취소 토큰이 내려가면 즉시 중단합니다.
    pub async fn fetch_one(&self, feed: FeedId) -> Result<FetchStatus, FeedFetchError> {
        let permit = tokio::select! {
            _ = self.cancel.cancelled() => return Err(FeedFetchError::Cancelled { feed }),
            permit = self.limiter.clone().acquire_owned() => permit,
        };
        // 세마포어는 닫지 않으므로 acquire 실패도 종료 신호로 취급
        let Ok(_permit) = permit else {
            return Err(FeedFetchError::Cancelled { feed });
        };

        tokio::select! {
            _ = self.cancel.cancelled() => Err(FeedFetchError::Cancelled { feed }),
            result = self.sync_feed(feed) => result,
        }
    }

    async fn sync_feed(&self, feed: FeedId) -> Result<FetchStatus, FeedFetchError> {
        let meta_url = feed.meta_url(&self.meta_base_url);
        debug!(feed = %feed, url = meta_url.as_str(), "fetching feed metadata");

        let meta_text = self.get_text(feed, &meta_url).await?;
        let meta = FeedMetadata::parse(feed, &meta_text)?;

        if self.is_cache_fresh(feed, &meta).await? {
            // 메타만 갱신해 lastModifiedDate를 최신으로 유지
            self.store.write_meta(feed, &meta_text).await?;
            debug!(feed = %feed, sha256 = meta.sha256.as_str(), "cache up to date");
            return Ok(FetchStatus::UpToDate);
        }

        let data_url = feed.archive_url(&self.data_base_url);
        info!(
            feed = %feed,
            url = data_url.as_str(),
            gz_size = meta.gz_size,
            "downloading feed archive"
        );
        let archive = self.get_bytes(feed, &data_url).await?;

        let (json, digest) = tokio::task::spawn_blocking(move || decompress_and_hash(&archive))
            .await
            .map_err(|e| FeedFetchError::Task {
                feed,
                reason: format!("spawn_blocking failed: {e}"),
            })?
            .map_err(|source| FeedFetchError::Decompress { feed, source })?;

        if self.verify_checksums && digest != meta.sha256 {
            return Err(FeedFetchError::ChecksumMismatch {
                feed,
                expected: meta.sha256,
                actual: digest,
            });
        }

        self.store.write_data(feed, &json).await?;
        self.store.write_meta(feed, &meta_text).await?;
        info!(feed = %feed, bytes = json.len(), "feed downloaded");
        Ok(FetchStatus::Downloaded)
    }

    /// 로컬 캐시가 서버 메타와 일치하는지 판정합니다.
    ///
    /// 체크섬 검증이 꺼져 있으면 데이터 파일 존재 여부만 봅니다.
    async fn is_cache_fresh(&self, feed: FeedId, meta: &FeedMetadata) -> Result<bool, FeedFetchError> {
        if self.verify_checksums {
            let cached = self.store.cached_digest(feed).await?;
            Ok(cached.as_deref() == Some(meta.sha256.as_str()))
        } else {
            Ok(tokio::fs::try_exists(self.store.data_path(feed))
                .await
                .unwrap_or(false))
        }
    }

    async fn get_text(&self, feed: FeedId, url: &str) -> Result<String, FeedFetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| FeedFetchError::Download { feed, source })?;
        response
            .text()
            .await
            .map_err(|source| FeedFetchError::Download { feed, source })
    }

    async fn get_bytes(&self, feed: FeedId, url: &str) -> Result<bytes::Bytes, FeedFetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| FeedFetchError::Download { feed, source })?;
        response
            .bytes()
            .await
            .map_err(|source| FeedFetchError::Download { feed, source })
    }
}

fn decompress_and_hash(archive: &[u8]) -> std::io::Result<(Vec<u8>, String)> {
    let mut decoder = GzDecoder::new(archive);
    let mut json = Vec::new();
    decoder.read_to_end(&mut json)?;
    let digest = store::hash_bytes(&json);
    Ok((json, digest))
}

fn count_status(outcomes: &[FeedOutcome], status: FetchStatus) -> usize {
    outcomes
        .iter()
        .filter(|o| matches!(o.result, Ok(s) if s == status))
        .count()
}
