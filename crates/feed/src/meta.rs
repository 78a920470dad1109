//! 피드 메타데이터 — NVD `.meta` 파일 파싱
//!
//! 각 피드 아카이브에는 `lastModifiedDate`, 크기, SHA-256 다이제스트를
//! 담은 `.meta` 텍스트 파일이 붙어 있습니다. 아카이브를 내려받기 전에
//! 이 파일만 먼저 받아 로컬 캐시가 최신인지 판정합니다.

use chrono::{DateTime, NaiveDateTime};

use crate::error::FeedFetchError;
use crate::id::FeedId;

/// `.meta` 파일 한 장의 파싱 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMetadata {
    /// 피드가 서버에서 마지막으로 갱신된 시각 (UTC)
    pub last_modified: NaiveDateTime,
    /// 압축 해제된 JSON 크기 (바이트)
    pub size: u64,
    /// zip 아카이브 크기 (바이트)
    pub zip_size: u64,
    /// gzip 아카이브 크기 (바이트)
    pub gz_size: u64,
    /// 압축 해제된 JSON의 SHA-256 다이제스트 (소문자 16진수)
    pub sha256: String,
}

impl FeedMetadata {
    /// `key:value` 줄 목록으로 구성된 `.meta` 본문을 파싱합니다.
    ///
    /// 줄 끝의 CR은 무시하고, 모르는 키는 건너뜁니다. 필수 키가
    /// 빠졌거나 값이 파싱되지 않으면 [`FeedFetchError::Metadata`]를
    /// 돌려줍니다.
    pub fn parse(feed: FeedId, text: &str) -> Result<Self, FeedFetchError> {
        let mut last_modified = None;
        let mut size = None;
        let mut zip_size = None;
        let mut gz_size = None;
        let mut sha256 = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // lastModifiedDate 값에도 콜론이 들어 있으므로 첫 콜론만 자릅니다.
            let Some((key, value)) = line.split_once(':') else {
                return Err(metadata_error(feed, format!("malformed line '{line}'")));
            };
            let value = value.trim();

            match key.trim() {
                "lastModifiedDate" => {
                    let parsed = DateTime::parse_from_rfc3339(value).map_err(|e| {
                        metadata_error(feed, format!("invalid lastModifiedDate '{value}': {e}"))
                    })?;
                    last_modified = Some(parsed.naive_utc());
                }
                "size" => size = Some(parse_size(feed, "size", value)?),
                "zipSize" => zip_size = Some(parse_size(feed, "zipSize", value)?),
                "gzSize" => gz_size = Some(parse_size(feed, "gzSize", value)?),
                "sha256" => sha256 = Some(value.to_ascii_lowercase()),
                _ => {}
            }
        }

        Ok(FeedMetadata {
            last_modified: last_modified
                .ok_or_else(|| missing_field(feed, "lastModifiedDate"))?,
            size: size.ok_or_else(|| missing_field(feed, "size"))?,
            zip_size: zip_size.ok_or_else(|| missing_field(feed, "zipSize"))?,
            gz_size: gz_size.ok_or_else(|| missing_field(feed, "gzSize"))?,
            sha256: sha256.ok_or_else(|| missing_field(feed, "sha256"))?,
        })
    }
}

fn parse_size(feed: FeedId, key: &str, value: &str) -> Result<u64, FeedFetchError> {
    value
        .parse::<u64>()
        .map_err(|e| metadata_error(feed, format!("invalid {key} '{value}': {e}")))
}

fn metadata_error(feed: FeedId, reason: String) -> FeedFetchError {
    FeedFetchError::Metadata { feed, reason }
}

fn missing_field(feed: FeedId, key: &str) -> FeedFetchError {
    metadata_error(feed, format!("missing field '{key}'"))
}
