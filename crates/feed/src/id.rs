//! 피드 식별자 — 연도별/증분 피드 이름과 URL 생성
//!
//! NVD 1.0 JSON 피드는 연도별 피드(`nvdcve-1.0-2019`)와 두 개의 증분
//! 피드(`recent`, `modified`)로 나뉩니다. [`FeedId`]는 이 이름 공간을
//! 타입으로 고정하고 메타/아카이브 파일명과 URL을 만들어냅니다.

use std::fmt;
use std::str::FromStr;

use crate::error::FeedFetchError;

/// 연도별 피드가 시작되는 해
pub const FIRST_FEED_YEAR: u16 = 2002;

/// NVD 피드 하나를 가리키는 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedId {
    /// 연도별 전체 피드 (2002..=2999)
    Year(u16),
    /// 최근 8일간 추가/수정된 레코드
    Recent,
    /// 전체 기간의 수정 레코드
    Modified,
}

impl FeedId {
    /// `.meta` 파일명 (`nvdcve-1.0-{feed}.meta`)
    pub fn meta_filename(&self) -> String {
        format!("nvdcve-1.0-{self}.meta")
    }

    /// 압축 해제된 데이터 파일명 (`nvdcve-1.0-{feed}.json`)
    pub fn data_filename(&self) -> String {
        format!("nvdcve-1.0-{self}.json")
    }

    /// 다운로드 아카이브 파일명 (`nvdcve-1.0-{feed}.json.gz`)
    pub fn archive_filename(&self) -> String {
        format!("nvdcve-1.0-{self}.json.gz")
    }

    /// 메타 파일 전체 URL을 만듭니다. `base`는 슬래시로 끝나야 합니다.
    pub fn meta_url(&self, base: &str) -> String {
        format!("{base}{}", self.meta_filename())
    }

    /// 아카이브 전체 URL을 만듭니다. `base`는 슬래시로 끝나야 합니다.
    pub fn archive_url(&self, base: &str) -> String {
        format!("{base}{}", self.archive_filename())
    }

    /// 전체 미러링 대상 피드 목록 (연도 오름차순 + `recent` + `modified`)
    pub fn full_set(current_year: u16) -> Vec<FeedId> {
        let mut feeds: Vec<FeedId> = (FIRST_FEED_YEAR..=current_year.max(FIRST_FEED_YEAR))
            .map(FeedId::Year)
            .collect();
        feeds.push(FeedId::Recent);
        feeds.push(FeedId::Modified);
        feeds
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedId::Year(year) => write!(f, "{year}"),
            FeedId::Recent => write!(f, "recent"),
            FeedId::Modified => write!(f, "modified"),
        }
    }
}

impl FromStr for FeedId {
    type Err = FeedFetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(FeedId::Recent),
            "modified" => Ok(FeedId::Modified),
            other => match other.parse::<u16>() {
                Ok(year) if (FIRST_FEED_YEAR..=2999).contains(&year) => Ok(FeedId::Year(year)),
                _ => Err(FeedFetchError::InvalidFeedId {
                    input: s.to_owned(),
                }),
            },
        }
    }
}

// JSON 리포트에서 피드를 표시 문자열로 직렬화합니다.
impl serde::Serialize for FeedId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
