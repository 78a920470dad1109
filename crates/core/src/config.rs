//! 설정 관리 — nvdex.toml 파싱 및 런타임 설정
//!
//! [`NvdexConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`NVDEX_FEED_CONCURRENCY=4` 형식)
//! 3. 설정 파일 (`nvdex.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), nvdex_core::error::NvdexError> {
//! use nvdex_core::config::NvdexConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = NvdexConfig::load("nvdex.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = NvdexConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, NvdexError};

/// Nvdex 통합 설정
///
/// `nvdex.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NvdexConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 피드 다운로드 설정
    #[serde(default)]
    pub feed: FeedConfig,
}

impl NvdexConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, NvdexError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에 환경변수만 적용해 로드합니다.
    ///
    /// 설정 파일이 선택 사항인 호출자(CLI)를 위한 진입점입니다.
    /// 파일 부재 외의 로드 실패는 그대로 에러로 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, NvdexError> {
        match Self::load(path).await {
            Err(NvdexError::Config(ConfigError::FileNotFound { .. })) => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, NvdexError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NvdexError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                NvdexError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, NvdexError> {
        toml::from_str(toml_str).map_err(|e| {
            NvdexError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `NVDEX_{SECTION}_{FIELD}`
    /// 예: `NVDEX_FEED_CONCURRENCY=4`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "NVDEX_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "NVDEX_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.data_dir, "NVDEX_GENERAL_DATA_DIR");

        // Feed
        override_string(&mut self.feed.meta_base_url, "NVDEX_FEED_META_BASE_URL");
        override_string(&mut self.feed.data_base_url, "NVDEX_FEED_DATA_BASE_URL");
        override_usize(&mut self.feed.concurrency, "NVDEX_FEED_CONCURRENCY");
        override_u64(&mut self.feed.timeout_secs, "NVDEX_FEED_TIMEOUT_SECS");
        override_bool(
            &mut self.feed.verify_checksums,
            "NVDEX_FEED_VERIFY_CHECKSUMS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), NvdexError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 동시 다운로드 수 검증
        if self.feed.concurrency == 0 || self.feed.concurrency > 32 {
            return Err(ConfigError::InvalidValue {
                field: "feed.concurrency".to_owned(),
                reason: "must be between 1 and 32".to_owned(),
            }
            .into());
        }

        // 타임아웃 검증
        if self.feed.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.timeout_secs".to_owned(),
                reason: "must be at least 1".to_owned(),
            }
            .into());
        }

        // 베이스 URL 검증 — 파일명이 바로 이어붙기 때문에 슬래시로 끝나야 함
        if !self.feed.meta_base_url.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "feed.meta_base_url".to_owned(),
                reason: "must end with a trailing slash".to_owned(),
            }
            .into());
        }
        if !self.feed.data_base_url.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "feed.data_base_url".to_owned(),
                reason: "must end with a trailing slash".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 피드 데이터 저장 디렉토리
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
            data_dir: default_data_dir(),
        }
    }
}

/// 피드 다운로드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// `.meta` 파일 베이스 URL
    pub meta_base_url: String,
    /// `.json.gz` 아카이브 베이스 URL
    pub data_base_url: String,
    /// 동시 다운로드 개수 (1..=32)
    pub concurrency: usize,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// SHA-256 체크섬 검증 여부
    pub verify_checksums: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            meta_base_url: "https://nvd.nist.gov/feeds/json/cve/1.0/".to_owned(),
            data_base_url: "https://static.nvd.nist.gov/feeds/json/cve/1.0/".to_owned(),
            concurrency: 10,
            timeout_secs: 300,
            verify_checksums: true,
        }
    }
}

/// 기본 데이터 디렉토리 (`$XDG_DATA_HOME/nvdex`, 없으면 `~/.local/share/nvdex`)
fn default_data_dir() -> String {
    match std::env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => format!("{xdg}/nvdex"),
        _ => match std::env::var("HOME") {
            Ok(home) if !home.is_empty() => format!("{home}/.local/share/nvdex"),
            _ => ".nvdex".to_owned(),
        },
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
