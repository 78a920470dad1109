//! nvdex.toml 통합 설정 테스트
//!
//! - nvdex.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use nvdex_core::config::NvdexConfig;
use nvdex_core::error::{ConfigError, NvdexError};

// =============================================================================
// nvdex.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../nvdex.toml.example");
    let config = NvdexConfig::parse(content).expect("example config should parse");

    // general 기본값 확인
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../nvdex.toml.example");
    let config = NvdexConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_has_correct_feed_defaults() {
    let content = include_str!("../../../nvdex.toml.example");
    let config = NvdexConfig::parse(content).expect("should parse");

    assert_eq!(
        config.feed.meta_base_url,
        "https://nvd.nist.gov/feeds/json/cve/1.0/"
    );
    assert_eq!(
        config.feed.data_base_url,
        "https://static.nvd.nist.gov/feeds/json/cve/1.0/"
    );
    assert_eq!(config.feed.concurrency, 10);
    assert_eq!(config.feed.timeout_secs, 300);
    assert!(config.feed.verify_checksums);
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../nvdex.toml.example");
    let from_file = NvdexConfig::parse(content).expect("should parse");
    let from_code = NvdexConfig::default();

    // data_dir는 예시 파일에서 주석 처리되어 있고 기본값은 환경 의존적이므로 제외
    assert_eq!(from_file.general.log_level, from_code.general.log_level);
    assert_eq!(from_file.general.log_format, from_code.general.log_format);

    assert_eq!(from_file.feed.meta_base_url, from_code.feed.meta_base_url);
    assert_eq!(from_file.feed.data_base_url, from_code.feed.data_base_url);
    assert_eq!(from_file.feed.concurrency, from_code.feed.concurrency);
    assert_eq!(from_file.feed.timeout_secs, from_code.feed.timeout_secs);
    assert_eq!(
        from_file.feed.verify_checksums,
        from_code.feed.verify_checksums
    );
}

// =============================================================================
// 부분 설정 로딩 테스트
// =============================================================================

#[test]
fn partial_config_general_only() {
    let toml = r#"
[general]
log_level = "debug"
log_format = "json"
"#;
    let config = NvdexConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "json");
    // 나머지 섹션은 기본값
    assert_eq!(config.feed.concurrency, 10);
    assert!(config.feed.verify_checksums);
}

#[test]
fn partial_config_feed_only() {
    let toml = r#"
[feed]
concurrency = 2
timeout_secs = 30
"#;
    let config = NvdexConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.feed.concurrency, 2);
    assert_eq!(config.feed.timeout_secs, 30);
    // general은 기본값
    assert_eq!(config.general.log_level, "info");
    // 생략된 피드 필드도 기본값 유지
    assert!(config.feed.meta_base_url.ends_with('/'));
}

#[test]
fn partial_config_two_sections() {
    let toml = r#"
[general]
log_level = "warn"

[feed]
verify_checksums = false
"#;
    let config = NvdexConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "warn");
    assert!(!config.feed.verify_checksums);
    // 생략된 값은 기본값
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.feed.timeout_secs, 300);
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "info"
"#;

    let original = std::env::var("NVDEX_GENERAL_LOG_LEVEL").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("NVDEX_GENERAL_LOG_LEVEL", "error");
    }

    let mut config = NvdexConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.general.log_level.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("NVDEX_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("NVDEX_GENERAL_LOG_LEVEL"),
        }
    }

    assert_eq!(result, "error");
}

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_defaults() {
    let original = std::env::var("NVDEX_FEED_META_BASE_URL").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("NVDEX_FEED_META_BASE_URL", "https://mirror.example.org/");
    }

    let mut config = NvdexConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.feed.meta_base_url.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("NVDEX_FEED_META_BASE_URL", val),
            None => std::env::remove_var("NVDEX_FEED_META_BASE_URL"),
        }
    }

    assert_eq!(result, "https://mirror.example.org/");
}

#[test]
#[serial_test::serial]
fn env_override_bool_field() {
    let original = std::env::var("NVDEX_FEED_VERIFY_CHECKSUMS").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("NVDEX_FEED_VERIFY_CHECKSUMS", "false");
    }

    let mut config = NvdexConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.feed.verify_checksums;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("NVDEX_FEED_VERIFY_CHECKSUMS", val),
            None => std::env::remove_var("NVDEX_FEED_VERIFY_CHECKSUMS"),
        }
    }

    assert!(!result);
}

#[test]
#[serial_test::serial]
fn env_override_numeric_field() {
    let original = std::env::var("NVDEX_FEED_CONCURRENCY").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("NVDEX_FEED_CONCURRENCY", "3");
    }

    let mut config = NvdexConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.feed.concurrency;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("NVDEX_FEED_CONCURRENCY", val),
            None => std::env::remove_var("NVDEX_FEED_CONCURRENCY"),
        }
    }

    assert_eq!(result, 3);
}

#[test]
#[serial_test::serial]
fn env_override_missing_var_keeps_toml_value() {
    let toml = r#"
[general]
log_level = "warn"
"#;

    // SAFETY: 존재하지 않는 변수를 명시적으로 제거
    unsafe {
        std::env::remove_var("NVDEX_GENERAL_LOG_LEVEL");
    }

    let mut config = NvdexConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();

    assert_eq!(config.general.log_level, "warn");
}

// =============================================================================
// 빈 파일 / 잘못된 형식 에러 테스트
// =============================================================================

#[test]
fn empty_string_parses_with_defaults() {
    let config = NvdexConfig::parse("").expect("empty string should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.feed.concurrency, 10);
    assert!(config.feed.verify_checksums);
}

#[test]
fn whitespace_only_parses_with_defaults() {
    let config = NvdexConfig::parse("   \n\n  \t  ").expect("whitespace should parse");
    config.validate().expect("should validate");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn comments_only_parses_with_defaults() {
    let toml = r#"
# 이것은 주석입니다
# 모든 줄이 주석입니다
"#;
    let config = NvdexConfig::parse(toml).expect("comments-only should parse");
    config.validate().expect("should validate");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let result = NvdexConfig::parse("[invalid toml");
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        NvdexError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn invalid_type_returns_parse_error() {
    let toml = r#"
[feed]
verify_checksums = "not_a_bool"
"#;
    let result = NvdexConfig::parse(toml);
    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        NvdexError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn wrong_type_for_numeric_field() {
    let toml = r#"
[feed]
concurrency = "ten"
"#;
    let result = NvdexConfig::parse(toml);
    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        NvdexError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn unknown_section_is_ignored() {
    // serde deny_unknown_fields 미사용이므로 알려지지 않은 섹션은 무시됩니다.
    let toml = r#"
[general]
log_level = "info"

[unknown_section]
foo = "bar"
"#;
    let config = NvdexConfig::parse(toml).expect("unknown section should be ignored");
    assert_eq!(config.general.log_level, "info");
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let result = NvdexConfig::from_file("/tmp/nvdex_test_nonexistent_12345.toml").await;
    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        NvdexError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn load_example_config_from_disk() {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let example_path = format!("{}/../../nvdex.toml.example", manifest_dir);

    let config = NvdexConfig::from_file(&example_path)
        .await
        .expect("example config should load from disk");
    config.validate().expect("loaded example should validate");
    assert_eq!(config.general.log_level, "info");
}

// =============================================================================
// 직렬화 라운드트립 테스트
// =============================================================================

#[test]
fn serialize_and_reparse_roundtrip() {
    let original = NvdexConfig::default();
    let toml_str = toml::to_string_pretty(&original).expect("should serialize");
    let parsed = NvdexConfig::parse(&toml_str).expect("should reparse");
    parsed.validate().expect("reparsed should validate");

    assert_eq!(original.general.log_level, parsed.general.log_level);
    assert_eq!(original.general.data_dir, parsed.general.data_dir);
    assert_eq!(original.feed.meta_base_url, parsed.feed.meta_base_url);
    assert_eq!(original.feed.concurrency, parsed.feed.concurrency);
}

#[test]
fn example_config_serialize_roundtrip() {
    let content = include_str!("../../../nvdex.toml.example");
    let config = NvdexConfig::parse(content).expect("should parse");
    let serialized = toml::to_string_pretty(&config).expect("should serialize");
    let reparsed = NvdexConfig::parse(&serialized).expect("should reparse");
    reparsed.validate().expect("should validate");

    assert_eq!(config.general.log_level, reparsed.general.log_level);
    assert_eq!(config.feed.concurrency, reparsed.feed.concurrency);
}
