//! 에러 타입 — 도메인별 에러 정의

/// Nvdex 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum NvdexError {
    /// 쿼리 엔진 에러
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 피드 다운로드/적재 에러
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 쿼리 엔진 에러
///
/// 문서 접근, 셀렉터 생성, 컬렉션 연산에서 발생하는 모든 실패를 포함합니다.
/// 경로 해석 자체는 실패하지 않으며 부재는 센티널 값으로 표현됩니다.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// 스키마에 선언되지 않은 속성 접근
    #[error("attribute not found: {path}")]
    AttributeNotFound {
        /// 요청된 속성 경로
        path: String,
    },

    /// 포함과 제외 플래그가 섞인 프로젝션
    #[error("invalid projection: {reason}")]
    InvalidProjection {
        /// 거부 사유
        reason: String,
    },

    /// 컴파일할 수 없는 정규식 패턴
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// 원본 패턴 문자열
        pattern: String,
        /// 정규식 컴파일 에러
        #[source]
        source: regex::Error,
    },

    /// 하한이 상한보다 작지 않은 범위
    #[error("invalid range: low {low} must be less than high {high}")]
    InvalidRange {
        /// 하한 (표시용 문자열)
        low: String,
        /// 상한 (표시용 문자열)
        high: String,
    },

    /// 컬렉션 크기를 초과하는 샘플 요청
    #[error("insufficient documents: requested {requested}, available {available}")]
    InsufficientDocuments {
        /// 요청한 샘플 크기
        requested: usize,
        /// 컬렉션의 실제 문서 수
        available: usize,
    },

    /// 소진된 커서에 대한 next 호출
    #[error("cursor exhausted at offset {offset}")]
    CursorExhausted {
        /// 소진 시점의 커서 위치
        offset: usize,
    },
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 피드 다운로드/적재 에러
///
/// `nvdex-feed` 크레이트의 상세 에러가 이 타입으로 변환되어 전파됩니다.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// 알 수 없는 피드 식별자
    #[error("invalid feed id: {0}")]
    InvalidId(String),

    /// 메타데이터 또는 아카이브 다운로드 실패
    #[error("download failed: {0}")]
    Download(String),

    /// `.meta` 파일 파싱 실패
    #[error("metadata error: {0}")]
    Metadata(String),

    /// sha256 체크섬 불일치
    #[error("checksum mismatch: {0}")]
    Checksum(String),

    /// 로컬 피드 저장소 에러
    #[error("feed store error: {0}")]
    Store(String),

    /// 피드 JSON을 문서 컬렉션으로 변환 실패
    #[error("ingest failed: {0}")]
    Ingest(String),

    /// 작업 취소됨
    #[error("cancelled: {0}")]
    Cancelled(String),
}
