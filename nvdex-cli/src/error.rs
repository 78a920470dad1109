//! CLI-specific error types and exit code mapping

use nvdex_core::error::NvdexError;
use nvdex_feed::FeedFetchError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// One or more feeds failed to sync.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Query engine error from nvdex-core.
    #[error("query error: {0}")]
    Query(String),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                        |
    /// |------|--------------------------------|
    /// | 0    | Success                        |
    /// | 1    | General / command error        |
    /// | 2    | Configuration error            |
    /// | 4    | Feed sync failed (partial ok)  |
    /// | 10   | IO error                       |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Fetch(_) => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Query(_) => 1,
        }
    }
}

impl From<FeedFetchError> for CliError {
    fn from(e: FeedFetchError) -> Self {
        Self::Fetch(e.to_string())
    }
}

/// Route domain errors to the variants that carry their exit codes.
impl From<NvdexError> for CliError {
    fn from(e: NvdexError) -> Self {
        match e {
            NvdexError::Config(e) => Self::Config(e.to_string()),
            NvdexError::Feed(e) => Self::Fetch(e.to_string()),
            NvdexError::Io(e) => Self::Io(e),
            NvdexError::Query(e) => Self::Query(e.to_string()),
        }
    }
}
