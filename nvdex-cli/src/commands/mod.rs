//! Command handlers -- one module per subcommand

use std::path::Path;

use tracing::debug;

use nvdex_core::NvdexConfig;
use nvdex_feed::{FeedFetchError, FeedId};

use crate::error::CliError;

pub mod config;
pub mod fetch;
pub mod query;
pub mod show;

/// Load the effective configuration for a command.
///
/// A missing configuration file is not an error here: the tool runs
/// with defaults plus environment overrides. `config validate` uses
/// the strict loader instead.
pub(crate) async fn load_config(path: &Path) -> Result<NvdexConfig, CliError> {
    let config = NvdexConfig::load_or_default(path).await?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Parse user-supplied feed names, reporting every bad name at once.
pub(crate) fn parse_feeds(names: &[String]) -> Result<Vec<FeedId>, CliError> {
    let mut feeds = Vec::with_capacity(names.len());
    let mut bad = Vec::new();
    for name in names {
        match name.parse::<FeedId>() {
            Ok(feed) => feeds.push(feed),
            Err(FeedFetchError::InvalidFeedId { input }) => bad.push(input),
            Err(e) => return Err(CliError::Command(e.to_string())),
        }
    }
    if !bad.is_empty() {
        return Err(CliError::Command(format!(
            "invalid feed name(s): {} (expected a year 2002.., 'recent', or 'modified')",
            bad.join(", ")
        )));
    }
    Ok(feeds)
}
