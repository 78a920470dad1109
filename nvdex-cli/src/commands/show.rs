//! `nvdex show` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use nvdex_core::Query;
use nvdex_feed::{load_cached, FeedStore};

use crate::cli::ShowArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `show` command.
///
/// Looks a single CVE identifier up across all cached feeds and prints
/// the full document, omitting fields the feed never populated.
pub async fn execute(
    args: ShowArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config(config_path).await?;
    let store = FeedStore::new(config.general.data_dir.as_str());

    let feeds = if args.feed.is_empty() {
        store
            .cached_feeds()
            .await
            .map_err(|e| CliError::Command(format!("failed to list cached feeds: {e}")))?
    } else {
        super::parse_feeds(&args.feed)?
    };
    if feeds.is_empty() {
        return Err(CliError::Command(
            "no cached feeds found; run `nvdex fetch` first".to_owned(),
        ));
    }

    info!(feeds = feeds.len(), id = %args.id, "looking up document");
    let collection = load_cached(&store, &feeds)
        .await
        .map_err(|e| CliError::Command(format!("failed to load cached feeds: {e}")))?;

    let query = Query::new().with("id_", args.id.as_str());
    let results = collection.find(&query);

    let Some(document) = results.get(0) else {
        return Err(CliError::Command(format!(
            "{} not found in cached feeds",
            args.id
        )));
    };

    let report = ShowReport {
        document: document.to_json(),
        pretty: document.pretty(),
    };
    writer.render(&report)?;

    Ok(())
}

/// Single-document view for the `show` command.
///
/// JSON output is the document itself; text output is the
/// declaration-ordered pretty rendering.
#[derive(Serialize)]
pub struct ShowReport {
    #[serde(flatten)]
    pub document: serde_json::Value,
    #[serde(skip)]
    pub pretty: String,
}

impl Render for ShowReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", self.pretty)
    }
}
