//! `nvdex fetch` command handler

use std::io::Write;
use std::path::Path;

use chrono::Datelike;
use serde::Serialize;
use tracing::{info, warn};

use nvdex_feed::{FeedClient, FeedId, FeedOutcome, FetchStatus};

use crate::cli::FetchArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `fetch` command.
///
/// Syncs the requested feeds into the local cache: `recent` by default,
/// the whole corpus with `--all`. `Ctrl-C` cancels in-flight downloads;
/// feeds already written stay cached.
pub async fn execute(
    args: FetchArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config(config_path).await?;

    let feeds = if args.all {
        FeedId::full_set(current_year())
    } else if args.feeds.is_empty() {
        vec![FeedId::Recent]
    } else {
        super::parse_feeds(&args.feeds)?
    };

    let client = FeedClient::new(&config)?;
    info!(
        feeds = feeds.len(),
        data_dir = config.general.data_dir.as_str(),
        "starting feed sync"
    );

    let cancel = client.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling feed sync");
            cancel.cancel();
        }
    });

    let outcomes = client.fetch_all(&feeds).await?;
    let report = build_fetch_report(config.general.data_dir.clone(), &outcomes);

    writer.render(&report)?;

    if report.failed > 0 {
        return Err(CliError::Fetch(format!(
            "{} of {} feeds failed",
            report.failed,
            report.feeds.len()
        )));
    }

    Ok(())
}

fn current_year() -> u16 {
    chrono::Utc::now().year() as u16
}

fn build_fetch_report(data_dir: String, outcomes: &[FeedOutcome]) -> FetchReport {
    let mut feeds = Vec::with_capacity(outcomes.len());
    let mut downloaded = 0;
    let mut up_to_date = 0;
    let mut failed = 0;

    for outcome in outcomes {
        let (status, detail) = match &outcome.result {
            Ok(FetchStatus::Downloaded) => {
                downloaded += 1;
                ("downloaded", None)
            }
            Ok(FetchStatus::UpToDate) => {
                up_to_date += 1;
                ("up_to_date", None)
            }
            Err(e) => {
                failed += 1;
                ("failed", Some(e.to_string()))
            }
        };
        feeds.push(FeedRow {
            feed: outcome.feed.to_string(),
            status: status.to_owned(),
            detail,
        });
    }

    FetchReport {
        data_dir,
        feeds,
        downloaded,
        up_to_date,
        failed,
    }
}

/// Feed sync summary for the `fetch` command.
#[derive(Serialize)]
pub struct FetchReport {
    /// Local cache directory the feeds were written to.
    pub data_dir: String,
    /// Per-feed result rows, in request order.
    pub feeds: Vec<FeedRow>,
    pub downloaded: usize,
    pub up_to_date: usize,
    pub failed: usize,
}

#[derive(Serialize)]
pub struct FeedRow {
    pub feed: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Render for FetchReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Feed sync: {}", self.data_dir.bold())?;
        writeln!(w)?;
        writeln!(w, "{:<10} {:<12} Detail", "Feed", "Status")?;
        writeln!(w, "{}", "-".repeat(60))?;

        for row in &self.feeds {
            let status_colored = match row.status.as_str() {
                "downloaded" => row.status.green(),
                "up_to_date" => row.status.normal(),
                _ => row.status.red().bold(),
            };
            writeln!(
                w,
                "{:<10} {:<12} {}",
                row.feed,
                status_colored,
                row.detail.as_deref().unwrap_or("")
            )?;
        }

        writeln!(w)?;
        let summary = format!(
            "{} downloaded, {} up to date, {} failed",
            self.downloaded, self.up_to_date, self.failed
        );
        if self.failed > 0 {
            writeln!(w, "{}", summary.red().bold())?;
        } else {
            writeln!(w, "{}", summary.green())?;
        }

        Ok(())
    }
}
