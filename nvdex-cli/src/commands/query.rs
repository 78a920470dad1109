//! `nvdex query` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use nvdex_core::schema::Document;
use nvdex_core::{selector, Query};
use nvdex_feed::{load_cached, FeedStore};

use crate::cli::QueryArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// How much of the first description makes it into a table row.
const SUMMARY_WIDTH: usize = 60;

/// Execute the `query` command.
///
/// Loads the cached feeds, applies every given filter conjunctively
/// and prints the first `--limit` matches. With no filters the first
/// `--limit` cached documents are listed.
pub async fn execute(
    args: QueryArgs,
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

    info!(feeds = feeds.len(), "loading cached feeds");
    let collection = load_cached(&store, &feeds)
        .await
        .map_err(|e| CliError::Command(format!("failed to load cached feeds: {e}")))?;

    let query = build_query(&args)?;
    let results = collection.find(&query);

    let mut cursor = results.cursor();
    let rows: Vec<CveRow> = cursor
        .next_batch(args.limit)
        .into_iter()
        .map(document_row)
        .collect();

    let report = QueryReport {
        total_matches: results.len(),
        shown: rows.len(),
        rows,
    };
    writer.render(&report)?;

    Ok(())
}

/// Translate CLI filters into a conjunctive attribute query.
fn build_query(args: &QueryArgs) -> Result<Query, CliError> {
    let mut query = Query::new();

    if let Some(id) = &args.id {
        query = query.with("id_", id.as_str());
    }
    if let Some(year) = args.year {
        query = query.with("cve.year", year);
    }
    match (args.year_from, args.year_to) {
        (Some(from), Some(to)) => {
            let range = selector::in_range(from, to)
                .map_err(|e| CliError::Command(format!("invalid year range: {e}")))?;
            query = query.with("cve.year", range);
        }
        (Some(from), None) => query = query.with("cve.year", selector::ge(from)),
        (None, Some(to)) => query = query.with("cve.year", selector::le(to)),
        (None, None) => {}
    }
    if let Some(severity) = &args.severity {
        query = query.with("impact.severity", parse_severity(severity)?);
    }
    if let Some(score) = args.score_above {
        query = query.with("impact.cvss.base_score", selector::gt(score));
    }
    if let Some(keyword) = &args.keyword {
        let pattern = selector::search(keyword)
            .map_err(|e| CliError::Command(format!("invalid keyword pattern: {e}")))?;
        query = query.with("cve.descriptions.data.value", pattern);
    }

    Ok(query)
}

fn parse_severity(s: &str) -> Result<String, CliError> {
    match s.to_lowercase().as_str() {
        "low" => Ok("LOW".to_owned()),
        "medium" => Ok("MEDIUM".to_owned()),
        "high" => Ok("HIGH".to_owned()),
        _ => Err(CliError::Command(format!(
            "invalid severity: {} (expected: low, medium, high)",
            s
        ))),
    }
}

fn document_row(doc: &Document) -> CveRow {
    let impact = doc.impact.as_ref();
    CveRow {
        id: doc.id_.clone().unwrap_or_else(|| "(no id)".to_owned()),
        year: doc.cve.as_ref().and_then(|cve| cve.year),
        severity: impact.and_then(|i| i.severity.clone()),
        score: impact
            .and_then(|i| i.cvss.as_ref())
            .and_then(|cvss| cvss.base_score),
        published: doc.published_date.map(|d| d.format("%Y-%m-%d").to_string()),
        summary: doc
            .cve
            .as_ref()
            .and_then(|cve| cve.descriptions.as_ref())
            .and_then(|descriptions| descriptions.data.first())
            .and_then(|description| description.value.as_deref())
            .map(|value| truncate(value, SUMMARY_WIDTH)),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        let mut out: String = s.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

/// Query result page for the `query` command.
#[derive(Serialize)]
pub struct QueryReport {
    /// Total documents matching the query.
    pub total_matches: usize,
    /// Rows actually printed (bounded by `--limit`).
    pub shown: usize,
    pub rows: Vec<CveRow>,
}

#[derive(Serialize)]
pub struct CveRow {
    pub id: String,
    pub year: Option<i64>,
    pub severity: Option<String>,
    pub score: Option<f64>,
    pub published: Option<String>,
    pub summary: Option<String>,
}

impl Render for QueryReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Matched {} document(s), showing {}",
            self.total_matches, self.shown
        )?;
        writeln!(w)?;

        if self.rows.is_empty() {
            writeln!(w, "{}", "No documents matched the query.".yellow())?;
            return Ok(());
        }

        writeln!(
            w,
            "{:<16} {:<6} {:<10} {:<6} {:<12} Summary",
            "CVE", "Year", "Severity", "Score", "Published"
        )?;
        writeln!(w, "{}", "-".repeat(110))?;

        for row in &self.rows {
            let severity = row.severity.as_deref().unwrap_or("-");
            let severity_colored = match severity {
                "HIGH" => severity.red(),
                "MEDIUM" => severity.yellow(),
                "LOW" => severity.normal(),
                _ => severity.dimmed(),
            };
            let score = row
                .score
                .map(|s| format!("{s:.1}"))
                .unwrap_or_else(|| "-".to_owned());

            writeln!(
                w,
                "{:<16} {:<6} {:<10} {:<6} {:<12} {}",
                row.id,
                row.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_owned()),
                severity_colored,
                score,
                row.published.as_deref().unwrap_or("-"),
                row.summary.as_deref().unwrap_or("")
            )?;
        }

        Ok(())
    }
}
