//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// nvdex -- NVD feed mirror and offline CVE query tool.
///
/// Use `nvdex <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "nvdex", version, about, long_about = None)]
pub struct Cli {
    /// Path to the nvdex.toml configuration file.
    #[arg(short, long, default_value = "nvdex.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download or refresh NVD feeds into the local cache.
    Fetch(FetchArgs),

    /// Query cached CVE documents.
    Query(QueryArgs),

    /// Show a single CVE document in full.
    Show(ShowArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- fetch ----

/// Mirror NVD feeds into the local cache directory.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Feeds to sync: a year (2002..), `recent`, or `modified`.
    /// With no arguments only `recent` is synced.
    pub feeds: Vec<String>,

    /// Sync the whole corpus: every year from 2002 through the current
    /// year plus `recent` and `modified`.
    #[arg(long, conflicts_with = "feeds")]
    pub all: bool,
}

// ---- query ----

/// Query cached CVE documents with attribute filters.
///
/// All given filters must match (logical AND).
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Restrict the query to specific cached feeds (default: all cached).
    #[arg(long)]
    pub feed: Vec<String>,

    /// Exact CVE identifier (e.g. CVE-2019-9999).
    #[arg(long)]
    pub id: Option<String>,

    /// Exact CVE year.
    #[arg(long)]
    pub year: Option<i64>,

    /// Inclusive lower bound on the CVE year.
    #[arg(long)]
    pub year_from: Option<i64>,

    /// Inclusive upper bound on the CVE year.
    #[arg(long)]
    pub year_to: Option<i64>,

    /// Severity rating (low, medium, high).
    #[arg(long)]
    pub severity: Option<String>,

    /// Only CVEs with a CVSS base score strictly above this value.
    #[arg(long)]
    pub score_above: Option<f64>,

    /// Regex searched anywhere in the English description.
    #[arg(long)]
    pub keyword: Option<String>,

    /// Maximum number of rows to print.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

// ---- show ----

/// Print one CVE document in full.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// CVE identifier (e.g. CVE-2016-0800).
    pub id: String,

    /// Restrict the lookup to specific cached feeds (default: all cached).
    #[arg(long)]
    pub feed: Vec<String>,
}

// ---- config ----

/// Manage nvdex configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, feed).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_fetch_no_feeds() {
        let args = Cli::try_parse_from(["nvdex", "fetch"]);
        assert!(args.is_ok(), "should parse 'fetch' subcommand");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Fetch(fetch_args) => {
                assert!(fetch_args.feeds.is_empty(), "feeds should default to empty");
                assert!(!fetch_args.all, "--all should default to off");
            }
            _ => panic!("expected Fetch command"),
        }
    }

    #[test]
    fn test_cli_parse_fetch_all_flag() {
        let args = Cli::try_parse_from(["nvdex", "fetch", "--all"]);
        assert!(args.is_ok(), "should parse 'fetch --all'");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Fetch(fetch_args) => {
                assert!(fetch_args.all);
            }
            _ => panic!("expected Fetch command"),
        }
    }

    #[test]
    fn test_cli_parse_fetch_all_conflicts_with_feeds() {
        let args = Cli::try_parse_from(["nvdex", "fetch", "--all", "2019"]);
        assert!(args.is_err(), "--all with an explicit feed list should fail");
    }

    #[test]
    fn test_cli_parse_fetch_explicit_feeds() {
        let args = Cli::try_parse_from(["nvdex", "fetch", "2019", "recent"]);
        assert!(args.is_ok(), "should parse fetch with feed list");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Fetch(fetch_args) => {
                assert_eq!(fetch_args.feeds, vec!["2019", "recent"]);
            }
            _ => panic!("expected Fetch command"),
        }
    }

    #[test]
    fn test_cli_parse_query_defaults() {
        let args = Cli::try_parse_from(["nvdex", "query"]);
        assert!(args.is_ok(), "should parse bare 'query' subcommand");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Query(query_args) => {
                assert!(query_args.feed.is_empty());
                assert!(query_args.id.is_none());
                assert!(query_args.keyword.is_none());
                assert_eq!(query_args.limit, 20, "limit should default to 20");
            }
            _ => panic!("expected Query command"),
        }
    }

    #[test]
    fn test_cli_parse_query_filters() {
        let args = Cli::try_parse_from([
            "nvdex",
            "query",
            "--year-from",
            "2001",
            "--year-to",
            "2003",
            "--severity",
            "high",
            "--score-above",
            "7.5",
            "--limit",
            "5",
        ]);
        assert!(args.is_ok(), "should parse query with filters");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Query(query_args) => {
                assert_eq!(query_args.year_from, Some(2001));
                assert_eq!(query_args.year_to, Some(2003));
                assert_eq!(query_args.severity, Some("high".to_owned()));
                assert_eq!(query_args.score_above, Some(7.5));
                assert_eq!(query_args.limit, 5);
            }
            _ => panic!("expected Query command"),
        }
    }

    #[test]
    fn test_cli_parse_query_repeated_feed_flag() {
        let args = Cli::try_parse_from(["nvdex", "query", "--feed", "2019", "--feed", "modified"]);
        assert!(args.is_ok(), "should parse repeated --feed flags");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Query(query_args) => {
                assert_eq!(query_args.feed, vec!["2019", "modified"]);
            }
            _ => panic!("expected Query command"),
        }
    }

    #[test]
    fn test_cli_parse_show() {
        let args = Cli::try_parse_from(["nvdex", "show", "CVE-2016-0800"]);
        assert!(args.is_ok(), "should parse 'show' with an id");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Show(show_args) => {
                assert_eq!(show_args.id, "CVE-2016-0800");
                assert!(show_args.feed.is_empty(), "feed filter should default to empty");
            }
            _ => panic!("expected Show command"),
        }
    }

    #[test]
    fn test_cli_parse_show_with_feed_filter() {
        let args = Cli::try_parse_from(["nvdex", "show", "CVE-2016-0800", "--feed", "2016"]);
        assert!(args.is_ok(), "should parse 'show' with a feed filter");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Show(show_args) => {
                assert_eq!(show_args.feed, vec!["2016"]);
            }
            _ => panic!("expected Show command"),
        }
    }

    #[test]
    fn test_cli_parse_show_requires_id() {
        let args = Cli::try_parse_from(["nvdex", "show"]);
        assert!(args.is_err(), "show without an id should fail");
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let args = Cli::try_parse_from(["nvdex", "config", "validate"]);
        assert!(args.is_ok(), "should parse 'config validate' subcommand");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Validate => {}
                _ => panic!("expected Validate action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let args = Cli::try_parse_from(["nvdex", "config", "show", "--section", "feed"]);
        assert!(args.is_ok(), "should parse config show with section");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section, Some("feed".to_owned()));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_custom_config_path() {
        let args = Cli::try_parse_from(["nvdex", "-c", "/custom/config.toml", "query"]);
        assert!(args.is_ok(), "should parse with custom config path");
        let cli = args.expect("parse succeeded");
        assert_eq!(cli.config, std::path::PathBuf::from("/custom/config.toml"));
    }

    #[test]
    fn test_cli_parse_log_level() {
        let args = Cli::try_parse_from(["nvdex", "--log-level", "debug", "query"]);
        assert!(args.is_ok(), "should parse with custom log level");
        let cli = args.expect("parse succeeded");
        assert_eq!(cli.log_level, Some("debug".to_owned()));
    }

    #[test]
    fn test_cli_parse_output_format_json() {
        let args = Cli::try_parse_from(["nvdex", "--output", "json", "query"]);
        assert!(args.is_ok(), "should parse with json output format");
        let cli = args.expect("parse succeeded");
        match cli.output {
            OutputFormat::Json => {}
            _ => panic!("expected Json output format"),
        }
    }

    #[test]
    fn test_cli_parse_invalid_command_fails() {
        let args = Cli::try_parse_from(["nvdex", "invalid-command"]);
        assert!(args.is_err(), "should fail on invalid command");
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        let args = Cli::try_parse_from(["nvdex"]);
        assert!(args.is_err(), "should fail when no command provided");
    }

    #[test]
    fn test_cli_verify_command_structure() {
        // Verify CLI command compiles and has expected structure
        let cmd = Cli::command();
        cmd.clone().debug_assert();
        assert_eq!(cmd.get_name(), "nvdex");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for expected in ["fetch", "query", "show", "config"] {
            assert!(
                subcommands.contains(&expected),
                "should have '{expected}' subcommand"
            );
        }
    }
}
