//! nvdex CLI entrypoint
//!
//! Parses arguments, initializes tracing and dispatches to the command
//! handlers. Diagnostics go to stderr so that text and JSON command
//! output on stdout stays pipeable.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nvdex_core::config::NvdexConfig;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let Cli {
        config,
        log_level,
        output,
        command,
    } = Cli::parse();

    // The config file also drives logging, so peek at it before dispatch.
    // A broken file falls back to defaults here; the command handlers
    // load strictly and report the real error.
    let early = NvdexConfig::load_or_default(&config)
        .await
        .unwrap_or_default();
    init_tracing(
        log_level.as_deref().unwrap_or(&early.general.log_level),
        early.general.log_format == "json",
    );

    tracing::info!(config = %config.display(), "nvdex starting");

    let writer = OutputWriter::new(output);

    let result = match command {
        Commands::Fetch(args) => commands::fetch::execute(args, &config, &writer).await,
        Commands::Query(args) => commands::query::execute(args, &config, &writer).await,
        Commands::Show(args) => commands::show::execute(args, &config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &config, &writer).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}
