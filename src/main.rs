//! Itemize main entry point
//!
//! This is the command-line interface for the Itemize link crawler. Items go
//! to stdout, one per line; logs go to stderr.

use anyhow::Context;
use clap::Parser;
use itemize::config::{load_config, validate, Config};
use itemize::itemize_with_config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Itemize: list the pages reachable under a root URL
///
/// Crawls breadth-first from the root, never climbing above its directory,
/// and prints every discovered URL in discovery order.
#[derive(Parser, Debug)]
#[command(name = "itemize")]
#[command(version)]
#[command(about = "A bounded, depth-limited link crawler", long_about = None)]
struct Cli {
    /// Root URL to crawl from
    #[arg(value_name = "URL")]
    url: String,

    /// Depth limit: max link hops from the root, and max path segments below
    /// the root's directory
    #[arg(short, long)]
    depth: Option<u32>,

    /// Treat URLs differing only by query string as distinct
    #[arg(long)]
    query: bool,

    /// Treat URLs differing only by fragment as distinct
    #[arg(long)]
    hash: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Stop after this many items
    #[arg(long)]
    limit: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    let mut items = itemize_with_config(&cli.url, &config)
        .with_context(|| format!("Failed to start crawl of {}", cli.url))?;

    tracing::info!(
        "Crawling {} (depth: {:?}, query: {}, hash: {})",
        items.root(),
        config.options.depth,
        config.options.query,
        config.options.hash
    );

    let mut printed = 0;
    while let Some(item) = items.next().await {
        println!("{}", item);
        printed += 1;

        if cli.limit.is_some_and(|limit| printed >= limit) {
            tracing::info!("Reached limit of {} items", printed);
            break;
        }
    }

    let stats = items.stats();
    items.close();

    tracing::info!(
        "Done: {} items, {} discovered, {} fetches, {} dead ends, {} rejected links",
        stats.emitted,
        stats.discovered,
        stats.fetched,
        stats.dead_ends,
        stats.rejected
    );

    Ok(())
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if cli.depth.is_some() {
        config.options.depth = cli.depth;
    }
    config.options.query |= cli.query;
    config.options.hash |= cli.hash;

    validate(&config)?;

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("itemize=warn"),
            1 => EnvFilter::new("itemize=info,warn"),
            2 => EnvFilter::new("itemize=debug,info"),
            _ => EnvFilter::new("itemize=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
