use anyhow::Result;
use brain_core::config::DATA_DIR_ENV;
use brain_core::{BrainConfig, BrainIndex, Category, FallbackLimits};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "brain-indexer")]
#[command(about = "Build and query the in-memory brain keyword index", long_about = None)]
struct Cli {
    /// Corpus root holding the apis/, docs/ and concepts/ directories
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the corpus and print the rebuild report
    Rebuild,
    /// Print per-category index statistics
    Stats,
    /// Ranked keyword search over the index
    Search {
        query: String,
        #[arg(long)]
        category: Option<Category>,
        /// Run a full scan when the index finds nothing
        #[arg(long, default_value_t = false)]
        fallback: bool,
    },
    /// Look up a single keyword's posting list
    Keyword {
        keyword: String,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Linear substring scan over the corpus files
    Scan {
        query: String,
        /// Maximum matches per category
        #[arg(long, default_value_t = brain_core::config::DEFAULT_FALLBACK_LIMIT)]
        limit: usize,
    },
    /// Report whether each category directory was modified recently
    Freshness {
        #[arg(long, default_value_t = 3_600_000)]
        max_age_ms: u64,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = match cli.data_dir {
        Some(dir) => BrainConfig::new(dir),
        None => BrainConfig::from_env(),
    };
    let brain = BrainIndex::new(config);

    match cli.command {
        Commands::Rebuild => print_json(&brain.rebuild()),
        Commands::Stats => {
            brain.rebuild();
            print_json(&brain.stats())
        }
        Commands::Search { query, category, fallback } => {
            let indexed = brain.search_indexed(&query, category)?;
            if fallback && indexed.results.is_empty() {
                let full = brain.search_full(&query, FallbackLimits::default())?;
                tracing::info!(%query, fallback_hits = full.total(), "no indexed hits, fell back to full scan");
                return print_json(&serde_json::json!({ "indexed": indexed, "fallback": full }));
            }
            print_json(&indexed)
        }
        Commands::Keyword { keyword, category } => print_json(&brain.search_single_keyword(&keyword, category)),
        Commands::Scan { query, limit } => print_json(&brain.search_full(&query, FallbackLimits::uniform(limit))?),
        Commands::Freshness { max_age_ms } => print_json(&brain.check_freshness(Duration::from_millis(max_age_ms))),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
