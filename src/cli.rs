//! Command-line interface definitions for the aggregator.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. Everything is optional: with no flags the built-in source list
//! is used, the database lands in `./news.db`, and passes run hourly
//! until interrupted.

use clap::Parser;

/// Command-line arguments for the aggregator.
///
/// # Examples
///
/// ```sh
/// # Hourly aggregation with the built-in sources
/// newshound
///
/// # One pass against a custom source list, then exit
/// newshound --config sources.yaml --once
///
/// # Enable the news API sources
/// NEWS_API_KEY=YOUR_KEY newshound
///
/// # Inspect and maintain the store without running a pass
/// newshound --list --category Technology
/// newshound --relabel "Some headline" Politics
/// newshound --delete "Some headline"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the configured SQLite database path
    #[arg(short, long)]
    pub database: Option<String>,

    /// Run a single aggregation pass and exit
    #[arg(long)]
    pub once: bool,

    /// News API key; API sources are skipped without it
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: Option<String>,

    /// Print stored articles and exit without running a pass
    #[arg(long)]
    pub list: bool,

    /// With --list, print only articles in this category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Relabel one stored article and exit
    #[arg(long, num_args = 2, value_names = ["TITLE", "CATEGORY"])]
    pub relabel: Option<Vec<String>>,

    /// Delete one stored article by exact title and exit
    #[arg(long, value_name = "TITLE")]
    pub delete: Option<String>,
}
