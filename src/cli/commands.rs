use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::models::timeframe::Timeframe;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Path to a TOML config file supplying defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Market data commands
    #[command(subcommand)]
    Data(DataCommands),
}

#[derive(Subcommand)]
pub enum DataCommands {
    /// Download bars from a provider and persist them
    Download {
        /// Provider name: local_parquet or polygon
        #[arg(long)]
        provider: Option<String>,

        /// Comma-separated list of symbols (e.g. "AAPL,MSFT")
        #[arg(long)]
        symbols: Option<String>,

        /// Bar timeframe: 1m, 1h or 1d
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// First day to download, inclusive (e.g. "2024-01-01")
        #[arg(long)]
        start: NaiveDate,

        /// Last day to download, inclusive
        #[arg(long)]
        end: NaiveDate,

        /// Base directory of the bar store
        #[arg(long)]
        data_path: Option<PathBuf>,

        /// API key for the remote provider; falls back to POLYGON_API_KEY
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Print the most recent stored bar for a symbol
    ShowLatest {
        /// Symbol to inspect
        #[arg(long)]
        symbol: String,

        /// Bar timeframe: 1m, 1h or 1d
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Base directory of the bar store
        #[arg(long)]
        data_path: Option<PathBuf>,
    },
}
