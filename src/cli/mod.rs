//! Command-line surface over the store/provider library calls.

pub mod commands;

use std::env;

pub use commands::{Cli, Commands, DataCommands};

use crate::config::{self, AppConfig};
use crate::errors::Error;
use crate::providers::polygon::API_KEY_ENV;
use crate::providers::registry::resolve;
use crate::store;

/// Execute a parsed invocation. Command-line flags win over config values;
/// config values win over built-in defaults.
pub fn run(cli: Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Data(DataCommands::Download {
            provider,
            symbols,
            timeframe,
            start,
            end,
            data_path,
            api_key,
        }) => {
            let provider_name = provider.unwrap_or_else(|| config.data.provider.clone());
            let timeframe = timeframe.unwrap_or(config.universe.timeframe);
            let data_path = data_path.unwrap_or_else(|| config.data.path.clone());
            let symbols = match symbols {
                Some(raw) => split_symbols(&raw),
                None => config.universe.symbols.clone(),
            };
            let api_key = api_key.or_else(|| env::var(API_KEY_ENV).ok());

            let provider = resolve(&provider_name, api_key.as_deref())?;
            for symbol in &symbols {
                log::info!("downloading {symbol} {timeframe} via {provider_name}");
                let result = provider.download(&data_path, symbol, timeframe, start, end)?;
                println!(
                    "{} {} input_rows={} total_rows={}",
                    result.symbol, result.timeframe, result.input_rows, result.total_rows
                );
            }
            Ok(())
        }

        Commands::Data(DataCommands::ShowLatest {
            symbol,
            timeframe,
            data_path,
        }) => {
            let timeframe = timeframe.unwrap_or(config.universe.timeframe);
            let data_path = data_path.unwrap_or_else(|| config.data.path.clone());

            let bars = store::read_bars(&data_path, &symbol, timeframe)?;
            match bars.last() {
                Some(bar) => println!(
                    "{} {} {} open={} high={} low={} close={} volume={}",
                    symbol.to_uppercase(),
                    timeframe,
                    bar.timestamp.to_rfc3339(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ),
                None => println!("no bars stored for {} {}", symbol.to_uppercase(), timeframe),
            }
            Ok(())
        }
    }
}

fn split_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|symbol| symbol.trim().to_string())
        .filter(|symbol| !symbol.is_empty())
        .collect()
}
