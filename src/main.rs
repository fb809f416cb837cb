//! Batch range forecaster
//!
//! For each symbol: fetch daily history, train the range models, predict
//! the high/low band, screen the symbol's option chain if one is on
//! disk, and write CSV artifacts. One symbol failing never aborts the
//! rest of the batch.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use rangecast::api::StooqClient;
use rangecast::data::{CsvStore, ForecastRow};
use rangecast::models::ForestConfig;
use rangecast::pipeline::{analyze_symbol, PipelineConfig};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Forecast price ranges and screen option chains")]
struct Args {
    /// Symbols to process (comma separated)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "NVDA,MSFT,AAPL,AMZN,TSLA,META,GOOG,ORCL"
    )]
    symbols: Vec<String>,

    /// Forecast horizon in days
    #[arg(long, default_value = "30")]
    horizon: usize,

    /// Number of trees per range model
    #[arg(long, default_value = "100")]
    trees: usize,

    /// Max tree depth
    #[arg(long, default_value = "10")]
    max_depth: usize,

    /// Directory holding per-symbol option chain CSVs ({SYMBOL}_options.csv)
    #[arg(long, default_value = ".")]
    options_dir: PathBuf,

    /// Output path for the forecast summary CSV
    #[arg(long, default_value = "forecasts.csv")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rangecast=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = PipelineConfig {
        horizon_days: args.horizon,
        forest: ForestConfig {
            n_trees: args.trees,
            max_depth: args.max_depth,
            ..Default::default()
        },
        ..Default::default()
    };

    let client = StooqClient::new();
    let as_of = Utc::now();
    let mut rows = Vec::new();

    for symbol in &args.symbols {
        let symbol = symbol.as_str();
        info!(symbol, "processing");

        let series = match client.daily_history(symbol).await {
            Ok(series) => series,
            Err(err) => {
                warn!(symbol, %err, "skipping symbol: history unavailable");
                continue;
            }
        };

        let chain_path = args.options_dir.join(format!("{symbol}_options.csv"));
        let chain = if chain_path.exists() {
            match CsvStore::load_option_chain(&chain_path) {
                Ok(chain) => Some(chain),
                Err(err) => {
                    warn!(symbol, %err, "ignoring unreadable option chain");
                    None
                }
            }
        } else {
            None
        };

        let report = match analyze_symbol(
            symbol,
            &series,
            chain.as_deref().unwrap_or(&[]),
            &config,
            as_of,
        ) {
            Ok(report) => report,
            Err(err) => {
                warn!(symbol, %err, "skipping symbol");
                continue;
            }
        };

        if !report.selections.is_empty() {
            let path = format!("selected_options_{symbol}.csv");
            CsvStore::write_selected_options(&path, &report.selections)
                .with_context(|| format!("failed to write {path}"))?;
            info!(symbol, count = report.selections.len(), %path, "wrote selected options");
        }

        let forecast = &report.forecast;
        println!(
            "{:<6} close {:>10.2}  high {:>10.2} ({:+.2}%)  low {:>10.2} ({:+.2}%)  options {}",
            forecast.symbol,
            forecast.current_price,
            forecast.predicted_high,
            forecast.high_change_pct(),
            forecast.predicted_low,
            forecast.low_change_pct(),
            report.selections.len()
        );

        rows.push(ForecastRow {
            symbol: forecast.symbol.clone(),
            current_price: forecast.current_price,
            predicted_high: forecast.predicted_high,
            predicted_low: forecast.predicted_low,
            high_change_pct: forecast.high_change_pct(),
            low_change_pct: forecast.low_change_pct(),
            options_analyzed: chain.is_some(),
            potential_options: report.selections.len(),
        });
    }

    CsvStore::write_forecasts(&args.output, &rows)
        .with_context(|| format!("failed to write {:?}", args.output))?;
    info!(symbols = rows.len(), output = ?args.output, "run complete");

    Ok(())
}
