//! RSI oversold / overbought screen.

use std::path::Path;

use crate::constants::RSI_PERIOD;
use crate::error::{AppError, Result};
use crate::indicators;
use crate::models::{FetchSpec, Period, PriceSeries, RsiMode, Universe};
use crate::services::{chart, run_screen, YahooClient};
use crate::utils;

#[derive(Debug, Clone, Copy)]
pub struct RsiConfig {
    pub mode: RsiMode,
}

#[derive(Debug)]
pub struct RsiRow {
    pub ticker: String,
    pub rsi: f64,
}

pub fn evaluate_series(series: &PriceSeries, mode: RsiMode) -> Result<Option<RsiRow>> {
    series.require_len(RSI_PERIOD + 1)?;
    let closes = series.closes();
    let rsi_series = indicators::rolling_rsi(&closes, RSI_PERIOD);

    // Latest defined value; an all-undefined RSI (e.g. a straight
    // rally with no losses in any window) is ineligible, not 100
    let latest_rsi = rsi_series
        .iter()
        .rev()
        .find_map(|v| *v)
        .ok_or_else(|| AppError::Other(format!("{}: RSI undefined", series.symbol())))?;

    if mode.passes(latest_rsi) {
        Ok(Some(RsiRow {
            ticker: series.symbol().to_string(),
            rsi: latest_rsi,
        }))
    } else {
        Ok(None)
    }
}

pub fn run(universe: &Universe, output_root: &Path, config: RsiConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create Tokio runtime: {}", e)))?;
    runtime.block_on(execute(universe, output_root, config))
}

async fn execute(universe: &Universe, output_root: &Path, config: RsiConfig) -> Result<()> {
    match config.mode {
        RsiMode::Low => println!("\n📊 Scanning for stocks with RSI < 30..."),
        RsiMode::High => println!("\n📊 Scanning for stocks with RSI > 70..."),
    }

    let chart_dir = utils::ensure_screen_dir(output_root, config.mode.chart_dir())?;
    let client = YahooClient::new(true, 60)?;
    let spec = FetchSpec::daily(Period::ThreeMonths, true);

    let results = run_screen(
        universe.symbols(),
        |symbol| {
            let client = &client;
            async move { client.get_history(&symbol, &spec).await }
        },
        |series: &PriceSeries| evaluate_series(series, config.mode),
        |series, row: &RsiRow| {
            let path = chart_dir.join(format!("{}_rsi_{}.png", row.ticker, config.mode));
            let title = format!("{} - Close Price (RSI {:.2})", row.ticker, row.rsi);
            chart::render_close_line(&path, &title, series.bars())?;
            Ok(Some(path))
        },
    )
    .await;

    if results.is_empty() {
        println!("❌ No stocks found matching RSI criteria.");
        return Ok(());
    }

    for row in &results {
        println!(
            "✅ {} has RSI = {:.2} ({})",
            row.ticker,
            row.rsi,
            config.mode.label()
        );
    }
    println!("📁 Charts saved in '{}'", chart_dir.display());
    Ok(())
}
