//! Opening-gap screen: stocks gapping up or down against the prior
//! session's close.

use std::path::Path;

use crate::constants::{DEFAULT_GAP_THRESHOLD, GAP_CHART_BARS};
use crate::error::{AppError, Result};
use crate::indicators;
use crate::models::{FetchSpec, GapMode, Ohlcv, Period, PriceSeries, Universe};
use crate::services::{chart, run_screen, YahooClient};
use crate::utils;

#[derive(Debug, Clone, Copy)]
pub struct GapConfig {
    pub mode: GapMode,
    pub threshold: f64,
}

impl GapConfig {
    pub fn new(mode: GapMode, threshold: Option<f64>) -> Self {
        Self {
            mode,
            threshold: threshold.unwrap_or(DEFAULT_GAP_THRESHOLD),
        }
    }
}

#[derive(Debug)]
pub struct GapRow {
    pub ticker: String,
    pub gap_pct: f64,
}

pub fn evaluate_series(series: &PriceSeries, config: &GapConfig) -> Result<Option<GapRow>> {
    series.require_len(2)?;
    let bars = series.bars();
    let prev_close = bars[bars.len() - 2].close;
    let today_open = bars[bars.len() - 1].open;
    let gap_pct = indicators::gap_percent(prev_close, today_open)
        .ok_or_else(|| AppError::Other(format!("{}: zero previous close", series.symbol())))?;

    if config.mode.passes(gap_pct, config.threshold) {
        Ok(Some(GapRow {
            ticker: series.symbol().to_string(),
            gap_pct,
        }))
    } else {
        Ok(None)
    }
}

/// Trailing chart window with zero-volume bars dropped
fn chart_bars(series: &PriceSeries) -> Vec<Ohlcv> {
    series
        .tail(GAP_CHART_BARS)
        .iter()
        .filter(|b| b.volume > 0)
        .cloned()
        .collect()
}

pub fn run(universe: &Universe, output_root: &Path, config: GapConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create Tokio runtime: {}", e)))?;
    runtime.block_on(execute(universe, output_root, config))
}

async fn execute(universe: &Universe, output_root: &Path, config: GapConfig) -> Result<()> {
    println!(
        "\n📊 Scanning for {} stocks (gap {} {:.2}%)...",
        config.mode.label(),
        match config.mode {
            GapMode::Up => ">",
            GapMode::Down => "< -",
        },
        config.threshold
    );

    let chart_dir = utils::ensure_screen_dir(output_root, config.mode.chart_dir())?;
    let client = YahooClient::new(true, 60)?;
    let spec = FetchSpec::daily(Period::OneMonth, false);

    let results = run_screen(
        universe.symbols(),
        |symbol| {
            let client = &client;
            async move { client.get_history(&symbol, &spec).await }
        },
        |series: &PriceSeries| evaluate_series(series, &config),
        |series, row: &GapRow| {
            let bars = chart_bars(series);
            if bars.len() < 2 {
                return Err(AppError::Render(format!(
                    "{}: not enough clean data",
                    row.ticker
                )));
            }
            let path = chart_dir.join(format!("{}_gap_{}.png", row.ticker, config.mode));
            let title = format!("{} ({}) - Gap: {:.2}%", row.ticker, config.mode.label(), row.gap_pct);
            chart::render_candles_with_volume(&path, &title, &bars)?;
            Ok(Some(path))
        },
    )
    .await;

    if results.is_empty() {
        println!("❌ No stocks matched the gap criteria.");
        return Ok(());
    }

    for row in &results {
        println!("✅ {}: Gap = {:.2}%", row.ticker, row.gap_pct);
    }
    println!("📁 Charts saved in '{}'", chart_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn gap_series(symbol: &str, prev_close: f64, today_open: f64) -> PriceSeries {
        let day1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let bars = vec![
            Ohlcv::new(day1, prev_close, prev_close, prev_close, prev_close, 1000),
            Ohlcv::new(day2, today_open, today_open, today_open, today_open, 1000),
        ];
        PriceSeries::new(symbol, bars).unwrap()
    }

    #[test]
    fn test_gap_up_threshold() {
        let config = GapConfig::new(GapMode::Up, Some(2.0));
        // +3% gap passes
        let s = gap_series("UP", 100.0, 103.0);
        assert!(evaluate_series(&s, &config).unwrap().is_some());
        // +2% exactly does not (strict comparison)
        let s = gap_series("EDGE", 100.0, 102.0);
        assert!(evaluate_series(&s, &config).unwrap().is_none());
    }

    #[test]
    fn test_gap_down_threshold() {
        let config = GapConfig::new(GapMode::Down, None);
        let s = gap_series("DOWN", 100.0, 97.0);
        assert!(evaluate_series(&s, &config).unwrap().is_some());
        // A gap up is no gap-down match
        let s = gap_series("UP", 100.0, 104.0);
        assert!(evaluate_series(&s, &config).unwrap().is_none());
    }

    #[test]
    fn test_zero_prev_close_is_skipped() {
        let config = GapConfig::new(GapMode::Up, None);
        let s = gap_series("ZERO", 0.0, 5.0);
        assert!(evaluate_series(&s, &config).is_err());
    }

    #[test]
    fn test_chart_bars_drop_zero_volume() {
        let day = |d: u32| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let bars = vec![
            Ohlcv::new(day(1), 10.0, 11.0, 9.0, 10.5, 1000),
            Ohlcv::new(day(2), 10.5, 11.5, 10.0, 11.0, 0),
            Ohlcv::new(day(3), 11.0, 12.0, 10.5, 11.5, 2000),
        ];
        let series = PriceSeries::new("VOL", bars).unwrap();
        let clean = chart_bars(&series);
        assert_eq!(clean.len(), 2);
        assert!(clean.iter().all(|b| b.volume > 0));
    }
}
