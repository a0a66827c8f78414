//! MACD signal-line crossover screen.

use std::path::Path;

use chrono::NaiveDate;

use crate::constants::{MACD_CHART_BARS, MACD_MIN_BARS};
use crate::error::{AppError, Result};
use crate::indicators;
use crate::models::{CrossoverMode, FetchSpec, Period, PriceSeries, Universe};
use crate::services::{chart, run_screen, YahooClient};
use crate::utils;

#[derive(Debug, Clone, Copy)]
pub struct MacdConfig {
    pub mode: CrossoverMode,
}

#[derive(Debug)]
pub struct MacdRow {
    pub ticker: String,
    pub macd: f64,
    pub signal: f64,
}

pub fn evaluate_series(series: &PriceSeries, mode: CrossoverMode) -> Result<Option<MacdRow>> {
    series.require_len(MACD_MIN_BARS)?;
    let closes = series.closes();
    let (macd_line, signal_line) = indicators::macd(&closes);

    let crossed = match mode {
        CrossoverMode::Bullish => indicators::bullish_crossover(&macd_line, &signal_line),
        CrossoverMode::Bearish => indicators::bearish_crossover(&macd_line, &signal_line),
    };

    if crossed {
        Ok(Some(MacdRow {
            ticker: series.symbol().to_string(),
            macd: macd_line[macd_line.len() - 1],
            signal: signal_line[signal_line.len() - 1],
        }))
    } else {
        Ok(None)
    }
}

pub fn run(universe: &Universe, output_root: &Path, config: MacdConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create Tokio runtime: {}", e)))?;
    runtime.block_on(execute(universe, output_root, config))
}

async fn execute(universe: &Universe, output_root: &Path, config: MacdConfig) -> Result<()> {
    println!(
        "\n📊 Scanning for {} MACD crossovers...",
        config.mode.label()
    );

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
        |series, row: &MacdRow| {
            let closes = series.closes();
            let (macd_line, signal_line) = indicators::macd(&closes);
            let dates: Vec<NaiveDate> = series.bars().iter().map(|b| b.time.date_naive()).collect();

            let start = dates.len().saturating_sub(MACD_CHART_BARS);
            let path = chart_dir.join(format!("{}_macd_{}.png", row.ticker, config.mode));
            let title = format!("{} - MACD {} Crossover", row.ticker, config.mode.label());
            chart::render_macd_lines(
                &path,
                &title,
                &dates[start..],
                &macd_line[start..],
                &signal_line[start..],
            )?;
            Ok(Some(path))
        },
    )
    .await;

    if results.is_empty() {
        println!("❌ No stocks matched the MACD crossover criteria.");
        return Ok(());
    }

    for row in &results {
        println!(
            "✅ {}: {} crossover (MACD {:.3}, Signal {:.3})",
            row.ticker,
            config.mode.label(),
            row.macd,
            row.signal
        );
    }
    println!("📁 Charts saved in '{}'", chart_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ohlcv;
    use chrono::{TimeZone, Utc};

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::days(i as i64);
                Ohlcv::new(time, close, close, close, close, 1000)
            })
            .collect();
        PriceSeries::new(symbol, bars).unwrap()
    }

    /// Downtrend then recovery, truncated right where MACD first pokes
    /// above its signal line
    fn closes_ending_on_bullish_cross() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        closes.extend((0..20).map(|i| 161.0 + 3.0 * i as f64));
        let (macd_line, signal_line) = indicators::macd(&closes);
        let t = (1..closes.len())
            .find(|&i| {
                macd_line[i - 1] < signal_line[i - 1] && macd_line[i] > signal_line[i]
            })
            .expect("constructed series must cross");
        closes.truncate(t + 1);
        closes
    }

    #[test]
    fn test_bullish_crossover_detected_at_latest_bar() {
        let closes = closes_ending_on_bullish_cross();
        let s = series("CROSS", &closes);
        assert!(evaluate_series(&s, CrossoverMode::Bullish).unwrap().is_some());
        assert!(evaluate_series(&s, CrossoverMode::Bearish).unwrap().is_none());
    }

    #[test]
    fn test_no_crossover_one_bar_later() {
        let mut closes = closes_ending_on_bullish_cross();
        // One more rising bar: MACD is already above the signal line
        closes.push(closes[closes.len() - 1] + 3.0);
        let s = series("LATE", &closes);
        assert!(evaluate_series(&s, CrossoverMode::Bullish).unwrap().is_none());
    }

    #[test]
    fn test_insufficient_history_is_skipped() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let s = series("SHORT", &closes);
        assert!(evaluate_series(&s, CrossoverMode::Bullish).is_err());
    }
}
