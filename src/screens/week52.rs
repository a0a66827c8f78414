//! Stocks trading at their 52-week high or low.

use std::path::Path;

use crate::constants::{screen_dir, EXTREME_TOLERANCE};
use crate::error::{AppError, Result};
use crate::indicators::{self, ExtremeKind};
use crate::models::{FetchSpec, Period, PriceSeries, Universe};
use crate::services::{chart, run_screen, YahooClient};
use crate::utils;

#[derive(Debug)]
pub struct Week52Row {
    pub ticker: String,
    pub latest_close: f64,
    pub extreme: f64,
}

fn label(kind: ExtremeKind) -> &'static str {
    match kind {
        ExtremeKind::Max => "HIGH",
        ExtremeKind::Min => "LOW",
    }
}

fn chart_dir_name(kind: ExtremeKind) -> &'static str {
    match kind {
        ExtremeKind::Max => screen_dir::WEEK52_HIGH,
        ExtremeKind::Min => screen_dir::WEEK52_LOW,
    }
}

fn file_suffix(kind: ExtremeKind) -> &'static str {
    match kind {
        ExtremeKind::Max => "52whigh",
        ExtremeKind::Min => "52wlow",
    }
}

pub fn evaluate_series(series: &PriceSeries, kind: ExtremeKind) -> Result<Option<Week52Row>> {
    series.require_len(2)?;
    let closes = series.closes();
    let extreme = indicators::extreme_of(&closes, kind)
        .ok_or_else(|| AppError::NoData(series.symbol().to_string()))?;
    let latest_close = closes[closes.len() - 1];

    if indicators::is_at_extreme(latest_close, extreme, EXTREME_TOLERANCE) {
        Ok(Some(Week52Row {
            ticker: series.symbol().to_string(),
            latest_close,
            extreme,
        }))
    } else {
        Ok(None)
    }
}

pub fn run(universe: &Universe, output_root: &Path, kind: ExtremeKind) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create Tokio runtime: {}", e)))?;
    runtime.block_on(execute(universe, output_root, kind))
}

async fn execute(universe: &Universe, output_root: &Path, kind: ExtremeKind) -> Result<()> {
    println!("\n📊 Scanning for stocks at 52-week {}...", label(kind));

    let chart_dir = utils::ensure_screen_dir(output_root, chart_dir_name(kind))?;
    let client = YahooClient::new(true, 60)?;
    let spec = FetchSpec::daily(Period::OneYear, true);

    let results = run_screen(
        universe.symbols(),
        |symbol| {
            let client = &client;
            async move { client.get_history(&symbol, &spec).await }
        },
        |series: &PriceSeries| evaluate_series(series, kind),
        |series, row: &Week52Row| {
            let path = chart_dir.join(format!("{}_{}_chart.png", row.ticker, file_suffix(kind)));
            let title = format!("{} - 1Y Chart (52W {})", row.ticker, label(kind));
            chart::render_close_line(&path, &title, series.bars())?;
            Ok(Some(path))
        },
    )
    .await;

    if results.is_empty() {
        println!("❌ No stocks currently at 52-week {}.", label(kind).to_lowercase());
        return Ok(());
    }

    for row in &results {
        println!(
            "✅ {} is at 52-week {} (close {:.2}, 52W level {:.2})",
            row.ticker,
            label(kind),
            row.latest_close,
            row.extreme
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

    #[test]
    fn test_flat_series_ending_at_max_is_flagged() {
        let s = series("FLAT", &[100.0; 10]);
        let row = evaluate_series(&s, ExtremeKind::Max).unwrap();
        assert!(row.is_some());
    }

    #[test]
    fn test_mid_series_max_is_not_flagged() {
        let s = series("MID", &[100.0, 120.0, 110.0, 105.0]);
        assert!(evaluate_series(&s, ExtremeKind::Max).unwrap().is_none());
    }

    #[test]
    fn test_tolerance_absorbs_float_noise() {
        // Latest sits 0.005 below the high: inside the absolute tolerance
        let s = series("NEAR", &[90.0, 100.005, 100.0]);
        assert!(evaluate_series(&s, ExtremeKind::Max).unwrap().is_some());

        // 0.02 below: outside
        let s = series("FAR", &[90.0, 100.02, 100.0]);
        assert!(evaluate_series(&s, ExtremeKind::Max).unwrap().is_none());
    }

    #[test]
    fn test_low_side() {
        let s = series("LOW", &[100.0, 95.0, 90.0]);
        assert!(evaluate_series(&s, ExtremeKind::Min).unwrap().is_some());
        assert!(evaluate_series(&s, ExtremeKind::Max).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pipeline_flags_only_the_extreme_ticker() {
        let symbols = vec!["AT_HIGH".to_string(), "OFF_HIGH".to_string()];
        let results = run_screen(
            &symbols,
            |symbol| async move {
                if symbol == "AT_HIGH" {
                    Ok(series("AT_HIGH", &[100.0; 10]))
                } else {
                    Ok(series("OFF_HIGH", &[100.0, 120.0, 110.0]))
                }
            },
            |s: &PriceSeries| evaluate_series(s, ExtremeKind::Max),
            |_, _| Ok(None),
        )
        .await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ticker, "AT_HIGH");
    }
}
