//! Return over N years: a chart and a reported return for every
//! ticker with enough history, no pass/fail filter.

use std::path::Path;

use chrono::{Duration, Utc};

use crate::error::{AppError, Result};
use crate::indicators;
use crate::models::{FetchSpec, PriceSeries, Universe};
use crate::services::{chart, run_screen, YahooClient};
use crate::utils;

#[derive(Debug, Clone, Copy)]
pub struct ReturnsConfig {
    pub years: u32,
}

#[derive(Debug)]
pub struct ReturnRow {
    pub ticker: String,
    pub return_pct: f64,
}

pub fn evaluate_series(series: &PriceSeries) -> Result<Option<ReturnRow>> {
    series.require_len(2)?;
    let closes = series.closes();
    let return_pct = indicators::percent_return(closes[0], closes[closes.len() - 1])
        .ok_or_else(|| AppError::Other(format!("{}: zero starting price", series.symbol())))?;
    Ok(Some(ReturnRow {
        ticker: series.symbol().to_string(),
        return_pct,
    }))
}

pub fn run(universe: &Universe, output_root: &Path, config: ReturnsConfig) -> Result<()> {
    if config.years == 0 {
        return Err(AppError::InvalidInput(
            "number of years must be greater than zero".to_string(),
        ));
    }
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create Tokio runtime: {}", e)))?;
    runtime.block_on(execute(universe, output_root, config))
}

async fn execute(universe: &Universe, output_root: &Path, config: ReturnsConfig) -> Result<()> {
    println!("\n📊 Generating {}-year return line charts...", config.years);

    let dir_name = format!("returns_over_{}y", config.years);
    let chart_dir = utils::ensure_screen_dir(output_root, &dir_name)?;

    let end = Utc::now().date_naive();
    let start = end - Duration::days(365 * config.years as i64);
    let spec = FetchSpec::span(start, end, true);

    let client = YahooClient::new(true, 60)?;
    let years = config.years;

    let results = run_screen(
        universe.symbols(),
        |symbol| {
            let client = &client;
            async move { client.get_history(&symbol, &spec).await }
        },
        evaluate_series,
        |series, row: &ReturnRow| {
            let path = chart_dir.join(format!("{}_return_{}y.png", row.ticker, years));
            let title = format!("{} - {}Y Return: {:.2}%", row.ticker, years, row.return_pct);
            chart::render_close_line(&path, &title, series.bars())?;
            Ok(Some(path))
        },
    )
    .await;

    if results.is_empty() {
        println!("❌ No tickers had enough price history.");
        return Ok(());
    }

    for row in &results {
        println!("✅ {}: Return = {:.2}%", row.ticker, row.return_pct);
    }
    println!("\n📁 All charts saved in '{}'", chart_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ohlcv;
    use chrono::TimeZone;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + Duration::days(i as i64);
                Ohlcv::new(time, close, close, close, close, 1000)
            })
            .collect();
        PriceSeries::new(symbol, bars).unwrap()
    }

    #[test]
    fn test_every_valid_ticker_reports_a_return() {
        let s = series("ANY", &[100.0, 80.0, 150.0]);
        let row = evaluate_series(&s).unwrap().unwrap();
        assert!((row.return_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_years_rejected() {
        let universe = Universe::new(vec!["A".to_string()]);
        let config = ReturnsConfig { years: 0 };
        let result = run(&universe, Path::new("/tmp"), config);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
