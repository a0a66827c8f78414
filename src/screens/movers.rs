//! Top daily gainers and losers, with intraday charts for the
//! selected tickers.

use std::cmp::Ordering;
use std::path::Path;

use crate::constants::screen_dir;
use crate::error::{AppError, Result};
use crate::indicators;
use crate::models::{FetchSpec, MoverDirection, Period, PriceSeries, Universe};
use crate::services::{chart, run_screen, YahooClient};
use crate::utils;

#[derive(Debug, Clone, Copy)]
pub struct MoversConfig {
    pub count: usize,
    pub direction: MoverDirection,
}

#[derive(Debug, Clone)]
pub struct MoverRow {
    pub ticker: String,
    pub prev_close: f64,
    pub last_close: f64,
    pub change_pct: f64,
}

fn evaluate_series(series: &PriceSeries) -> Result<Option<MoverRow>> {
    series.require_len(2)?;
    let closes = series.closes();
    let prev_close = closes[closes.len() - 2];
    let last_close = closes[closes.len() - 1];
    let change_pct = indicators::percent_return(prev_close, last_close)
        .ok_or_else(|| AppError::Other(format!("{}: zero previous close", series.symbol())))?;
    Ok(Some(MoverRow {
        ticker: series.symbol().to_string(),
        prev_close,
        last_close,
        change_pct,
    }))
}

/// Sort by daily change (descending for gainers, ascending for losers)
/// and keep the top `count`
pub fn select_top(mut rows: Vec<MoverRow>, direction: MoverDirection, count: usize) -> Vec<MoverRow> {
    rows.sort_by(|a, b| {
        let ordering = a
            .change_pct
            .partial_cmp(&b.change_pct)
            .unwrap_or(Ordering::Equal);
        match direction {
            MoverDirection::Gainers => ordering.reverse(),
            MoverDirection::Losers => ordering,
        }
    });
    rows.truncate(count);
    rows
}

pub fn run(universe: &Universe, output_root: &Path, config: MoversConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create Tokio runtime: {}", e)))?;
    runtime.block_on(execute(universe, output_root, config))
}

async fn execute(universe: &Universe, output_root: &Path, config: MoversConfig) -> Result<()> {
    println!("\n📊 Scanning daily movers...");

    let client = YahooClient::new(true, 60)?;
    let spec = FetchSpec::daily(Period::FiveDays, false);

    let rows = run_screen(
        universe.symbols(),
        |symbol| {
            let client = &client;
            async move { client.get_history(&symbol, &spec).await }
        },
        evaluate_series,
        |_, _| Ok(None),
    )
    .await;

    if rows.is_empty() {
        println!("❌ No valid stock data found.");
        return Ok(());
    }

    let selected = select_top(rows, config.direction, config.count);

    match config.direction {
        MoverDirection::Gainers => println!("\n📈 Top Gainers:"),
        MoverDirection::Losers => println!("\n📉 Top Losers:"),
    }
    for row in &selected {
        println!(
            "{} | Prev Close: {:.2} | Last Close: {:.2} | Change: {:.2}%",
            row.ticker, row.prev_close, row.last_close, row.change_pct
        );
    }

    // Intraday charts for the selected tickers only
    let chart_dir = utils::ensure_screen_dir(output_root, screen_dir::TOP_MOVERS)?;
    for row in &selected {
        match client.get_history(&row.ticker, &FetchSpec::intraday()).await {
            Ok(intraday) => {
                let date = intraday
                    .last()
                    .map(|b| b.time.date_naive().to_string())
                    .unwrap_or_default();
                let path = chart_dir.join(format!("{}_intraday.png", row.ticker));
                let title = format!(
                    "{} Intraday ({}) - Change: {:.2}%",
                    row.ticker, date, row.change_pct
                );
                match chart::render_intraday_line(&path, &title, intraday.bars()) {
                    Ok(()) => println!("📊 Chart saved: {}", path.display()),
                    Err(e) => println!("⚠️  Couldn't plot {}: {}", row.ticker, e),
                }
            }
            Err(e) => println!("⚠️  No intraday data for {}: {}", row.ticker, e),
        }
    }

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
    fn test_select_top_gainers_and_losers() {
        let rows = vec![
            MoverRow {
                ticker: "A".into(),
                prev_close: 100.0,
                last_close: 102.0,
                change_pct: 2.0,
            },
            MoverRow {
                ticker: "B".into(),
                prev_close: 100.0,
                last_close: 105.0,
                change_pct: 5.0,
            },
            MoverRow {
                ticker: "C".into(),
                prev_close: 100.0,
                last_close: 97.0,
                change_pct: -3.0,
            },
        ];

        let gainers = select_top(rows.clone(), MoverDirection::Gainers, 2);
        assert_eq!(gainers[0].ticker, "B");
        assert_eq!(gainers[1].ticker, "A");

        let losers = select_top(rows, MoverDirection::Losers, 1);
        assert_eq!(losers[0].ticker, "C");
    }

    #[tokio::test]
    async fn test_top_one_gainer_from_universe() {
        // B moved +5%, A +2%: gainers with N=1 selects B
        let symbols = vec!["A".to_string(), "B".to_string()];
        let rows = run_screen(
            &symbols,
            |symbol| async move {
                if symbol == "A" {
                    Ok(series("A", &[100.0, 102.0]))
                } else {
                    Ok(series("B", &[100.0, 105.0]))
                }
            },
            evaluate_series,
            |_, _| Ok(None),
        )
        .await;

        let selected = select_top(rows, MoverDirection::Gainers, 1);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].ticker, "B");
    }

    #[test]
    fn test_single_bar_is_skipped() {
        let short = series("X", &[100.0]);
        assert!(evaluate_series(&short).is_err());
    }
}
