//! Strong 5-year return combined with a weak 1-year return (drawdown
//! candidates).

use std::path::Path;

use crate::constants::screen_dir;
use crate::error::{AppError, Result};
use crate::indicators;
use crate::models::{FetchSpec, Period, PriceSeries, Universe};
use crate::services::{chart, run_screen, YahooClient};
use crate::utils;

#[derive(Debug, Clone, Copy)]
pub struct FiveYearConfig {
    pub min_5y_return: f64,
    pub max_1y_return: f64,
}

#[derive(Debug)]
pub struct FiveYearRow {
    pub ticker: String,
    pub ret_5y: f64,
    pub ret_1y: f64,
}

/// Both comparisons are lower bounds: the 1Y parameter is named a
/// maximum but has always been applied as `>=`, and screens downstream
/// depend on that behavior.
pub fn passes(ret_5y: f64, ret_1y: f64, config: &FiveYearConfig) -> bool {
    ret_5y >= config.min_5y_return && ret_1y >= config.max_1y_return
}

fn evaluate_pair(
    five: &PriceSeries,
    one: &PriceSeries,
    config: &FiveYearConfig,
) -> Result<Option<FiveYearRow>> {
    five.require_len(2)?;
    one.require_len(2)?;

    let ret_5y = series_return(five)?;
    let ret_1y = series_return(one)?;

    if passes(ret_5y, ret_1y, config) {
        Ok(Some(FiveYearRow {
            ticker: five.symbol().to_string(),
            ret_5y,
            ret_1y,
        }))
    } else {
        Ok(None)
    }
}

fn series_return(series: &PriceSeries) -> Result<f64> {
    let start = series.first().map(|b| b.close).unwrap_or(0.0);
    let end = series.last().map(|b| b.close).unwrap_or(0.0);
    indicators::percent_return(start, end)
        .ok_or_else(|| AppError::Other(format!("{}: zero base price", series.symbol())))
}

pub fn run(universe: &Universe, output_root: &Path, config: FiveYearConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create Tokio runtime: {}", e)))?;
    runtime.block_on(execute(universe, output_root, config))
}

async fn execute(universe: &Universe, output_root: &Path, config: FiveYearConfig) -> Result<()> {
    println!(
        "\n📊 Scanning for 5Y return >= {:.2}% with 1Y return >= {:.2}%...",
        config.min_5y_return, config.max_1y_return
    );

    let chart_dir = utils::ensure_screen_dir(output_root, screen_dir::FIVE_YEAR)?;
    let client = YahooClient::new(true, 60)?;
    let spec_5y = FetchSpec::daily(Period::FiveYears, true);
    let spec_1y = FetchSpec::daily(Period::OneYear, true);

    let results = run_screen(
        universe.symbols(),
        |symbol| {
            let client = &client;
            async move {
                let five = client.get_history(&symbol, &spec_5y).await?;
                let one = client.get_history(&symbol, &spec_1y).await?;
                Ok((five, one))
            }
        },
        |pair: &(PriceSeries, PriceSeries)| evaluate_pair(&pair.0, &pair.1, &config),
        |pair: &(PriceSeries, PriceSeries), row: &FiveYearRow| {
            let five = &pair.0;
            let path = chart_dir.join(format!("{}_5y_return.png", row.ticker));
            let title = format!(
                "{} - 5Y Close (5Y: {:.2}%, 1Y: {:.2}%)",
                row.ticker, row.ret_5y, row.ret_1y
            );
            chart::render_close_line(&path, &title, five.bars())?;
            Ok(Some(path))
        },
    )
    .await;

    if results.is_empty() {
        println!("❌ No stocks matched the given return filters.");
        return Ok(());
    }

    println!("\n🎯 Stocks matching the criteria:\n");
    println!("{:<16} {:>12} {:>12}", "Ticker", "5Y Return", "1Y Return");
    for row in &results {
        println!(
            "{:<16} {:>11.2}% {:>11.2}%",
            row.ticker, row.ret_5y, row.ret_1y
        );
    }
    println!("\n📁 Charts saved in '{}'", chart_dir.display());
    Ok(())
}
