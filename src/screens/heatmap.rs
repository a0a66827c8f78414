//! Weekly percentage-change heatmap over the whole universe.

use std::path::Path;

use crate::constants::HEATMAP_FILE;
use crate::error::{AppError, Result};
use crate::indicators;
use crate::models::{FetchSpec, Period, PriceSeries, Universe};
use crate::services::{chart, run_screen, YahooClient};

fn evaluate_series(series: &PriceSeries) -> Result<Option<(String, f64)>> {
    series.require_len(2)?;
    let closes = series.closes();
    let change = indicators::percent_return(closes[0], closes[closes.len() - 1])
        .ok_or_else(|| AppError::Other(format!("{}: zero starting close", series.symbol())))?;
    Ok(Some((series.symbol().to_string(), change)))
}

pub fn run(universe: &Universe, output_root: &Path) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Other(format!("Failed to create Tokio runtime: {}", e)))?;
    runtime.block_on(execute(universe, output_root))
}

async fn execute(universe: &Universe, output_root: &Path) -> Result<()> {
    println!("\n📥 Fetching weekly price change data...");

    let client = YahooClient::new(true, 60)?;
    let spec = FetchSpec::daily(Period::FiveDays, true);

    let mut entries = run_screen(
        universe.symbols(),
        |symbol| {
            let client = &client;
            async move { client.get_history(&symbol, &spec).await }
        },
        evaluate_series,
        |_, _| Ok(None),
    )
    .await;

    if entries.is_empty() {
        println!("❌ No weekly change data available. Heatmap aborted.");
        return Ok(());
    }

    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    std::fs::create_dir_all(output_root)?;
    let path = output_root.join(HEATMAP_FILE);
    chart::render_heatmap(&path, "Weekly % Change Heatmap", &entries)?;
    println!("✅ Heatmap saved to {}", path.display());
    Ok(())
}
