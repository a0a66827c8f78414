//! Generic screen pipeline: one sequential filtering pass over the
//! ticker universe.
//!
//! Every screen is an instance of the same shape: fetch per ticker,
//! evaluate against the screen's predicate, collect matches, render a
//! chart per match. Failures are isolated per ticker — a bad fetch,
//! short history, or chart error never aborts the batch.

use std::future::Future;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;

/// Drive one pass over `symbols`.
///
/// * `fetch` downloads whatever the screen needs for one ticker
///   (usually one `PriceSeries`, two for return comparisons); an error
///   skips the ticker with a logged reason.
/// * `evaluate` combines indicator computation and the threshold test:
///   `Ok(Some(row))` is a match, `Ok(None)` a clean non-match, `Err` a
///   per-ticker skip (insufficient history, degenerate arithmetic).
/// * `render` persists a chart for a match and returns its path;
///   `Ok(None)` means the screen charts later (movers, heatmap). A
///   render failure is logged and the row is still reported.
///
/// Matches are returned in discovery order.
pub async fn run_screen<S, T, F, Fut, E, R>(
    symbols: &[String],
    mut fetch: F,
    mut evaluate: E,
    mut render: R,
) -> Vec<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<S>>,
    E: FnMut(&S) -> Result<Option<T>>,
    R: FnMut(&S, &T) -> Result<Option<PathBuf>>,
{
    let pb = progress_bar(symbols.len());
    let mut results = Vec::new();

    for symbol in symbols {
        pb.set_message(symbol.clone());

        let data = match fetch(symbol.clone()).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("{}: fetch failed: {}", symbol, e);
                pb.println(format!("⚠️  Skipped {}: {}", symbol, e));
                pb.inc(1);
                continue;
            }
        };

        match evaluate(&data) {
            Ok(Some(row)) => {
                match render(&data, &row) {
                    Ok(Some(path)) => {
                        pb.println(format!("📈 Saved chart for {}: {}", symbol, path.display()));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // The match still counts; only its chart is missing
                        tracing::warn!("{}: chart render failed: {}", symbol, e);
                        pb.println(format!("⚠️  Chart failed for {}: {}", symbol, e));
                    }
                }
                results.push(row);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!("{}: skipped: {}", symbol, e);
                pb.println(format!("⚠️  Skipped {}: {}", symbol, e));
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    results
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Ohlcv, PriceSeries};
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

    #[tokio::test]
    async fn test_one_failing_fetch_does_not_abort_the_batch() {
        let symbols = vec!["BAD".to_string(), "GOOD".to_string()];
        let results = run_screen(
            &symbols,
            |symbol| async move {
                if symbol == "BAD" {
                    Err(AppError::Network("connection refused".to_string()))
                } else {
                    Ok(series(&symbol, &[10.0, 12.0]))
                }
            },
            |s: &PriceSeries| Ok(Some(s.symbol().to_string())),
            |_, _| Ok(Some(PathBuf::from("unused.png"))),
        )
        .await;

        assert_eq!(results, vec!["GOOD".to_string()]);
    }

    #[tokio::test]
    async fn test_results_keep_discovery_order() {
        let symbols: Vec<String> = ["C", "A", "B"].iter().map(|s| s.to_string()).collect();
        let results = run_screen(
            &symbols,
            |symbol| async move { Ok(series(&symbol, &[10.0, 12.0])) },
            |s: &PriceSeries| Ok(Some(s.symbol().to_string())),
            |_, _| Ok(None),
        )
        .await;
        assert_eq!(results, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_render_failure_keeps_the_row() {
        let symbols = vec!["ONLY".to_string()];
        let results = run_screen(
            &symbols,
            |symbol| async move { Ok(series(&symbol, &[10.0, 12.0])) },
            |s: &PriceSeries| Ok(Some(s.symbol().to_string())),
            |_, _| Err(AppError::Render("bad data shape".to_string())),
        )
        .await;
        assert_eq!(results, vec!["ONLY".to_string()]);
    }

    #[tokio::test]
    async fn test_evaluate_error_skips_ticker() {
        let symbols = vec!["SHORT".to_string(), "FULL".to_string()];
        let results = run_screen(
            &symbols,
            |symbol| async move {
                if symbol == "SHORT" {
                    Ok(series(&symbol, &[10.0]))
                } else {
                    Ok(series(&symbol, &[10.0, 12.0]))
                }
            },
            |s: &PriceSeries| {
                s.require_len(2)?;
                Ok(Some(s.symbol().to_string()))
            },
            |_, _| Ok(None),
        )
        .await;
        assert_eq!(results, vec!["FULL".to_string()]);
    }

    #[tokio::test]
    async fn test_two_series_fetch() {
        // Return-comparison screens download two windows per ticker
        let symbols = vec!["PAIR".to_string()];
        let results = run_screen(
            &symbols,
            |symbol| async move {
                Ok((series(&symbol, &[10.0, 16.0]), series(&symbol, &[20.0, 18.0])))
            },
            |pair: &(PriceSeries, PriceSeries)| {
                Ok(Some((pair.0.closes()[1], pair.1.closes()[1])))
            },
            |_, _| Ok(None),
        )
        .await;
        assert_eq!(results, vec![(16.0, 18.0)]);
    }
}
