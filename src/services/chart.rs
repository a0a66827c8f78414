//! Chart rendering for screen matches.
//!
//! Each renderer writes one labeled PNG and reports failures as
//! `AppError::Render` so the pipeline can log and move on; a chart
//! error never costs a ticker its tabular result.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;

use crate::error::{AppError, Result};
use crate::models::Ohlcv;

const CHART_SIZE: (u32, u32) = (1000, 500);
const MACD_CHART_SIZE: (u32, u32) = (1000, 600);
const HEATMAP_SIZE: (u32, u32) = (1600, 1000);

fn render_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Render(e.to_string())
}

/// Pad a price range so flat series still get a visible band
fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

/// Dated close-price line chart (return, 52-week and RSI screens)
pub fn render_close_line(path: &Path, title: &str, bars: &[Ohlcv]) -> Result<()> {
    if bars.len() < 2 {
        return Err(AppError::Render("not enough bars to plot".to_string()));
    }

    let dates: Vec<NaiveDate> = bars.iter().map(|b| b.time.date_naive()).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let (y_min, y_max) = padded_range(&closes);
    let x_range = dates[0]..dates[dates.len() - 1];

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_desc("Date")
        .y_desc("Close Price")
        .x_label_formatter(&|d: &NaiveDate| d.format("%b %y").to_string())
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            dates.iter().cloned().zip(closes.iter().cloned()),
            &BLUE,
        ))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Intraday line chart with timestamps shown in exchange-local time
/// (top-movers screen)
pub fn render_intraday_line(path: &Path, title: &str, bars: &[Ohlcv]) -> Result<()> {
    if bars.len() < 2 {
        return Err(AppError::Render("not enough bars to plot".to_string()));
    }

    let times: Vec<NaiveDateTime> = bars
        .iter()
        .map(|b| b.time.with_timezone(&chrono_tz::Asia::Kolkata).naive_local())
        .collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let (y_min, y_max) = padded_range(&closes);
    let x_range = RangedDateTime::from(times[0]..times[times.len() - 1]);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_desc("Time (IST)")
        .y_desc("Price")
        .x_label_formatter(&|t: &NaiveDateTime| t.format("%H:%M").to_string())
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            times.iter().cloned().zip(closes.iter().cloned()),
            &BLUE,
        ))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// MACD and signal lines with a legend (crossover screen)
pub fn render_macd_lines(
    path: &Path,
    title: &str,
    dates: &[NaiveDate],
    macd_line: &[f64],
    signal_line: &[f64],
) -> Result<()> {
    if dates.len() < 2 || dates.len() != macd_line.len() || dates.len() != signal_line.len() {
        return Err(AppError::Render("mismatched MACD series lengths".to_string()));
    }

    let mut all: Vec<f64> = macd_line.to_vec();
    all.extend_from_slice(signal_line);
    let (y_min, y_max) = padded_range(&all);
    let x_range = dates[0]..dates[dates.len() - 1];

    let root = BitMapBackend::new(path, MACD_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_desc("Date")
        .y_desc("MACD")
        .x_label_formatter(&|d: &NaiveDate| d.format("%b-%d").to_string())
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            dates.iter().cloned().zip(macd_line.iter().cloned()),
            &BLUE,
        ))
        .map_err(render_err)?
        .label("MACD Line")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            dates.iter().cloned().zip(signal_line.iter().cloned()),
            &RED,
        ))
        .map_err(render_err)?
        .label("Signal Line")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Candlestick chart with a volume pane (gap screen)
pub fn render_candles_with_volume(path: &Path, title: &str, bars: &[Ohlcv]) -> Result<()> {
    if bars.len() < 2 {
        return Err(AppError::Render("not enough bars to plot".to_string()));
    }

    let n = bars.len();
    let dates: Vec<NaiveDate> = bars.iter().map(|b| b.time.date_naive()).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let (price_min, _) = padded_range(&lows);
    let (_, price_max) = padded_range(&highs);
    let max_volume = bars.iter().map(|b| b.volume).max().unwrap_or(0) as f64;

    let root = BitMapBackend::new(path, MACD_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let (upper, lower) = root.split_vertically(420);

    // Candles are plotted on a bar index axis so session gaps do not
    // leave holes; tick labels carry the dates instead.
    let x_range = -0.5..(n as f64 - 0.5);
    let label_dates = dates.clone();

    let mut price_chart = ChartBuilder::on(&upper)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), price_min..price_max)
        .map_err(render_err)?;

    price_chart
        .configure_mesh()
        .x_labels(n.min(10))
        .y_desc("Price")
        .x_label_formatter(&move |x: &f64| {
            let i = x.round();
            if i < 0.0 {
                return String::new();
            }
            label_dates
                .get(i as usize)
                .map(|d| d.format("%b-%d").to_string())
                .unwrap_or_default()
        })
        .draw()
        .map_err(render_err)?;

    let candle_width = ((800 / n.max(1)) as u32).clamp(3, 40);
    price_chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            CandleStick::new(
                i as f64,
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                GREEN.filled(),
                RED.filled(),
                candle_width,
            )
        }))
        .map_err(render_err)?;

    let label_dates = dates;
    let mut volume_chart = ChartBuilder::on(&lower)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..(max_volume * 1.1).max(1.0))
        .map_err(render_err)?;

    volume_chart
        .configure_mesh()
        .x_labels(n.min(10))
        .y_desc("Volume")
        .x_label_formatter(&move |x: &f64| {
            let i = x.round();
            if i < 0.0 {
                return String::new();
            }
            label_dates
                .get(i as usize)
                .map(|d| d.format("%b-%d").to_string())
                .unwrap_or_default()
        })
        .draw()
        .map_err(render_err)?;

    volume_chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            Rectangle::new(
                [(i as f64 - 0.3, 0.0), (i as f64 + 0.3, bar.volume as f64)],
                BLUE.mix(0.4).filled(),
            )
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Square annotated heatmap of weekly percentage changes across the
/// whole universe, diverging red (losses) to green (gains)
pub fn render_heatmap(path: &Path, title: &str, entries: &[(String, f64)]) -> Result<()> {
    if entries.is_empty() {
        return Err(AppError::Render("no heatmap entries".to_string()));
    }

    let side = (entries.len() as f64).sqrt().ceil() as usize;
    let max_abs = entries
        .iter()
        .map(|(_, change)| change.abs())
        .fold(f64::MIN, f64::max)
        .max(0.01);

    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let title_height = 40;
    let cell_w = (HEATMAP_SIZE.0 as i32 - 20) / side as i32;
    let cell_h = (HEATMAP_SIZE.1 as i32 - title_height - 20) / side as i32;

    root.draw(&Text::new(
        title.to_string(),
        (20, 10),
        ("sans-serif", 24).into_font().color(&BLACK),
    ))
    .map_err(render_err)?;

    for (index, (ticker, change)) in entries.iter().enumerate() {
        let row = (index / side) as i32;
        let col = (index % side) as i32;
        let x0 = 10 + col * cell_w;
        let y0 = title_height + 10 + row * cell_h;

        let color = diverging_color(*change, max_abs);
        root.draw(&Rectangle::new(
            [(x0, y0), (x0 + cell_w - 2, y0 + cell_h - 2)],
            color.filled(),
        ))
        .map_err(render_err)?;

        root.draw(&Text::new(
            ticker.clone(),
            (x0 + 6, y0 + 6),
            ("sans-serif", 13).into_font().color(&BLACK),
        ))
        .map_err(render_err)?;
        root.draw(&Text::new(
            format!("{:+.2}%", change),
            (x0 + 6, y0 + 22),
            ("sans-serif", 12).into_font().color(&BLACK),
        ))
        .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

/// Blend white toward red for losses and toward green for gains,
/// scaled by the largest absolute move on the board
fn diverging_color(change: f64, max_abs: f64) -> RGBColor {
    let t = (change.abs() / max_abs).clamp(0.0, 1.0);
    let blend = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t) as u8;
    if change < 0.0 {
        RGBColor(blend(255, 214), blend(255, 69), blend(255, 65))
    } else {
        RGBColor(blend(255, 64), blend(255, 160), blend(255, 98))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range_flat_series() {
        let (min, max) = padded_range(&[50.0, 50.0, 50.0]);
        assert!(min < 50.0 && max > 50.0);
    }

    #[test]
    fn test_diverging_color_endpoints() {
        // A zero change stays white in both directions
        assert_eq!(diverging_color(0.0, 5.0), RGBColor(255, 255, 255));
        // Extremes saturate to the palette ends
        assert_eq!(diverging_color(-5.0, 5.0), RGBColor(214, 69, 65));
        assert_eq!(diverging_color(5.0, 5.0), RGBColor(64, 160, 98));
    }

    #[test]
    fn test_render_close_line_rejects_single_bar() {
        use chrono::{TimeZone, Utc};
        let bar = Ohlcv::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            10.0,
            10.0,
            10.0,
            10.0,
            100,
        );
        let path = std::env::temp_dir().join("single_bar.png");
        assert!(render_close_line(&path, "t", &[bar]).is_err());
    }
}
