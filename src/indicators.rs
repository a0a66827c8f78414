//! Pure indicator math over close-price series.
//!
//! Every function here is stateless and recomputed from scratch on each
//! screen run. Degenerate arithmetic (zero base price, no losses in the
//! RSI window) yields `None` rather than NaN or a panic; callers must
//! treat `None` as ineligible for thresholding.

/// Percentage return between two prices: `(end - start) / start * 100`.
///
/// Returns `None` when `start` is zero.
pub fn percent_return(start: f64, end: f64) -> Option<f64> {
    if start == 0.0 {
        None
    } else {
        Some((end - start) / start * 100.0)
    }
}

/// Relative Strength Index using a simple rolling mean of gains and
/// losses (not Wilder's smoothing).
///
/// Returns one entry per input close. The first `period` entries are
/// `None` (not enough deltas for a full window), and any bar whose
/// rolling loss average is zero is `None` as well: with no losses the
/// relative strength is undefined, and callers must not infer RSI = 100.
pub fn rolling_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut rsi = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return rsi;
    }

    // Deltas are indexed by the later bar: delta[i] = close[i] - close[i-1]
    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];
    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    for i in period..closes.len() {
        let window = (i + 1 - period)..=i;
        let gain_avg: f64 = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let loss_avg: f64 = losses[window].iter().sum::<f64>() / period as f64;

        if loss_avg == 0.0 {
            continue;
        }
        let rs = gain_avg / loss_avg;
        rsi[i] = Some(100.0 - 100.0 / (1.0 + rs));
    }

    rsi
}

/// Exponential moving average with span-based smoothing.
///
/// `alpha = 2 / (span + 1)`, seeded from the first value, no bias
/// adjustment. Empty input yields an empty output.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = values[0];
    out.push(prev);
    for &value in &values[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}

/// MACD line (`EMA12 - EMA26`) and its signal line (`EMA9` of MACD).
pub fn macd(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let fast = ema(closes, crate::constants::MACD_FAST_SPAN);
    let slow = ema(closes, crate::constants::MACD_SLOW_SPAN);
    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = ema(&macd_line, crate::constants::MACD_SIGNAL_SPAN);
    (macd_line, signal_line)
}

/// True when MACD crossed above its signal line at the latest bar:
/// `macd[t-1] < signal[t-1]` and `macd[t] > signal[t]`.
pub fn bullish_crossover(macd_line: &[f64], signal_line: &[f64]) -> bool {
    let n = macd_line.len().min(signal_line.len());
    if n < 2 {
        return false;
    }
    macd_line[n - 2] < signal_line[n - 2] && macd_line[n - 1] > signal_line[n - 1]
}

/// True when MACD crossed below its signal line at the latest bar.
pub fn bearish_crossover(macd_line: &[f64], signal_line: &[f64]) -> bool {
    let n = macd_line.len().min(signal_line.len());
    if n < 2 {
        return false;
    }
    macd_line[n - 2] > signal_line[n - 2] && macd_line[n - 1] < signal_line[n - 1]
}

/// Opening gap against the prior session's close, in percent.
///
/// Returns `None` when the previous close is zero.
pub fn gap_percent(prev_close: f64, today_open: f64) -> Option<f64> {
    if prev_close == 0.0 {
        None
    } else {
        Some((today_open - prev_close) / prev_close * 100.0)
    }
}

/// Which end of the range a 52-week screen looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeKind {
    Max,
    Min,
}

/// Scalar max or min of a close-price series. `None` on empty input.
pub fn extreme_of(closes: &[f64], kind: ExtremeKind) -> Option<f64> {
    if closes.is_empty() {
        return None;
    }
    let folded = match kind {
        ExtremeKind::Max => closes.iter().cloned().fold(f64::MIN, f64::max),
        ExtremeKind::Min => closes.iter().cloned().fold(f64::MAX, f64::min),
    };
    Some(folded)
}

/// Absolute-tolerance comparison of the latest close against an extreme.
/// The tolerance absorbs floating-point noise when the latest bar is the
/// extreme bar itself.
pub fn is_at_extreme(latest: f64, extreme: f64, tolerance: f64) -> bool {
    (latest - extreme).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_return() {
        assert_eq!(percent_return(100.0, 160.0), Some(60.0));
        assert_eq!(percent_return(100.0, 90.0), Some(-10.0));
        assert_eq!(percent_return(0.0, 5.0), None);
    }

    #[test]
    fn test_rsi_window_start() {
        let closes: Vec<f64> = vec![10.0, 11.0, 10.5, 11.5, 11.0, 12.0, 11.8, 12.5];
        let rsi = rolling_rsi(&closes, 3);
        assert_eq!(rsi.len(), closes.len());
        for value in &rsi[..3] {
            assert!(value.is_none());
        }
        for value in &rsi[3..] {
            let v = value.expect("mixed series should have defined RSI");
            assert!(v > 0.0 && v < 100.0);
        }
    }

    #[test]
    fn test_rsi_undefined_without_losses() {
        // Strictly rising closes: every rolling loss average is zero, so
        // RSI stays undefined instead of being asserted as 100.
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let rsi = rolling_rsi(&closes, 14);
        assert!(rsi.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_short_series() {
        let closes = vec![10.0, 9.0, 11.0];
        let rsi = rolling_rsi(&closes, 14);
        assert!(rsi.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_ema_seeding_and_smoothing() {
        // span 3 => alpha 0.5
        let values = vec![2.0, 4.0, 8.0];
        let out = ema(&values, 3);
        assert_eq!(out[0], 2.0);
        assert_eq!(out[1], 3.0);
        assert_eq!(out[2], 5.5);
    }

    #[test]
    fn test_macd_crossover_fires_only_at_the_crossing_bar() {
        // Forty falling bars push MACD below its signal line, then a sharp
        // reversal drags it back across. Locate the flip of the
        // MACD-minus-signal sign and check the crossover detectors bar by bar.
        let mut closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        closes.extend((0..20).map(|i| 161.0 + 3.0 * i as f64));
        let (macd_line, signal_line) = macd(&closes);

        let diff: Vec<f64> = macd_line
            .iter()
            .zip(&signal_line)
            .map(|(m, s)| m - s)
            .collect();
        let t = (1..diff.len())
            .find(|&i| diff[i - 1] < 0.0 && diff[i] > 0.0)
            .expect("constructed series must cross upward once");
        assert!(t + 1 < macd_line.len());

        assert!(bullish_crossover(&macd_line[..=t], &signal_line[..=t]));
        assert!(!bullish_crossover(&macd_line[..t], &signal_line[..t]));
        assert!(!bullish_crossover(&macd_line[..=t + 1], &signal_line[..=t + 1]));
        assert!(!bearish_crossover(&macd_line[..=t], &signal_line[..=t]));
    }

    #[test]
    fn test_crossover_needs_two_bars() {
        assert!(!bullish_crossover(&[1.0], &[0.5]));
        assert!(!bearish_crossover(&[1.0], &[0.5]));
    }

    #[test]
    fn test_gap_percent() {
        assert_eq!(gap_percent(100.0, 103.0), Some(3.0));
        assert_eq!(gap_percent(100.0, 97.5), Some(-2.5));
        assert_eq!(gap_percent(0.0, 5.0), None);
    }

    #[test]
    fn test_extreme_of() {
        let closes = vec![10.0, 14.0, 9.0, 12.0];
        assert_eq!(extreme_of(&closes, ExtremeKind::Max), Some(14.0));
        assert_eq!(extreme_of(&closes, ExtremeKind::Min), Some(9.0));
        assert_eq!(extreme_of(&[], ExtremeKind::Max), None);
    }

    #[test]
    fn test_is_at_extreme_absolute_tolerance() {
        assert!(is_at_extreme(100.005, 100.0, 0.01));
        assert!(!is_at_extreme(100.02, 100.0, 0.01));
        assert!(is_at_extreme(99.995, 100.0, 0.01));
    }
}
