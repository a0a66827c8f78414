use crate::error::{AppError, Result};
use crate::models::Ohlcv;

/// An ordered-by-date OHLCV series for one ticker over a requested window.
///
/// Bar times are strictly increasing; non-trading days are simply absent,
/// never null-filled. A series lives only for the duration of one screen
/// pass and is dropped once its metrics are derived.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Ohlcv>,
}

impl PriceSeries {
    /// Build a series, rejecting bars that are not strictly increasing
    /// in time.
    pub fn new(symbol: impl Into<String>, bars: Vec<Ohlcv>) -> Result<Self> {
        let symbol = symbol.into();
        for pair in bars.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(AppError::Parse(format!(
                    "{}: bars out of order at {}",
                    symbol, pair[1].time
                )));
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Ohlcv] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in bar order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> Option<&Ohlcv> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Ohlcv> {
        self.bars.last()
    }

    /// The trailing `count` bars (the whole series when shorter)
    pub fn tail(&self, count: usize) -> &[Ohlcv] {
        let start = self.bars.len().saturating_sub(count);
        &self.bars[start..]
    }

    /// Error unless the series carries at least `min` bars; used by screens
    /// to enforce their indicator's minimum window before computing.
    pub fn require_len(&self, min: usize) -> Result<()> {
        if self.bars.len() < min {
            return Err(AppError::InsufficientHistory(format!(
                "{}: {} bars, need {}",
                self.symbol,
                self.bars.len(),
                min
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(day: u32, close: f64) -> Ohlcv {
        let time = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        Ohlcv::new(time, close, close, close, close, 1000)
    }

    #[test]
    fn test_rejects_out_of_order_bars() {
        let result = PriceSeries::new("TEST", vec![bar(2, 10.0), bar(1, 11.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let result = PriceSeries::new("TEST", vec![bar(2, 10.0), bar(2, 11.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_gaps_are_allowed() {
        // Non-trading days are absent, not null-filled
        let series = PriceSeries::new("TEST", vec![bar(1, 10.0), bar(4, 11.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn test_require_len() {
        let series = PriceSeries::new("TEST", vec![bar(1, 10.0), bar(2, 11.0)]).unwrap();
        assert!(series.require_len(2).is_ok());
        assert!(series.require_len(3).is_err());
    }

    #[test]
    fn test_tail() {
        let series =
            PriceSeries::new("TEST", vec![bar(1, 1.0), bar(2, 2.0), bar(3, 3.0)]).unwrap();
        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(2)[0].close, 2.0);
        assert_eq!(series.tail(10).len(), 3);
    }
}
