use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV (Open, High, Low, Close, Volume) bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ohlcv {
    /// Bar timestamp (trading date for daily bars)
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price (split/dividend adjusted when fetched adjusted)
    pub close: f64,

    /// Traded volume
    pub volume: u64,
}

impl Ohlcv {
    pub fn new(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}
