//! Screen parameters and output layout constants.

/// RSI lookback window in bars
pub const RSI_PERIOD: usize = 14;

/// RSI level below which a stock counts as oversold
pub const RSI_OVERSOLD: f64 = 30.0;

/// RSI level above which a stock counts as overbought
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Fast EMA span for the MACD line
pub const MACD_FAST_SPAN: usize = 12;

/// Slow EMA span for the MACD line
pub const MACD_SLOW_SPAN: usize = 26;

/// EMA span for the MACD signal line
pub const MACD_SIGNAL_SPAN: usize = 9;

/// Minimum bars for a meaningful MACD crossover (slow span plus settle time)
pub const MACD_MIN_BARS: usize = 35;

/// Bars of MACD history shown on a crossover chart
pub const MACD_CHART_BARS: usize = 60;

/// Absolute price tolerance when checking the latest close against a
/// 52-week extreme
pub const EXTREME_TOLERANCE: f64 = 0.01;

/// Default gap threshold in percent when the user supplies none
pub const DEFAULT_GAP_THRESHOLD: f64 = 2.0;

/// Bars of history shown on a gap candlestick chart
pub const GAP_CHART_BARS: usize = 10;

/// Per-screen subdirectories under the output root
pub mod screen_dir {
    pub const FIVE_YEAR: &str = "strong_5y_weak_1y";
    pub const TOP_MOVERS: &str = "top_daily_movers";
    pub const WEEK52_HIGH: &str = "52_week_high";
    pub const WEEK52_LOW: &str = "52_week_low";
    pub const RSI_LOW: &str = "rsi_low";
    pub const RSI_HIGH: &str = "rsi_high";
    pub const GAP_UP: &str = "gap_up";
    pub const GAP_DOWN: &str = "gap_down";
    pub const MACD_BULLISH: &str = "macd_bullish";
    pub const MACD_BEARISH: &str = "macd_bearish";
}

/// File name of the weekly change heatmap, written at the output root
pub const HEATMAP_FILE: &str = "weekly_heatmap.png";
