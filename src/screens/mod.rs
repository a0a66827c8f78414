pub mod five_year;
pub mod gap;
pub mod heatmap;
pub mod macd;
pub mod movers;
pub mod returns;
pub mod rsi;
pub mod week52;
