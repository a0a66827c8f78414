pub mod config;
pub mod fetch;
pub mod ohlcv;
pub mod series;
pub mod universe;

pub use config::{CrossoverMode, GapMode, MoverDirection, RsiMode};
pub use fetch::{FetchRange, FetchSpec, Interval, Period};
pub use ohlcv::Ohlcv;
pub use series::PriceSeries;
pub use universe::Universe;
