pub mod chart;
pub mod provider;
pub mod screener;

pub use provider::YahooClient;
pub use screener::run_screen;
