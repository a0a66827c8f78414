use std::path::{Path, PathBuf};

use crate::error::Result;

/// Get the chart output root from environment variable or use default
pub fn get_output_dir() -> PathBuf {
    std::env::var("STOCK_GRAPHS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("stock_graphs"))
}

/// Get the ticker manifest path from environment variable or use default
pub fn get_ticker_list_file() -> PathBuf {
    std::env::var("TICKER_LIST_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("nifty_500_list.csv"))
}

/// Create a screen's chart directory under the output root, on demand.
/// Stale files from earlier runs are left in place.
pub fn ensure_screen_dir(output_root: &Path, screen: &str) -> Result<PathBuf> {
    let dir = output_root.join(screen);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
