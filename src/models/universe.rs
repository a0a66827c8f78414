use std::path::Path;

use crate::error::{AppError, Result};

/// The ordered ticker universe a screen iterates over.
///
/// Loaded once at startup from a CSV manifest with a `Symbol` column
/// (remaining columns are ignored). The pipeline treats it as an opaque
/// ordered sequence; manifest order is preserved.
#[derive(Debug, Clone)]
pub struct Universe {
    symbols: Vec<String>,
}

impl Universe {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    /// Load the universe from a CSV manifest
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::Config(format!("Cannot read ticker list {}: {}", path.display(), e))
        })?;

        let headers = reader.headers()?.clone();
        let symbol_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("symbol"))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Ticker list {} has no 'Symbol' column",
                    path.display()
                ))
            })?;

        let mut symbols = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(symbol) = record.get(symbol_idx) {
                let symbol = symbol.trim();
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        if symbols.is_empty() {
            return Err(AppError::Config(format!(
                "Ticker list {} contains no symbols",
                path.display()
            )));
        }

        Ok(Self { symbols })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_manifest(name: &str, content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("universe_{}_{}.csv", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_loads_symbol_column_in_order() {
        let path = write_manifest(
            "ordered",
            "Company Name,Symbol,Series\nReliance,RELIANCE.NS,EQ\nTCS,TCS.NS,EQ\nInfosys,INFY.NS,EQ\n",
        );
        let universe = Universe::from_file(&path).unwrap();
        assert_eq!(
            universe.symbols(),
            &["RELIANCE.NS", "TCS.NS", "INFY.NS"]
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_symbol_column() {
        let path = write_manifest("no_symbol", "Name,ISIN\nReliance,INE002A01018\n");
        assert!(Universe::from_file(&path).is_err());
        std::fs::remove_file(path).ok();
    }
}
