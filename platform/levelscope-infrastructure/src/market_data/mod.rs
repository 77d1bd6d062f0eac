mod files;

pub use files::{load_csv, load_json};

use levelscope_domain::repositories::market_data::{BarQuery, MarketDataRepository};
use levelscope_domain::value_objects::raw_bar::RawBar;
use std::path::PathBuf;

/// Per-symbol bar files under one directory: `<root>/<symbol>.json`, else
/// `<root>/<symbol>.csv`.
#[derive(Debug, Clone)]
pub struct FileMarketData {
    root: PathBuf,
}

impl FileMarketData {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, symbol: &str) -> [PathBuf; 2] {
        [
            self.root.join(format!("{symbol}.json")),
            self.root.join(format!("{symbol}.csv")),
        ]
    }
}

impl MarketDataRepository for FileMarketData {
    fn load_raw_bars(&self, query: &BarQuery) -> Result<Vec<RawBar>, String> {
        let symbol = query.symbol.trim();
        if symbol.is_empty() || symbol.contains(['/', '\\']) || symbol.starts_with('.') {
            return Err(format!("invalid symbol {:?}", query.symbol));
        }

        let [json_path, csv_path] = self.candidates(symbol);
        let (path, rows) = if json_path.is_file() {
            let rows = load_json(&json_path)?;
            (json_path, rows)
        } else if csv_path.is_file() {
            let rows = load_csv(&csv_path)?;
            (csv_path, rows)
        } else {
            return Err(format!(
                "no bar file for {} under {} (looked for {}.json and {}.csv)",
                symbol,
                self.root.display(),
                symbol,
                symbol
            ));
        };

        tracing::debug!(symbol, path = %path.display(), rows = rows.len(), "loaded bar file");
        Ok(rows)
    }
}
