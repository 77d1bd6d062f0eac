use crate::value_objects::raw_bar::RawBar;

#[derive(Debug, Clone)]
pub struct BarQuery {
    pub symbol: String,
}

/// Source of already-fetched daily bars for one symbol.
pub trait MarketDataRepository {
    fn load_raw_bars(&self, query: &BarQuery) -> Result<Vec<RawBar>, String>;
}
