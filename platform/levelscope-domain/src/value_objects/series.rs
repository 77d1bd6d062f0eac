use crate::errors::LevelError;
use crate::services::normalizer::normalize_bars;
use crate::value_objects::bar::Bar;
use serde::Serialize;

/// Daily bars in strictly ascending timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Validates, sorts and de-duplicates already typed bars.
    pub fn from_bars(bars: Vec<Bar>) -> Result<Self, LevelError> {
        normalize_bars(bars).map(|normalized| normalized.series)
    }

    pub(crate) fn from_sorted(bars: Vec<Bar>) -> Self {
        debug_assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Lowest low and highest high over the whole series.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let first = self.bars.first()?;
        Some(self.bars.iter().fold((first.low, first.high), |(lo, hi), bar| {
            (lo.min(bar.low), hi.max(bar.high))
        }))
    }
}
