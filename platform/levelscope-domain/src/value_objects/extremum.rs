use crate::errors::LevelError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub index: usize,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extrema {
    pub lowest_low: Extremum,
    pub first_peak: Option<Extremum>,
}

impl Extrema {
    pub fn peak_price(&self) -> Option<f64> {
        self.first_peak.map(|peak| peak.price)
    }
}

/// The low→peak leg the calibrated generators project from. Always `peak > low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegRange {
    low: f64,
    peak: f64,
}

impl LegRange {
    pub fn new(low: f64, peak: f64) -> Result<Self, LevelError> {
        if peak.partial_cmp(&low) != Some(Ordering::Greater) {
            return Err(LevelError::DegenerateRange { low, peak });
        }
        Ok(Self { low, peak })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn span(&self) -> f64 {
        self.peak - self.low
    }
}
