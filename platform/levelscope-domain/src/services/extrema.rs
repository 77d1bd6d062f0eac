use crate::errors::LevelError;
use crate::value_objects::bar::Bar;
use crate::value_objects::extremum::{Extrema, Extremum};
use crate::value_objects::series::Series;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeakSearch {
    /// Furthest number of bars past the low a peak may sit at. `None` scans to the end.
    pub max_lookahead: Option<usize>,
}

impl PeakSearch {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn within(bars: usize) -> Self {
        Self {
            max_lookahead: Some(bars),
        }
    }
}

pub fn detect_extrema(series: &Series, search: &PeakSearch) -> Result<Extrema, LevelError> {
    let lowest_low = lowest_low(series.bars())?;
    let first_peak = first_peak_after(series.bars(), lowest_low.index, search);
    Ok(Extrema {
        lowest_low,
        first_peak,
    })
}

/// Arg-min of `low`; ties keep the earliest bar.
pub fn lowest_low(bars: &[Bar]) -> Result<Extremum, LevelError> {
    let mut best: Option<Extremum> = None;
    for (index, bar) in bars.iter().enumerate() {
        match best {
            Some(current) if bar.low >= current.price => {}
            _ => {
                best = Some(Extremum {
                    index,
                    price: bar.low,
                })
            }
        }
    }
    best.ok_or(LevelError::EmptySeries)
}

/// First strict local maximum of `high` strictly after `low_index`.
///
/// The first and last bars can never qualify since they lack a neighbour.
/// The scan stops at the first match even if a higher peak follows.
pub fn first_peak_after(bars: &[Bar], low_index: usize, search: &PeakSearch) -> Option<Extremum> {
    if bars.len() < 3 {
        return None;
    }
    let start = low_index.saturating_add(1).max(1);
    let mut end = bars.len() - 2;
    if let Some(lookahead) = search.max_lookahead {
        end = end.min(low_index.saturating_add(lookahead));
    }

    (start..=end)
        .find(|&i| bars[i].high > bars[i - 1].high && bars[i].high > bars[i + 1].high)
        .map(|index| Extremum {
            index,
            price: bars[index].high,
        })
}
