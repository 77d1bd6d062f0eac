use crate::value_objects::extremum::Extrema;
use crate::value_objects::level::{Level, LevelKind, ReferenceLine};

const LOWEST_LOW_COLOR: &str = "blue";
const FIRST_PEAK_COLOR: &str = "orange";

/// Horizontal marker lines for the lowest low and, when found, the first peak.
pub fn reference_levels(extrema: &Extrema) -> Vec<Level> {
    let mut levels = vec![Level::new(
        LevelKind::Reference {
            line: ReferenceLine::LowestLow,
        },
        extrema.lowest_low.price,
        LOWEST_LOW_COLOR,
        "Lowest Low",
    )];
    if let Some(peak) = extrema.first_peak {
        levels.push(Level::new(
            LevelKind::Reference {
                line: ReferenceLine::FirstPeak,
            },
            peak.price,
            FIRST_PEAK_COLOR,
            "First Peak",
        ));
    }
    levels
}
