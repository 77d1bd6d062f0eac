use crate::value_objects::extremum::LegRange;
use crate::value_objects::level::{Level, LevelKind};
use serde::Serialize;

struct GannStep {
    degrees: u16,
    /// Quadrants past the low (calibrated) or square-root offset (fallback).
    step: f64,
    color: &'static str,
}

const CALIBRATED_STEPS: [GannStep; 3] = [
    GannStep {
        degrees: 180,
        step: 2.0,
        color: "#1976D2",
    },
    GannStep {
        degrees: 270,
        step: 3.0,
        color: "#7B1FA2",
    },
    GannStep {
        degrees: 360,
        step: 4.0,
        color: "#388E3C",
    },
];

const FALLBACK_STEPS: [GannStep; 3] = [
    GannStep {
        degrees: 180,
        step: 1.0,
        color: "#2196F3",
    },
    GannStep {
        degrees: 270,
        step: 1.5,
        color: "#9C27B0",
    },
    GannStep {
        degrees: 360,
        step: 2.0,
        color: "#4CAF50",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NoPeak,
    DegenerateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum GannPath {
    /// `delta` is `sqrt(peak) - sqrt(low)`, the square-root span of one 90° quadrant.
    Calibrated { delta: f64 },
    Fallback { scale: f64, reason: FallbackReason },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GannLevels {
    pub path: GannPath,
    pub levels: Vec<Level>,
}

/// Three Gann levels (180°, 270°, 360°) from the lowest low and the first peak.
///
/// With a usable low→peak leg the leg is taken as one 90° turn in square-root
/// space and projected two, three and four turns out. Without one, fixed
/// offsets are added to `sqrt(low * scale)`.
///
/// Levels are strictly increasing for lows in `[0, MAX_PRICE]`, the range the
/// normalizer admits.
///
/// [`MAX_PRICE`]: crate::value_objects::bar::MAX_PRICE
pub fn gann_levels(low: f64, peak: Option<f64>) -> GannLevels {
    let leg = match peak.map(|peak| LegRange::new(low, peak)) {
        Some(Ok(leg)) => leg,
        Some(Err(_)) => return fallback(low, FallbackReason::DegenerateRange),
        None => return fallback(low, FallbackReason::NoPeak),
    };
    calibrated(&leg).unwrap_or_else(|| fallback(low, FallbackReason::DegenerateRange))
}

/// `None` when the leg is too narrow to separate the three levels in f64.
fn calibrated(leg: &LegRange) -> Option<GannLevels> {
    let sqrt_low = leg.low().sqrt();
    let delta = leg.peak().sqrt() - sqrt_low;
    let levels: Vec<Level> = CALIBRATED_STEPS
        .iter()
        .map(|step| gann_level(step, (sqrt_low + step.step * delta).powi(2)))
        .collect();
    if !strictly_increasing(&levels) {
        return None;
    }
    Some(GannLevels {
        path: GannPath::Calibrated { delta },
        levels,
    })
}

fn strictly_increasing(levels: &[Level]) -> bool {
    levels.windows(2).all(|pair| pair[0].price < pair[1].price)
}

fn fallback(low: f64, reason: FallbackReason) -> GannLevels {
    let scale = fallback_scale(low);
    let sqrt_low = (low * scale).sqrt();
    let levels = FALLBACK_STEPS
        .iter()
        .map(|step| gann_level(step, (sqrt_low + step.step).powi(2) / scale))
        .collect();
    GannLevels {
        path: GannPath::Fallback { scale, reason },
        levels,
    }
}

/// Decimal shift that keeps the fixed square-root offsets meaningful for
/// cheap instruments. Tiers are `>= 1000`, `[100, 1000)` and below 100.
pub fn fallback_scale(low: f64) -> f64 {
    if low >= 1000.0 {
        1.0
    } else if low >= 100.0 {
        10.0
    } else {
        100.0
    }
}

fn gann_level(step: &GannStep, price: f64) -> Level {
    Level::new(
        LevelKind::Gann {
            degrees: step.degrees,
        },
        price,
        step.color,
        format!("Gann {}°", step.degrees),
    )
}

#[cfg(test)]
mod tests {
    use super::{fallback_scale, gann_levels, FallbackReason, GannPath};
    use crate::value_objects::bar::MAX_PRICE;
    use crate::value_objects::level::LevelKind;

    fn prices(low: f64, peak: Option<f64>) -> Vec<f64> {
        gann_levels(low, peak)
            .levels
            .iter()
            .map(|level| level.price)
            .collect()
    }

    #[test]
    fn calibrated_path_projects_quadrants() {
        let out = gann_levels(100.0, Some(121.0));
        assert!(matches!(out.path, GannPath::Calibrated { delta } if (delta - 1.0).abs() < 1e-12));
        let p = prices(100.0, Some(121.0));
        assert!((p[0] - 144.0).abs() < 1e-9);
        assert!((p[1] - 169.0).abs() < 1e-9);
        assert!((p[2] - 196.0).abs() < 1e-9);
        assert_eq!(out.levels[0].color, "#1976D2");
        assert_eq!(out.levels[2].label, "Gann 360°");
    }

    #[test]
    fn fallback_for_missing_peak_uses_scaled_offsets() {
        let out = gann_levels(10.0, None);
        assert_eq!(
            out.path,
            GannPath::Fallback {
                scale: 100.0,
                reason: FallbackReason::NoPeak
            }
        );
        assert!((out.levels[0].price - 10.64).abs() < 0.005);
        assert_eq!(out.levels[0].color, "#2196F3");
        assert_eq!(out.levels[1].kind, LevelKind::Gann { degrees: 270 });
    }

    #[test]
    fn peak_not_above_low_falls_back() {
        let out = gann_levels(50.0, Some(50.0));
        assert!(matches!(
            out.path,
            GannPath::Fallback {
                reason: FallbackReason::DegenerateRange,
                ..
            }
        ));
        assert_eq!(out.levels.len(), 3);
    }

    #[test]
    fn scale_tiers_follow_thresholds() {
        assert_eq!(fallback_scale(1000.0), 1.0);
        assert_eq!(fallback_scale(999.99), 10.0);
        assert_eq!(fallback_scale(100.0), 10.0);
        assert_eq!(fallback_scale(99.99), 100.0);
        assert_eq!(fallback_scale(0.0), 100.0);
    }

    #[test]
    fn levels_increase_in_both_paths() {
        for (low, peak) in [(0.0, None), (0.5, Some(0.6)), (2500.0, None), (40.0, Some(55.0))] {
            let p = prices(low, peak);
            assert!(p[0] < p[1] && p[1] < p[2], "low={low} peak={peak:?} -> {p:?}");
        }
    }

    #[test]
    fn levels_increase_at_the_largest_admitted_low() {
        let narrow_peak = MAX_PRICE + 0.125;
        for peak in [None, Some(narrow_peak)] {
            let p = prices(MAX_PRICE, peak);
            assert!(p[0] < p[1] && p[1] < p[2], "peak={peak:?} -> {p:?}");
        }
    }
}
