use crate::value_objects::extremum::LegRange;
use crate::value_objects::level::{Level, LevelKind};

struct FibonacciStep {
    ratio: f64,
    percent: &'static str,
    color: &'static str,
}

const EXTENSIONS: [FibonacciStep; 4] = [
    FibonacciStep {
        ratio: 1.0,
        percent: "100%",
        color: "#FFD700",
    },
    FibonacciStep {
        ratio: 1.618,
        percent: "161.8%",
        color: "#FFA500",
    },
    FibonacciStep {
        ratio: 2.618,
        percent: "261.8%",
        color: "#FF8C00",
    },
    FibonacciStep {
        ratio: 4.236,
        percent: "423.6%",
        color: "#FF6347",
    },
];

/// Fibonacci extensions of the low→peak leg, or nothing when there is no
/// usable leg.
pub fn fibonacci_levels(low: f64, peak: Option<f64>) -> Vec<Level> {
    match peak.map(|peak| LegRange::new(low, peak)) {
        Some(Ok(leg)) => extension_levels(&leg),
        _ => Vec::new(),
    }
}

pub fn extension_levels(leg: &LegRange) -> Vec<Level> {
    EXTENSIONS
        .iter()
        .enumerate()
        .map(|(i, step)| {
            // 100% is the peak itself, not low + span * 1.0 with its rounding.
            let price = if i == 0 {
                leg.peak()
            } else {
                leg.low() + leg.span() * step.ratio
            };
            Level::new(
                LevelKind::Fibonacci { ratio: step.ratio },
                price,
                step.color,
                format!("Fibo {}", step.percent),
            )
        })
        .collect()
}
