use crate::value_objects::bar::{Bar, WeeklyBar};
use crate::value_objects::level::Level;
use serde::Serialize;

pub const WEEKLY_LOOKBACK: usize = 26;
const SHADOW_TO_BODY_MAX: f64 = 0.3;
const DOJI_SHADOW_MAX: f64 = 0.01;
const NEAR_HIGH_RATIO: f64 = 0.98;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchKind {
    /// Opened below the level and closed above it.
    Breakout,
    /// Traded down to the level and closed above it.
    Bounce,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelTouch {
    pub kind: TouchKind,
    pub label: String,
    pub price: f64,
}

/// First level (in the given order) the bar's range touches with a breakout
/// or a bounce.
pub fn classify_touch(bar: &Bar, levels: &[Level]) -> Option<LevelTouch> {
    levels.iter().find_map(|level| {
        let price = level.price;
        if !(bar.low..=bar.high).contains(&price) {
            return None;
        }
        let kind = if bar.open < price && price < bar.close {
            TouchKind::Breakout
        } else if bar.close > price {
            TouchKind::Bounce
        } else {
            return None;
        };
        Some(LevelTouch {
            kind,
            label: level.label.clone(),
            price,
        })
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBreakout {
    pub week_start: i64,
    pub close: f64,
    pub highest_prior_high: f64,
    pub volume: u64,
    pub prior_volume: u64,
    pub volume_ratio: f64,
    pub change_percent: f64,
}

/// Strong green week closing at or near the prior half-year high on rising volume.
///
/// Needs at least [`WEEKLY_LOOKBACK`] weeks. The last week must be green with
/// an upper shadow under 30% of its body, close within 2% of (or above) the
/// highest high of the 25 weeks before it, and trade more volume than at
/// least one of the two previous weeks.
pub fn detect_weekly_breakout(weekly: &[WeeklyBar]) -> Option<WeeklyBreakout> {
    if weekly.len() < WEEKLY_LOOKBACK {
        return None;
    }
    let n = weekly.len();
    let last = &weekly[n - 1];
    let prev = &weekly[n - 2];
    let prev_prev = &weekly[n - 3];

    if !last.is_green() {
        return None;
    }

    let body = last.body();
    let short_shadow = if body > 0.0 {
        last.upper_shadow() < body * SHADOW_TO_BODY_MAX
    } else {
        last.upper_shadow() < DOJI_SHADOW_MAX
    };
    if !short_shadow {
        return None;
    }

    let highest_prior_high = weekly[n - WEEKLY_LOOKBACK..n - 1]
        .iter()
        .map(|week| week.high)
        .fold(f64::NEG_INFINITY, f64::max);
    if last.close < highest_prior_high * NEAR_HIGH_RATIO {
        return None;
    }

    if !(last.volume > prev.volume || last.volume > prev_prev.volume) {
        return None;
    }

    let prior_volume = prev.volume.max(prev_prev.volume);
    let volume_ratio = if prior_volume > 0 {
        last.volume as f64 / prior_volume as f64
    } else {
        1.0
    };
    let change_percent = if last.open > 0.0 {
        (last.close - last.open) / last.open * 100.0
    } else {
        0.0
    };

    Some(WeeklyBreakout {
        week_start: last.timestamp,
        close: last.close,
        highest_prior_high,
        volume: last.volume,
        prior_volume,
        volume_ratio,
        change_percent,
    })
}
