use crate::value_objects::bar::{millis_for_date, Bar, WeeklyBar, MILLIS_PER_DAY};
use crate::value_objects::series::Series;
use chrono::NaiveDate;

pub const DEFAULT_MAX_WEEKS: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyWindow {
    pub max_weeks: usize,
    /// Daily bars dated after this day are left out.
    pub as_of: Option<NaiveDate>,
}

impl Default for WeeklyWindow {
    fn default() -> Self {
        Self {
            max_weeks: DEFAULT_MAX_WEEKS,
            as_of: None,
        }
    }
}

/// Sunday-aligned week start, as days since the epoch.
pub fn week_start_day(epoch_day: i64) -> i64 {
    // 1970-01-01 was a Thursday.
    let day_of_week = (epoch_day + 4).rem_euclid(7);
    epoch_day - day_of_week
}

/// Folds daily bars into Sunday-started weeks, keeping the most recent
/// `window.max_weeks`.
pub fn aggregate_weekly(series: &Series, window: &WeeklyWindow) -> Vec<WeeklyBar> {
    let cutoff_day = window
        .as_of
        .map(|date| millis_for_date(date).div_euclid(MILLIS_PER_DAY));

    let mut output: Vec<WeeklyBar> = Vec::new();
    let mut current_week: Option<i64> = None;
    let mut bucket: Option<Bar> = None;

    for bar in series.bars() {
        let day = bar.epoch_day();
        if cutoff_day.is_some_and(|cutoff| day > cutoff) {
            break;
        }
        let week = week_start_day(day);

        match current_week {
            Some(active) if active == week => {
                if let Some(ref mut agg) = bucket {
                    agg.high = agg.high.max(bar.high);
                    agg.low = agg.low.min(bar.low);
                    agg.close = bar.close;
                    agg.volume = agg.volume.saturating_add(bar.volume);
                }
            }
            _ => {
                if let Some(agg) = bucket.take() {
                    output.push(agg);
                }
                current_week = Some(week);
                bucket = Some(Bar {
                    timestamp: week * MILLIS_PER_DAY,
                    ..bar.clone()
                });
            }
        }
    }

    if let Some(agg) = bucket {
        output.push(agg);
    }

    let excess = output.len().saturating_sub(window.max_weeks);
    output.drain(..excess);
    output
}
