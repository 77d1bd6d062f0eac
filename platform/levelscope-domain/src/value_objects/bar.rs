use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Largest accepted price. Above it the fixed Gann offsets vanish in f64.
pub const MAX_PRICE: f64 = 1e15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Epoch milliseconds, UTC midnight of the bar's date.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Weekly bars share the daily shape; `timestamp` is the Sunday the week starts on.
pub type WeeklyBar = Bar;

impl Bar {
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp).map(|dt| dt.date_naive())
    }

    /// Days since 1970-01-01, floored for pre-epoch timestamps.
    pub fn epoch_day(&self) -> i64 {
        self.timestamp.div_euclid(MILLIS_PER_DAY)
    }

    pub fn is_green(&self) -> bool {
        self.close > self.open
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub(crate) fn ohlc_consistent(&self) -> bool {
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        self.low <= body_low && body_high <= self.high
    }
}

pub fn millis_for_date(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().timestamp_millis())
        .unwrap_or_default()
}
