use crate::errors::LevelError;
use crate::value_objects::bar::millis_for_date;
use crate::value_objects::series::Series;
use chrono::Months;

/// Bars dated within `months` calendar months before the last bar, both ends inclusive.
pub fn trailing_window(series: &Series, months: u32) -> Result<Series, LevelError> {
    let Some(end) = series.last().and_then(|bar| bar.date()) else {
        return Ok(series.clone());
    };
    let start = end.checked_sub_months(Months::new(months)).ok_or_else(|| {
        LevelError::invalid_parameter("months", format!("{months} months before {end} is out of range"))
    })?;
    let start_ts = millis_for_date(start);

    let bars = series
        .bars()
        .iter()
        .filter(|bar| bar.timestamp >= start_ts)
        .cloned()
        .collect();
    Ok(Series::from_sorted(bars))
}

#[cfg(test)]
mod tests {
    use super::trailing_window;
    use crate::value_objects::bar::{millis_for_date, Bar};
    use crate::value_objects::series::Series;
    use chrono::NaiveDate;

    fn bar_on(y: i32, m: u32, d: u32) -> Bar {
        let date = NaiveDate::from_ymd_opt(y, m, d).expect("date");
        Bar {
            timestamp: millis_for_date(date),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1,
        }
    }

    #[test]
    fn keeps_six_calendar_months_inclusive() {
        let series = Series::from_bars(vec![
            bar_on(2024, 1, 30),
            bar_on(2024, 1, 31),
            bar_on(2024, 3, 15),
            bar_on(2024, 7, 31),
        ])
        .expect("series");
        let trimmed = trailing_window(&series, 6).expect("window");
        assert_eq!(trimmed.len(), 3);
        assert_eq!(
            trimmed.first().and_then(|b| b.date()),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }

    #[test]
    fn zero_months_keeps_last_day_only() {
        let series =
            Series::from_bars(vec![bar_on(2024, 1, 30), bar_on(2024, 1, 31)]).expect("series");
        assert_eq!(trailing_window(&series, 0).expect("window").len(), 1);
    }

    #[test]
    fn empty_stays_empty() {
        assert!(trailing_window(&Series::default(), 6)
            .expect("window")
            .is_empty());
    }
}
