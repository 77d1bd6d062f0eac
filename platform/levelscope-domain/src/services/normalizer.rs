use crate::errors::LevelError;
use crate::value_objects::bar::{millis_for_date, Bar, MAX_PRICE};
use crate::value_objects::raw_bar::{RawBar, RawNumber};
use crate::value_objects::series::Series;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct NormalizationReport {
    pub input_rows: usize,
    pub duplicates: usize,
    pub out_of_order: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    pub first_duplicate: Option<i64>,
    pub first_out_of_order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub series: Series,
    pub report: NormalizationReport,
}

/// Parses raw records into a sorted, de-duplicated series.
///
/// Every field must parse; the first bad field aborts with
/// [`LevelError::MalformedBar`]. When two records share a date the later one
/// in input order wins.
pub fn normalize(raw: &[RawBar]) -> Result<NormalizedSeries, LevelError> {
    let bars = raw
        .iter()
        .enumerate()
        .map(|(index, record)| parse_bar(index, record))
        .collect::<Result<Vec<_>, _>>()?;
    normalize_bars(bars)
}

pub fn normalize_bars(bars: Vec<Bar>) -> Result<NormalizedSeries, LevelError> {
    let mut report = NormalizationReport {
        input_rows: bars.len(),
        ..NormalizationReport::default()
    };
    let mut bars_by_ts: BTreeMap<i64, Bar> = BTreeMap::new();
    let mut last_seen_ts: Option<i64> = None;

    for (index, bar) in bars.into_iter().enumerate() {
        validate_bar(index, &bar)?;
        let timestamp = bar.timestamp;

        if let Some(prev) = last_seen_ts {
            if timestamp < prev {
                report.out_of_order += 1;
                if report.first_out_of_order.is_none() {
                    report.first_out_of_order = Some(timestamp);
                }
            }
        }
        last_seen_ts = Some(timestamp);

        if bars_by_ts.insert(timestamp, bar).is_some() {
            report.duplicates += 1;
            if report.first_duplicate.is_none() {
                report.first_duplicate = Some(timestamp);
            }
        }
    }

    report.first_timestamp = bars_by_ts.keys().next().copied();
    report.last_timestamp = bars_by_ts.keys().next_back().copied();

    Ok(NormalizedSeries {
        series: Series::from_sorted(bars_by_ts.into_values().collect()),
        report,
    })
}

fn parse_bar(index: usize, raw: &RawBar) -> Result<Bar, LevelError> {
    let date = parse_date(&raw.date)
        .map_err(|reason| LevelError::malformed(index, "date", raw.date.clone(), reason))?;
    let volume = parse_field(index, "volume", &raw.volume)?;
    if volume < 0.0 {
        return Err(LevelError::malformed(
            index,
            "volume",
            raw.volume.display(),
            "volume must be non-negative",
        ));
    }
    // `u64::MAX as f64` is 2^64, one past the largest representable volume.
    let volume = volume.round();
    if volume >= u64::MAX as f64 {
        return Err(LevelError::malformed(
            index,
            "volume",
            raw.volume.display(),
            "volume out of supported range",
        ));
    }

    Ok(Bar {
        timestamp: millis_for_date(date),
        open: parse_field(index, "open", &raw.open)?,
        high: parse_field(index, "high", &raw.high)?,
        low: parse_field(index, "low", &raw.low)?,
        close: parse_field(index, "close", &raw.close)?,
        volume: volume as u64,
    })
}

fn parse_field(index: usize, field: &'static str, raw: &RawNumber) -> Result<f64, LevelError> {
    let value = raw
        .parse()
        .map_err(|reason| LevelError::malformed(index, field, raw.display(), reason))?;
    if !value.is_finite() {
        return Err(LevelError::malformed(
            index,
            field,
            raw.display(),
            "value is not finite",
        ));
    }
    Ok(value)
}

fn validate_bar(index: usize, bar: &Bar) -> Result<(), LevelError> {
    let prices = [
        ("open", bar.open),
        ("high", bar.high),
        ("low", bar.low),
        ("close", bar.close),
    ];
    for (field, value) in prices {
        if !value.is_finite() {
            return Err(LevelError::malformed(
                index,
                field,
                value.to_string(),
                "value is not finite",
            ));
        }
        if value < 0.0 {
            return Err(LevelError::malformed(
                index,
                field,
                value.to_string(),
                "price must be non-negative",
            ));
        }
        if value > MAX_PRICE {
            return Err(LevelError::malformed(
                index,
                field,
                value.to_string(),
                "price out of supported range",
            ));
        }
    }

    if !bar.ohlc_consistent() {
        return Err(LevelError::malformed(
            index,
            "high",
            format!(
                "o={} h={} l={} c={}",
                bar.open, bar.high, bar.low, bar.close
            ),
            "expected low <= min(open, close) <= max(open, close) <= high",
        ));
    }
    Ok(())
}

/// Calendar date of a bar. Datetimes with an offset keep their local date.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty date".to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%z") {
        return Ok(dt.date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.date());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.date());
    }

    Err(format!("unsupported date format: {trimmed}"))
}
