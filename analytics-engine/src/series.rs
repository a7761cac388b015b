use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use field_resolver::{parse_date, resolve_number, resolve_text, Parsed, RawRecord};
use serde::{Deserialize, Serialize};

/// A dated observation; `date` is free text until parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePoint {
    pub date: String,
    pub value: f64,
}

impl DatePoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self { date: date.into(), value }
    }
}

/// One calendar month of a series, labelled `YYYY-MM`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub value: f64,
}

impl From<MonthlyPoint> for DatePoint {
    fn from(point: MonthlyPoint) -> Self {
        DatePoint::new(point.month, point.value)
    }
}

pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Sum values per calendar month, oldest first.
///
/// Points whose date does not parse are dropped. Months without data are
/// absent rather than zero-filled.
pub fn build_monthly_series(points: &[DatePoint]) -> Vec<MonthlyPoint> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut dropped = 0usize;

    for point in points {
        match parse_date(&point.date) {
            Some(date) => *buckets.entry((date.year(), date.month())).or_insert(0.0) += point.value,
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "points with unparseable dates left out of monthly series");
    }

    buckets
        .into_iter()
        .map(|((year, month), value)| MonthlyPoint {
            month: format!("{year:04}-{month:02}"),
            value,
        })
        .collect()
}

/// Monthly series straight from uploaded rows.
///
/// The date and value are located with the given header aliases; a value
/// that is missing or not numeric counts as zero.
pub fn monthly_series_from_records(
    rows: &[RawRecord],
    date_aliases: &[&str],
    value_aliases: &[&str],
) -> Vec<MonthlyPoint> {
    let points: Vec<DatePoint> = rows
        .iter()
        .filter_map(|row| {
            let date = resolve_text(row, date_aliases)?;
            let value = match resolve_number(row, value_aliases) {
                Parsed::Value(value) => value,
                Parsed::Missing | Parsed::Invalid(_) => 0.0,
            };
            Some(DatePoint { date, value })
        })
        .collect();
    build_monthly_series(&points)
}
