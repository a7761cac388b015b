use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Calendar date layouts seen in billing exports. Day-first wins over
/// month-first for ambiguous slash dates.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a date from any of the supported layouts.
///
/// Accepts plain dates, date-times (the time part is discarded), RFC 3339
/// timestamps (the date in the stated offset) and `YYYY-MM`, which maps to
/// the first day of that month.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return Some(date);
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(datetime.date());
    }

    parse_year_month(text)
}

/// `YYYY-MM` (or `YYYY/MM`) as the first of the month.
pub fn parse_year_month(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    let (year, month) = text.split_once('-').or_else(|| text.split_once('/'))?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date(" 2024/03/31 "), Some(ymd(2024, 3, 31)));
    }

    #[test]
    fn test_day_first_dates() {
        assert_eq!(parse_date("05/01/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("31-12-2023"), Some(ymd(2023, 12, 31)));
        assert_eq!(parse_date("13/02/2024"), Some(ymd(2024, 2, 13)));
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(parse_date("2024-02-10 08:30:00"), Some(ymd(2024, 2, 10)));
        assert_eq!(parse_date("2024-02-10T23:30:00+05:30"), Some(ymd(2024, 2, 10)));
        assert_eq!(parse_date("2024-02-10T08:30:00.250"), Some(ymd(2024, 2, 10)));
    }

    #[test]
    fn test_year_month() {
        assert_eq!(parse_date("2024-07"), Some(ymd(2024, 7, 1)));
        assert_eq!(parse_year_month("2024-13"), None);
        assert_eq!(parse_year_month("24-07"), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("m1"), None);
    }
}
