use chrono::{Months, NaiveDate};
use field_resolver::{parse_date, parse_year_month};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::series::{month_label, DatePoint};

/// Forecast `horizon` further points as the mean of the trailing `window`
/// values.
///
/// Each prediction joins the working series before the next step, so later
/// steps average over earlier predictions. With fewer than `window` points
/// the mean covers whatever exists.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptySeries`] for an empty series and
/// [`AnalyticsError::InvalidWindow`] for a window of zero.
pub fn moving_average_forecast(
    series: &[DatePoint],
    window: usize,
    horizon: usize,
) -> AnalyticsResult<Vec<DatePoint>> {
    if window == 0 {
        tracing::warn!(window, "forecast rejected: window must be at least 1");
        return Err(AnalyticsError::InvalidWindow(window));
    }
    let Some(last) = series.last() else {
        tracing::warn!("forecast rejected: empty series");
        return Err(AnalyticsError::EmptySeries);
    };

    let mut working: Vec<f64> = series.iter().map(|point| point.value).collect();
    let mut forecast = Vec::with_capacity(horizon);

    for step in 1..=horizon {
        let start = working.len().saturating_sub(window);
        let tail = working.get(start..).unwrap_or_default();
        #[allow(clippy::cast_precision_loss)]
        let prediction = tail.iter().sum::<f64>() / tail.len() as f64;

        working.push(prediction);
        forecast.push(DatePoint {
            date: next_label(&last.date, step),
            value: prediction,
        });
    }

    tracing::debug!(history = series.len(), window, horizon, "forecast computed");
    Ok(forecast)
}

/// Label for the point `step` periods after `last`.
///
/// `YYYY-MM` labels continue month by month, full dates advance by calendar
/// month, anything else becomes `<last>+step`.
pub fn next_label(last: &str, step: usize) -> String {
    let months = u32::try_from(step).ok().map(Months::new);

    if let (Some(month), Some(months)) = (parse_year_month(last), months) {
        if let Some(next) = month.checked_add_months(months) {
            return month_label(next);
        }
    }
    if let (Some(date), Some(months)) = (parse_date(last), months) {
        if let Some(next) = date.checked_add_months(months) {
            return format_date(next);
        }
    }
    format!("{}+{step}", last.trim())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[(&str, f64)]) -> Vec<DatePoint> {
        values.iter().map(|(d, v)| DatePoint::new(*d, *v)).collect()
    }

    #[test]
    fn test_mean_of_known_points() {
        let forecast = moving_average_forecast(&points(&[("m1", 10.0), ("m2", 20.0)]), 2, 1).unwrap();
        assert_eq!(forecast, vec![DatePoint::new("m2+1", 15.0)]);
    }

    #[test]
    fn test_forecast_feeds_on_itself() {
        let forecast = moving_average_forecast(&points(&[("m1", 10.0), ("m2", 20.0)]), 2, 3).unwrap();
        let values: Vec<f64> = forecast.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![15.0, 17.5, 16.25]);
    }

    #[test]
    fn test_short_history_uses_what_exists() {
        let forecast = moving_average_forecast(&points(&[("2024-01", 8.0)]), 5, 2).unwrap();
        assert_eq!(forecast[0], DatePoint::new("2024-02", 8.0));
        assert_eq!(forecast[1], DatePoint::new("2024-03", 8.0));
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        assert!(moving_average_forecast(&points(&[("m1", 1.0)]), 1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_requests() {
        assert_eq!(moving_average_forecast(&[], 2, 1), Err(AnalyticsError::EmptySeries));
        assert_eq!(
            moving_average_forecast(&points(&[("m1", 1.0)]), 0, 1),
            Err(AnalyticsError::InvalidWindow(0))
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(next_label("2024-11", 2), "2025-01");
        assert_eq!(next_label("2024-01-31", 1), "2024-02-29");
        assert_eq!(next_label("Q3", 1), "Q3+1");
    }
}
