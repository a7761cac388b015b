use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// A value flagged as an outlier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Position in the input
    pub index: usize,
    pub value: f64,
    /// Signed distance from the mean in standard deviations
    pub z_score: f64,
}

/// Mean and population standard deviation of `values`.
pub fn mean_and_std_dev(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    Some((mean, variance.sqrt()))
}

/// Flag values more than `threshold` standard deviations from the mean.
///
/// Uses the population standard deviation. A series with no spread has no
/// anomalies.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidThreshold`] when `threshold` is negative
/// or not finite.
pub fn detect_anomalies(values: &[f64], threshold: f64) -> AnalyticsResult<Vec<Anomaly>> {
    if !threshold.is_finite() || threshold < 0.0 {
        tracing::warn!(threshold, "anomaly detection rejected: bad threshold");
        return Err(AnalyticsError::InvalidThreshold(threshold));
    }

    let Some((mean, std_dev)) = mean_and_std_dev(values) else {
        return Ok(Vec::new());
    };
    if std_dev <= f64::EPSILON {
        return Ok(Vec::new());
    }

    let anomalies: Vec<Anomaly> = values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let z_score = (value - mean) / std_dev;
            (z_score.abs() > threshold).then_some(Anomaly { index, value, z_score })
        })
        .collect();

    tracing::debug!(
        points = values.len(),
        flagged = anomalies.len(),
        mean,
        std_dev,
        "anomaly scan complete"
    );
    Ok(anomalies)
}
