use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Cannot forecast from an empty series")]
    EmptySeries,

    #[error("Invalid window size: {0} (must be at least 1)")]
    InvalidWindow(usize),

    #[error("Invalid anomaly threshold: {0} (must be finite and non-negative)")]
    InvalidThreshold(f64),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
