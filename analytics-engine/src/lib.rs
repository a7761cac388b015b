//! Analytics over materialized upload rows
//!
//! Independent of the compliance rules; dashboards call these directly:
//! - Monthly time series from date/value pairs or raw records
//! - Autoregressive moving-average forecasts
//! - Z-score anomaly detection
//! - Group-by, top-N by sum and averages over alias-resolved fields
//!
//! # Example
//!
//! ```rust
//! use analytics_engine::{build_monthly_series, moving_average_forecast, DatePoint};
//!
//! let series = build_monthly_series(&[
//!     DatePoint::new("2024-01-05", 100.0),
//!     DatePoint::new("2024-01-20", 50.0),
//!     DatePoint::new("2024-02-03", 30.0),
//! ]);
//! assert_eq!(series[0].month, "2024-01");
//! assert_eq!(series[0].value, 150.0);
//!
//! let points: Vec<DatePoint> = series.into_iter().map(DatePoint::from).collect();
//! let forecast = moving_average_forecast(&points, 2, 1)?;
//! assert_eq!(forecast[0].date, "2024-03");
//! assert_eq!(forecast[0].value, 90.0);
//! # Ok::<(), analytics_engine::AnalyticsError>(())
//! ```

pub mod series;
pub mod forecast;
pub mod anomaly;
pub mod grouping;
pub mod error;

pub use series::*;
pub use forecast::*;
pub use anomaly::*;
pub use grouping::*;
pub use error::*;
