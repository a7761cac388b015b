use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggerConfig;
use crate::error::{LoggerError, LoggerResult};

/// Build the event filter: `RUST_LOG` when set, else the configured level.
///
/// # Errors
///
/// Returns [`LoggerError::InvalidFilter`] when the configured level is not a
/// valid filter directive.
pub fn build_filter(config: &LoggerConfig) -> LoggerResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|e| LoggerError::InvalidFilter {
        filter: config.log_level.clone(),
        reason: e.to_string(),
    })
}

/// Install the global tracing subscriber.
///
/// JSON output is meant for log shippers; the plain format is for local runs.
///
/// # Errors
///
/// Returns [`LoggerError::InvalidFilter`] for a bad level and
/// [`LoggerError::AlreadyInitialized`] when a global subscriber exists.
pub fn init_logging(config: &LoggerConfig) -> LoggerResult<()> {
    let filter = build_filter(config)?;

    let installed = if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_level(true),
            )
            .try_init()
    };

    installed.map_err(|_| LoggerError::AlreadyInitialized)?;
    tracing::debug!(
        level = %config.log_level,
        json = config.json_output,
        redaction = config.redaction_enabled,
        "logging initialised"
    );
    Ok(())
}
