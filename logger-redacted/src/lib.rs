//! Structured logging with PHI redaction
//!
//! Billing uploads carry patient identifiers and names. Anything the engines
//! log about an individual row goes through [`PiiRedactor`] first so the log
//! stream never holds raw PHI, while a stable pseudonym still lets an
//! operator correlate lines that concern the same patient.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{LoggerConfig, PiiRedactor};
//!
//! let config = LoggerConfig::default();
//! let redactor = PiiRedactor::from_config(&config);
//!
//! let token = redactor.pseudonymize("P-000123");
//! assert!(token.starts_with("PHI["));
//! assert_eq!(token, redactor.pseudonymize("P-000123"));
//!
//! let line = redactor.redact("contact jane.doe@example.com or 555-123-4567");
//! assert!(!line.contains("jane.doe"));
//! ```
//!
//! Installing the global subscriber is left to the binary or test harness:
//!
//! ```rust,no_run
//! logger_redacted::init_logging(&logger_redacted::LoggerConfig::default())
//!     .unwrap_or_else(|e| eprintln!("logging disabled: {e}"));
//! ```

pub mod config;
pub mod redactor;
pub mod subscriber;
pub mod error;

pub use config::*;
pub use redactor::*;
pub use subscriber::*;
pub use error::*;
