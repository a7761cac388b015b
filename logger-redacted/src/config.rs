// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit newline-delimited JSON instead of human-readable lines
    pub json_output: bool,
    /// Pseudonymise identifiers and scrub free text before logging
    pub redaction_enabled: bool,
    /// Mixed into pseudonym hashes so tokens are not a bare digest of the ID
    pub correlation_salt: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_output: false,
            redaction_enabled: true,
            correlation_salt: None,
        }
    }
}
