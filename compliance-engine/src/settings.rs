//! Engine configuration
//!
//! Only the scoring knobs are tunable; rule conditions are fixed. Values
//! come from defaults, an optional file, then `COMPLIANCE__*` environment
//! variables, later sources overriding earlier ones:
//!
//! ```text
//! COMPLIANCE__SEVERITY_WEIGHTS__HIGH=5
//! COMPLIANCE__RISK_THRESHOLDS__MEDIUM=25
//! ```

use std::path::Path;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{ComplianceError, EngineResult};
use crate::models::{RiskLevel, Severity};

pub const ENV_PREFIX: &str = "COMPLIANCE";
pub const ENV_SEPARATOR: &str = "__";

/// Points each violation adds to the risk score, by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWeights {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            high: 3,
            medium: 2,
            low: 1,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Minimum score for each risk level; below `low` is [`RiskLevel::Minimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 30,
            medium: 20,
            low: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    pub severity_weights: SeverityWeights,
    pub risk_thresholds: RiskThresholds,
}

impl ComplianceConfig {
    /// Load configuration from an optional file plus the environment.
    ///
    /// The file format follows its extension (TOML, YAML or JSON).
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::ConfigSource`] when a source cannot be read
    /// or deserialized, and [`ComplianceError::Config`] when the merged
    /// values fail [`ComplianceConfig::validate`].
    pub fn load(path: Option<&Path>) -> EngineResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        tracing::debug!(
            weights = ?config.severity_weights,
            thresholds = ?config.risk_thresholds,
            "compliance configuration loaded"
        );
        Ok(config)
    }

    /// Defaults overridden by `COMPLIANCE__*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ComplianceConfig::load`].
    pub fn from_env() -> EngineResult<Self> {
        Self::load(None)
    }

    /// # Errors
    ///
    /// Returns [`ComplianceError::Config`] when every weight is zero or the
    /// thresholds are not strictly descending from high to low.
    pub fn validate(&self) -> EngineResult<()> {
        let w = &self.severity_weights;
        if w.high == 0 && w.medium == 0 && w.low == 0 {
            return Err(ComplianceError::Config(
                "severity weights are all zero; every run would score 0".to_string(),
            ));
        }

        let t = &self.risk_thresholds;
        if !(t.high > t.medium && t.medium > t.low) {
            return Err(ComplianceError::Config(format!(
                "risk thresholds must descend strictly: high={} medium={} low={}",
                t.high, t.medium, t.low
            )));
        }
        Ok(())
    }
}

impl RiskLevel {
    /// Classify a risk score; each threshold is inclusive.
    pub fn classify(score: u64, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.high {
            RiskLevel::High
        } else if score >= thresholds.medium {
            RiskLevel::Medium
        } else if score >= thresholds.low {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }
}
