//! Compliance Engine for outpatient billing audits
//!
//! Joins an outpatient billing upload against the doctor roster and
//! evaluates a fixed battery of billing rules:
//! - Patient identity and visit uniqueness (R1)
//! - Age, visit date and amount sanity (R2, R3, R7)
//! - Roster cross-checks: doctor exists, license valid, specialization fits (R4, R5, R9)
//! - Procedure catalog and consent (R6, R8)
//! - Payer classification (R10)
//!
//! Every run yields the violation list, a severity-weighted risk score, the
//! canonical per-row analysis view and summary aggregates. The engine is
//! total over its input: malformed fields become violations, never errors.
//!
//! # Example
//!
//! ```rust
//! use compliance_engine::{ComplianceEngine, RuleId};
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//!
//! let billing = vec![json!({
//!     "Visit_ID": "V1", "Patient_ID": "P1", "Age": 150, "Doctor_ID": "D9",
//!     "Procedure_Code": "OP999", "Payer_Type": "CASH", "Total_Amount": 500,
//!     "Consent_Flag": "N"
//! }).as_object().cloned().unwrap_or_default()];
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().unwrap_or_default();
//! let result = ComplianceEngine::default().run_at(&billing, &[], now);
//!
//! let rules: Vec<RuleId> = result.violations.iter().map(|v| v.rule).collect();
//! assert_eq!(rules, vec![RuleId::R2, RuleId::R4, RuleId::R6]);
//! assert_eq!(result.risk_score, 9);
//! ```

pub mod models;
pub mod fields;
pub mod index;
pub mod rules;
pub mod scoring;
pub mod summaries;
pub mod engine;
pub mod export;
pub mod settings;
pub mod error;

pub use models::*;
pub use index::*;
pub use rules::*;
pub use scoring::*;
pub use summaries::*;
pub use engine::*;
pub use export::*;
pub use settings::*;
pub use error::*;
