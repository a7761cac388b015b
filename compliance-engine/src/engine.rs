use chrono::{DateTime, Utc};
use field_resolver::{records_from_str, records_from_value, RawRecord};
use logger_redacted::PiiRedactor;
use serde_json::Value;
use tracing::{debug, info, info_span};

use crate::error::{ComplianceError, EngineResult};
use crate::index::CrossReferenceIndex;
use crate::models::{BillingRecord, ComplianceResult, DoctorRecord, RiskLevel, Violation};
use crate::rules::{evaluate_row, RuleContext};
use crate::scoring::risk_score;
use crate::settings::ComplianceConfig;
use crate::summaries::summarize;

/// Runs the rule catalog over a billing upload
///
/// Stateless between runs: the same inputs and clock always give the same
/// result.
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    config: ComplianceConfig,
    redactor: PiiRedactor,
}

impl ComplianceEngine {
    pub fn new(config: ComplianceConfig) -> Self {
        Self {
            config,
            redactor: PiiRedactor::default(),
        }
    }

    /// Use `redactor` for patient identifiers in log events.
    pub fn with_redactor(mut self, redactor: PiiRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    /// Evaluate raw uploads against the current clock.
    pub fn run(&self, billing: &[RawRecord], doctors: &[RawRecord]) -> ComplianceResult {
        self.run_at(billing, doctors, Utc::now())
    }

    /// Evaluate raw uploads with visit dates checked against `now`.
    pub fn run_at(&self, billing: &[RawRecord], doctors: &[RawRecord], now: DateTime<Utc>) -> ComplianceResult {
        let analysis_view: Vec<BillingRecord> = billing.iter().map(BillingRecord::from_raw).collect();
        let roster: Vec<DoctorRecord> = doctors.iter().map(DoctorRecord::from_raw).collect();
        self.evaluate(analysis_view, &roster, now)
    }

    /// Evaluate already-typed records. The returned analysis view is
    /// `analysis_view`, unchanged and in order.
    pub fn evaluate(
        &self,
        analysis_view: Vec<BillingRecord>,
        doctors: &[DoctorRecord],
        now: DateTime<Utc>,
    ) -> ComplianceResult {
        let span = info_span!(
            "compliance_run",
            billing_rows = analysis_view.len(),
            doctor_rows = doctors.len()
        );
        let _guard = span.enter();

        let index = CrossReferenceIndex::build(doctors, &analysis_view);
        debug!(
            doctors = index.doctor_count(),
            visits = index.visit_count(),
            "cross-reference index built"
        );

        let mut violations: Vec<Violation> = Vec::new();
        for (position, record) in analysis_view.iter().enumerate() {
            let row = position + 1;
            let context = RuleContext::for_row(record, &index, now);
            let found = evaluate_row(record, row, &context);
            for violation in &found {
                debug!(
                    row,
                    rule = %violation.rule,
                    severity = %violation.severity,
                    patient = %self.patient_token(record),
                    "violation recorded"
                );
            }
            violations.extend(found);
        }

        let risk_score = risk_score(&violations, &self.config.severity_weights);
        let risk_level = RiskLevel::classify(risk_score, &self.config.risk_thresholds);
        let summaries = summarize(&analysis_view, &violations);

        info!(
            violations = violations.len(),
            risk_score,
            risk_level = %risk_level,
            "compliance run complete"
        );

        ComplianceResult {
            violations,
            risk_score,
            risk_level,
            analysis_view,
            summaries,
        }
    }

    fn patient_token(&self, record: &BillingRecord) -> String {
        self.redactor
            .pseudonymize(record.patient_id.as_deref().unwrap_or_default())
    }
}

/// Evaluate raw uploads with the default configuration.
pub fn run_compliance(billing: &[RawRecord], doctors: &[RawRecord]) -> ComplianceResult {
    ComplianceEngine::default().run(billing, doctors)
}

/// Evaluate JSON payloads, each an array of row objects.
///
/// # Errors
///
/// Returns [`ComplianceError::InvalidInput`] when either payload is not an
/// array of objects.
pub fn run_compliance_json(billing: &Value, doctors: &Value) -> EngineResult<ComplianceResult> {
    let billing = records_from_value(billing)
        .map_err(|e| ComplianceError::InvalidInput(format!("billing rows: {e}")))?;
    let doctors = records_from_value(doctors)
        .map_err(|e| ComplianceError::InvalidInput(format!("doctor rows: {e}")))?;
    Ok(run_compliance(&billing, &doctors))
}

/// Evaluate JSON documents, each an array of row objects.
///
/// # Errors
///
/// Returns [`ComplianceError::Records`] when either document is not valid
/// JSON or not an array of objects.
pub fn run_compliance_str(billing: &str, doctors: &str) -> EngineResult<ComplianceResult> {
    let billing = records_from_str(billing)?;
    let doctors = records_from_str(doctors)?;
    Ok(run_compliance(&billing, &doctors))
}
