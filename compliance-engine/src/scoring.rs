use crate::models::Violation;
use crate::settings::SeverityWeights;

/// Severity-weighted violation total.
///
/// A pure sum over the violation set: independent of order and with no cap,
/// so `0` means a clean run.
pub fn risk_score(violations: &[Violation], weights: &SeverityWeights) -> u64 {
    violations
        .iter()
        .map(|violation| u64::from(weights.weight(violation.severity)))
        .sum()
}
