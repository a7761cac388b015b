//! Dashboard aggregates over one run

use std::collections::BTreeMap;

use itertools::Itertools;
use rust_decimal::Decimal;

use crate::models::{BillingRecord, RankingEntry, Severity, SeverityCounts, Summaries, Violation};

/// Bucket for rows whose payer could not be resolved
pub const UNKNOWN_PAYER: &str = "Unknown";

pub fn summarize(analysis_view: &[BillingRecord], violations: &[Violation]) -> Summaries {
    Summaries {
        average_amount: average_amount(analysis_view),
        payer_distribution: payer_distribution(analysis_view),
        violation_ranking: violation_ranking(violations),
        severity_counts: severity_counts(violations),
    }
}

/// Mean bill over the view, unresolved amounts counting as zero. `0` for an
/// empty view.
pub fn average_amount(records: &[BillingRecord]) -> Decimal {
    if records.is_empty() {
        return Decimal::ZERO;
    }
    let total = records
        .iter()
        .map(BillingRecord::amount_or_zero)
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount));
    total
        .checked_div(Decimal::from(records.len()))
        .unwrap_or(Decimal::ZERO)
}

/// Rows per payer. Recognized payers use their canonical name, others their
/// trimmed raw value.
pub fn payer_distribution(records: &[BillingRecord]) -> BTreeMap<String, usize> {
    records
        .iter()
        .map(|record| {
            record
                .payer_type
                .as_ref()
                .map_or(UNKNOWN_PAYER, |payer| payer.as_str())
                .to_string()
        })
        .counts()
        .into_iter()
        .collect()
}

/// Violations grouped by `(rule, severity)`, most frequent first; equal
/// counts keep rule-number order.
pub fn violation_ranking(violations: &[Violation]) -> Vec<RankingEntry> {
    let grouped: BTreeMap<_, usize> = violations
        .iter()
        .counts_by(|violation| (violation.rule, violation.severity))
        .into_iter()
        .collect();

    grouped
        .into_iter()
        .map(|((rule, severity), count)| RankingEntry { rule, severity, count })
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .collect()
}

pub fn severity_counts(violations: &[Violation]) -> SeverityCounts {
    violations
        .iter()
        .fold(SeverityCounts::default(), |mut counts, violation| {
            match violation.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PayerType, RuleId};
    use field_resolver::Parsed;

    fn bill(amount: Parsed<Decimal>, payer: Option<PayerType>) -> BillingRecord {
        BillingRecord {
            visit_id: None,
            patient_id: None,
            patient_name: None,
            doctor_id: None,
            doctor_name: None,
            age: Parsed::Missing,
            visit_date: Parsed::Missing,
            procedure_code: None,
            consent_flag: None,
            payer_type: payer,
            total_amount: amount,
            payment_status: None,
        }
    }

    #[test]
    fn test_average_amount_counts_unresolved_as_zero() {
        let records = vec![
            bill(Parsed::Value(Decimal::from(300)), None),
            bill(Parsed::Invalid("n/a".into()), None),
            bill(Parsed::Value(Decimal::from(600)), None),
        ];
        assert_eq!(average_amount(&records), Decimal::from(300));
        assert_eq!(average_amount(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_payer_distribution_buckets() {
        let records = vec![
            bill(Parsed::Missing, Some(PayerType::Cash)),
            bill(Parsed::Missing, Some(PayerType::parse("cash"))),
            bill(Parsed::Missing, Some(PayerType::parse(" Self "))),
            bill(Parsed::Missing, None),
        ];
        let distribution = payer_distribution(&records);
        assert_eq!(distribution.get("CASH"), Some(&2));
        assert_eq!(distribution.get("Self"), Some(&1));
        assert_eq!(distribution.get(UNKNOWN_PAYER), Some(&1));
        assert_eq!(distribution.values().sum::<usize>(), records.len());
    }

    #[test]
    fn test_ranking_sorted_by_count_then_rule() {
        let violations = vec![
            Violation::billing(1, RuleId::R10, "payer"),
            Violation::billing(2, RuleId::R2, "age"),
            Violation::billing(3, RuleId::R7, "amount"),
            Violation::billing(4, RuleId::R7, "amount"),
        ];
        let ranking = violation_ranking(&violations);
        let order: Vec<_> = ranking.iter().map(|e| (e.rule, e.count)).collect();
        assert_eq!(order, vec![(RuleId::R7, 2), (RuleId::R2, 1), (RuleId::R10, 1)]);
        assert_eq!(ranking[2].severity, Severity::Low);
    }

    #[test]
    fn test_severity_counts() {
        let violations = vec![
            Violation::billing(1, RuleId::R1, "id"),
            Violation::billing(1, RuleId::R9, "specialization"),
            Violation::billing(2, RuleId::R9, "specialization"),
        ];
        assert_eq!(severity_counts(&violations), SeverityCounts { high: 1, medium: 2, low: 0 });
    }

    #[test]
    fn test_empty_summaries() {
        assert_eq!(summarize(&[], &[]), Summaries::default());
    }
}
