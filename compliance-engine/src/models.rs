use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use field_resolver::Parsed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which upload a violation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    OpBilling,
    DoctorRoster,
}

impl Dataset {
    pub fn as_str(self) -> &'static str {
        match self {
            Dataset::OpBilling => "op_billing",
            Dataset::DoctorRoster => "doctor_roster",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violation severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a billing rule. Ordering follows the rule number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
}

impl RuleId {
    pub const ALL: [RuleId; 10] = [
        RuleId::R1,
        RuleId::R2,
        RuleId::R3,
        RuleId::R4,
        RuleId::R5,
        RuleId::R6,
        RuleId::R7,
        RuleId::R8,
        RuleId::R9,
        RuleId::R10,
    ];

    /// Severity is fixed by rule identity.
    pub fn severity(self) -> Severity {
        match self {
            RuleId::R9 => Severity::Medium,
            RuleId::R10 => Severity::Low,
            _ => Severity::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::R1 => "R1",
            RuleId::R2 => "R2",
            RuleId::R3 => "R3",
            RuleId::R4 => "R4",
            RuleId::R5 => "R5",
            RuleId::R6 => "R6",
            RuleId::R7 => "R7",
            RuleId::R8 => "R8",
            RuleId::R9 => "R9",
            RuleId::R10 => "R10",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleId::R1 => "Patient_ID present and unique per Visit_ID",
            RuleId::R2 => "Age between 0 and 120",
            RuleId::R3 => "Visit_Date not in the future",
            RuleId::R4 => "Doctor_ID present in doctor roster",
            RuleId::R5 => "Doctor license valid on visit date",
            RuleId::R6 => "Procedure_Code is OP100, OP200 or OP300",
            RuleId::R7 => "Total_Amount greater than 0 and at most 100000",
            RuleId::R8 => "OP300 requires patient consent",
            RuleId::R9 => "Doctor specialization matches procedure",
            RuleId::R10 => "Payer_Type is CASH, INSURANCE or GOVT",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub dataset: Dataset,
    /// 1-based row number in the analysis view
    pub row: usize,
    pub rule: RuleId,
    pub severity: Severity,
    pub reason: String,
}

impl Violation {
    /// Billing-row violation; severity comes from the rule.
    pub fn billing(row: usize, rule: RuleId, reason: impl Into<String>) -> Self {
        Self {
            dataset: Dataset::OpBilling,
            row,
            rule,
            severity: rule.severity(),
            reason: reason.into(),
        }
    }
}

/// Outpatient procedure code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcedureCode {
    /// General consultation
    Op100,
    /// Orthopedic procedure
    Op200,
    /// Cardiac procedure, consent required
    Op300,
    Other(String),
}

impl ProcedureCode {
    pub fn parse(raw: &str) -> Self {
        let code = raw.trim().to_uppercase();
        match code.as_str() {
            "OP100" => ProcedureCode::Op100,
            "OP200" => ProcedureCode::Op200,
            "OP300" => ProcedureCode::Op300,
            _ => ProcedureCode::Other(raw.trim().to_string()),
        }
    }

    pub fn is_approved(&self) -> bool {
        !matches!(self, ProcedureCode::Other(_))
    }

    /// Specialization a doctor must hold to bill this procedure.
    pub fn required_specialization(&self) -> Option<&'static str> {
        match self {
            ProcedureCode::Op100 => Some("General Medicine"),
            ProcedureCode::Op200 => Some("Orthopedics"),
            ProcedureCode::Op300 => Some("Cardiology"),
            ProcedureCode::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProcedureCode::Op100 => "OP100",
            ProcedureCode::Op200 => "OP200",
            ProcedureCode::Op300 => "OP300",
            ProcedureCode::Other(code) => code,
        }
    }
}

impl From<String> for ProcedureCode {
    fn from(raw: String) -> Self {
        ProcedureCode::parse(&raw)
    }
}

impl From<ProcedureCode> for String {
    fn from(code: ProcedureCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for ProcedureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient consent recorded for the visit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConsentFlag {
    Yes,
    No,
    Other(String),
}

impl ConsentFlag {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "Y" => ConsentFlag::Yes,
            "N" => ConsentFlag::No,
            _ => ConsentFlag::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConsentFlag::Yes => "Y",
            ConsentFlag::No => "N",
            ConsentFlag::Other(flag) => flag,
        }
    }
}

impl From<String> for ConsentFlag {
    fn from(raw: String) -> Self {
        ConsentFlag::parse(&raw)
    }
}

impl From<ConsentFlag> for String {
    fn from(flag: ConsentFlag) -> Self {
        flag.as_str().to_string()
    }
}

/// Who pays for the visit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PayerType {
    Cash,
    Insurance,
    Govt,
    Other(String),
}

impl PayerType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "CASH" => PayerType::Cash,
            "INSURANCE" => PayerType::Insurance,
            "GOVT" => PayerType::Govt,
            _ => PayerType::Other(raw.trim().to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, PayerType::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            PayerType::Cash => "CASH",
            PayerType::Insurance => "INSURANCE",
            PayerType::Govt => "GOVT",
            PayerType::Other(payer) => payer,
        }
    }
}

impl From<String> for PayerType {
    fn from(raw: String) -> Self {
        PayerType::parse(&raw)
    }
}

impl From<PayerType> for String {
    fn from(payer: PayerType) -> Self {
        payer.as_str().to_string()
    }
}

/// Canonical outpatient billing row
///
/// One per uploaded row, in upload order. Fields that could not be resolved
/// stay `None`/`Missing` rather than dropping the row. Serialized rows carry
/// plain values: unresolved age and visit date are `null`, an unresolved
/// amount is `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    #[serde(rename = "Visit_ID")]
    pub visit_id: Option<String>,
    #[serde(rename = "Patient_ID")]
    pub patient_id: Option<String>,
    #[serde(rename = "Patient_Name")]
    pub patient_name: Option<String>,
    #[serde(rename = "Doctor_ID")]
    pub doctor_id: Option<String>,
    #[serde(rename = "Doctor_Name")]
    pub doctor_name: Option<String>,
    #[serde(rename = "Age", with = "field_resolver::coerce::number_or_null", default)]
    pub age: Parsed<f64>,
    #[serde(rename = "Visit_Date", with = "field_resolver::coerce::value_or_null", default)]
    pub visit_date: Parsed<NaiveDate>,
    #[serde(rename = "Procedure_Code")]
    pub procedure_code: Option<ProcedureCode>,
    #[serde(rename = "Consent_Flag")]
    pub consent_flag: Option<ConsentFlag>,
    #[serde(rename = "Payer_Type")]
    pub payer_type: Option<PayerType>,
    #[serde(rename = "Total_Amount", with = "amount_or_zero", default)]
    pub total_amount: Parsed<Decimal>,
    #[serde(rename = "Payment_Status")]
    pub payment_status: Option<String>,
}

impl BillingRecord {
    /// Amount used for aggregates; unresolved amounts count as zero.
    pub fn amount_or_zero(&self) -> Decimal {
        self.total_amount.value().copied().unwrap_or(Decimal::ZERO)
    }
}

mod amount_or_zero {
    use field_resolver::Parsed;
    use rust_decimal::Decimal;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(amount: &Parsed<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let amount = amount.value().copied().unwrap_or(Decimal::ZERO);
        rust_decimal::serde::float::serialize(&amount, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Parsed<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        rust_decimal::serde::float::deserialize(deserializer).map(Parsed::Value)
    }
}

/// Canonical doctor roster row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecord {
    #[serde(rename = "Doctor_ID")]
    pub doctor_id: Option<String>,
    #[serde(rename = "Doctor_Name")]
    pub doctor_name: Option<String>,
    #[serde(rename = "Specialization")]
    pub specialization: Option<String>,
    #[serde(rename = "License_Expiry", with = "field_resolver::coerce::value_or_null", default)]
    pub license_expiry: Parsed<NaiveDate>,
    #[serde(rename = "Shift_Start")]
    pub shift_start: Option<String>,
    #[serde(rename = "Shift_End")]
    pub shift_end: Option<String>,
}

/// Violation count for one `(rule, severity)` group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rule: RuleId,
    pub severity: Severity,
    pub count: usize,
}

/// Violation totals per severity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Dashboard aggregates for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summaries {
    #[serde(with = "rust_decimal::serde::float")]
    pub average_amount: Decimal,
    pub payer_distribution: BTreeMap<String, usize>,
    pub violation_ranking: Vec<RankingEntry>,
    pub severity_counts: SeverityCounts,
}

/// Overall risk classification of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        })
    }
}

/// Outcome of one compliance run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub violations: Vec<Violation>,
    pub risk_score: u64,
    pub risk_level: RiskLevel,
    pub analysis_view: Vec<BillingRecord>,
    pub summaries: Summaries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_severities() {
        let high = RuleId::ALL.iter().filter(|r| r.severity() == Severity::High).count();
        assert_eq!(high, 8);
        assert_eq!(RuleId::R9.severity(), Severity::Medium);
        assert_eq!(RuleId::R10.severity(), Severity::Low);
    }

    #[test]
    fn test_rule_ordering_is_numeric() {
        assert!(RuleId::R2 < RuleId::R10);
        assert_eq!(RuleId::R10.to_string(), "R10");
    }

    #[test]
    fn test_procedure_code_parse() {
        assert_eq!(ProcedureCode::parse(" op300 "), ProcedureCode::Op300);
        assert_eq!(ProcedureCode::parse("OP999"), ProcedureCode::Other("OP999".into()));
        assert_eq!(ProcedureCode::Op200.required_specialization(), Some("Orthopedics"));
        assert!(!ProcedureCode::parse("X1").is_approved());
    }

    #[test]
    fn test_payer_and_consent_parse() {
        assert_eq!(PayerType::parse("insurance"), PayerType::Insurance);
        assert_eq!(PayerType::parse("Self"), PayerType::Other("Self".into()));
        assert_eq!(ConsentFlag::parse("y"), ConsentFlag::Yes);
        assert_eq!(ConsentFlag::parse("Yes"), ConsentFlag::Other("Yes".into()));
    }

    #[test]
    fn test_violation_serializes_as_contract() {
        let violation = Violation::billing(3, RuleId::R9, "mismatch");
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["dataset"], "op_billing");
        assert_eq!(json["rule"], "R9");
        assert_eq!(json["severity"], "MEDIUM");
        assert_eq!(json["row"], 3);
    }

    fn billing(age: Parsed<f64>, amount: Parsed<Decimal>) -> BillingRecord {
        BillingRecord {
            visit_id: Some("V1".into()),
            patient_id: Some("P1".into()),
            patient_name: None,
            doctor_id: Some("D1".into()),
            doctor_name: None,
            age,
            visit_date: Parsed::Invalid("someday".into()),
            procedure_code: Some(ProcedureCode::Op100),
            consent_flag: None,
            payer_type: Some(PayerType::Cash),
            total_amount: amount,
            payment_status: None,
        }
    }

    #[test]
    fn test_billing_record_serializes_plain_values() {
        let record = billing(Parsed::Value(40.0), Parsed::Value(Decimal::new(125_050, 2)));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Age"], 40);
        assert_eq!(json["Total_Amount"].as_f64(), Some(1250.5));
        assert!(json["Visit_Date"].is_null());
        assert_eq!(json["Procedure_Code"], "OP100");
    }

    #[test]
    fn test_billing_record_unresolved_amount_is_zero() {
        let record = billing(Parsed::Invalid("abc".into()), Parsed::Invalid("pending".into()));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["Age"].is_null());
        assert_eq!(json["Total_Amount"].as_f64(), Some(0.0));
    }

    #[test]
    fn test_average_amount_serializes_as_number() {
        let summaries = Summaries { average_amount: Decimal::from(250), ..Summaries::default() };
        let json = serde_json::to_value(&summaries).unwrap();
        assert_eq!(json["averageAmount"].as_f64(), Some(250.0));
    }

    #[test]
    fn test_procedure_code_serde_round_trip() {
        let json = serde_json::to_string(&ProcedureCode::Op100).unwrap();
        assert_eq!(json, "\"OP100\"");
        let back: ProcedureCode = serde_json::from_str("\"OP777\"").unwrap();
        assert_eq!(back, ProcedureCode::Other("OP777".into()));
    }
}
