//! The billing rule catalog
//!
//! Each rule is a pure function of one billing row and the per-row
//! [`RuleContext`]. Rules never consult each other: cross-reference
//! resolution happens once, before any rule runs, and rules that need a
//! roster entry simply return `None` when the context has none.

use chrono::{DateTime, NaiveDate, Utc};
use field_resolver::Parsed;
use rust_decimal::Decimal;

use crate::index::CrossReferenceIndex;
use crate::models::{BillingRecord, ConsentFlag, DoctorRecord, ProcedureCode, RuleId, Violation};

pub const MIN_AGE: f64 = 0.0;
pub const MAX_AGE: f64 = 120.0;
/// Inclusive upper bound on a single bill.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Everything a rule may look at beyond the row itself
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub index: &'a CrossReferenceIndex,
    /// Roster entry for the row's doctor, when it resolved
    pub doctor: Option<&'a DoctorRecord>,
    /// Evaluation clock for the future-date check
    pub now: DateTime<Utc>,
}

impl<'a> RuleContext<'a> {
    /// Resolve the cross-references for one row.
    pub fn for_row(record: &BillingRecord, index: &'a CrossReferenceIndex, now: DateTime<Utc>) -> Self {
        let doctor = record.doctor_id.as_deref().and_then(|id| index.doctor(id));
        Self { index, doctor, now }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

/// Signature shared by every rule; `row` is the 1-based row number.
pub type RuleFn = fn(&BillingRecord, usize, &RuleContext<'_>) -> Option<Violation>;

/// All rules, in evaluation order.
pub const RULE_CATALOG: [(RuleId, RuleFn); 10] = [
    (RuleId::R1, check_patient_identity),
    (RuleId::R2, check_age),
    (RuleId::R3, check_visit_date),
    (RuleId::R4, check_doctor_exists),
    (RuleId::R5, check_doctor_license),
    (RuleId::R6, check_procedure_code),
    (RuleId::R7, check_amount),
    (RuleId::R8, check_consent),
    (RuleId::R9, check_specialization),
    (RuleId::R10, check_payer_type),
];

/// Run every rule against one row.
pub fn evaluate_row(record: &BillingRecord, row: usize, context: &RuleContext<'_>) -> Vec<Violation> {
    RULE_CATALOG
        .iter()
        .filter_map(|(_, rule)| rule(record, row, context))
        .collect()
}

/// Look up a single rule.
pub fn rule_fn(rule: RuleId) -> RuleFn {
    match rule {
        RuleId::R1 => check_patient_identity,
        RuleId::R2 => check_age,
        RuleId::R3 => check_visit_date,
        RuleId::R4 => check_doctor_exists,
        RuleId::R5 => check_doctor_license,
        RuleId::R6 => check_procedure_code,
        RuleId::R7 => check_amount,
        RuleId::R8 => check_consent,
        RuleId::R9 => check_specialization,
        RuleId::R10 => check_payer_type,
    }
}

/// R1: patient ID present, and the visit ID not shared between patients.
pub fn check_patient_identity(record: &BillingRecord, row: usize, context: &RuleContext<'_>) -> Option<Violation> {
    if record.patient_id.is_none() {
        return Some(Violation::billing(row, RuleId::R1, "Patient_ID is missing"));
    }

    let visit_id = record.visit_id.as_deref()?;
    let patients = context.index.patient_count(visit_id);
    (patients > 1).then(|| {
        Violation::billing(
            row,
            RuleId::R1,
            format!("Visit_ID {visit_id} is linked to {patients} different Patient_IDs"),
        )
    })
}

/// R2: age is a number within 0..=120. Fractional ages are accepted.
pub fn check_age(record: &BillingRecord, row: usize, _context: &RuleContext<'_>) -> Option<Violation> {
    let reason = match &record.age {
        Parsed::Value(age) if (MIN_AGE..=MAX_AGE).contains(age) => return None,
        Parsed::Value(age) => format!("Age {age} is outside {MIN_AGE}-{MAX_AGE}"),
        Parsed::Invalid(raw) => format!("Age '{raw}' is not a valid number"),
        Parsed::Missing => "Age is missing".to_string(),
    };
    Some(Violation::billing(row, RuleId::R2, reason))
}

/// R3: visit date not after the evaluation date. A missing date is not
/// flagged here; an unreadable one is.
pub fn check_visit_date(record: &BillingRecord, row: usize, context: &RuleContext<'_>) -> Option<Violation> {
    match &record.visit_date {
        Parsed::Value(date) if *date > context.today() => Some(Violation::billing(
            row,
            RuleId::R3,
            format!("Visit_Date {date} is in the future"),
        )),
        Parsed::Invalid(raw) => Some(Violation::billing(
            row,
            RuleId::R3,
            format!("Visit_Date '{raw}' is not a valid date"),
        )),
        Parsed::Value(_) | Parsed::Missing => None,
    }
}

/// R4: the billing doctor is on the roster.
pub fn check_doctor_exists(record: &BillingRecord, row: usize, context: &RuleContext<'_>) -> Option<Violation> {
    if context.doctor.is_some() {
        return None;
    }
    let reason = match &record.doctor_id {
        Some(id) => format!("Doctor_ID {id} not found in doctor roster"),
        None => "Doctor_ID is missing".to_string(),
    };
    Some(Violation::billing(row, RuleId::R4, reason))
}

/// R5: the doctor's license had not expired by the visit date. Skipped when
/// the doctor or the visit date is unresolved.
pub fn check_doctor_license(record: &BillingRecord, row: usize, context: &RuleContext<'_>) -> Option<Violation> {
    let doctor = context.doctor?;
    let visit_date = record.visit_date.value()?;
    let doctor_id = doctor.doctor_id.as_deref().unwrap_or_default();

    match &doctor.license_expiry {
        Parsed::Value(expiry) if expiry < visit_date => Some(Violation::billing(
            row,
            RuleId::R5,
            format!("Doctor {doctor_id} license expired on {expiry}, before visit on {visit_date}"),
        )),
        Parsed::Invalid(raw) => Some(Violation::billing(
            row,
            RuleId::R5,
            format!("Doctor {doctor_id} License_Expiry '{raw}' is not a valid date"),
        )),
        Parsed::Value(_) | Parsed::Missing => None,
    }
}

/// R6: procedure code is one of the approved outpatient codes.
pub fn check_procedure_code(record: &BillingRecord, row: usize, _context: &RuleContext<'_>) -> Option<Violation> {
    match &record.procedure_code {
        Some(code) if code.is_approved() => None,
        Some(code) => Some(Violation::billing(
            row,
            RuleId::R6,
            format!("Procedure_Code {code} is not an approved code"),
        )),
        None => Some(Violation::billing(row, RuleId::R6, "Procedure_Code is missing")),
    }
}

/// R7: amount within (0, 100000].
pub fn check_amount(record: &BillingRecord, row: usize, _context: &RuleContext<'_>) -> Option<Violation> {
    let reason = match &record.total_amount {
        Parsed::Value(amount) if *amount > Decimal::ZERO && *amount <= MAX_AMOUNT => return None,
        Parsed::Value(amount) => format!("Total_Amount {amount} is outside (0, {MAX_AMOUNT}]"),
        Parsed::Invalid(raw) => format!("Total_Amount '{raw}' is not a valid amount"),
        Parsed::Missing => "Total_Amount is missing".to_string(),
    };
    Some(Violation::billing(row, RuleId::R7, reason))
}

/// R8: cardiac procedures need recorded consent.
pub fn check_consent(record: &BillingRecord, row: usize, _context: &RuleContext<'_>) -> Option<Violation> {
    if record.procedure_code != Some(ProcedureCode::Op300) {
        return None;
    }
    match &record.consent_flag {
        Some(ConsentFlag::Yes) => None,
        Some(flag) => Some(Violation::billing(
            row,
            RuleId::R8,
            format!("OP300 performed without patient consent (Consent_Flag={})", flag.as_str()),
        )),
        None => Some(Violation::billing(
            row,
            RuleId::R8,
            "OP300 performed without patient consent (Consent_Flag missing)",
        )),
    }
}

/// R9: doctor's specialization fits the procedure. Skipped when the doctor
/// or the procedure is unresolved.
pub fn check_specialization(record: &BillingRecord, row: usize, context: &RuleContext<'_>) -> Option<Violation> {
    let doctor = context.doctor?;
    let procedure = record.procedure_code.as_ref()?;
    let required = procedure.required_specialization()?;
    let doctor_id = doctor.doctor_id.as_deref().unwrap_or_default();

    match context.index.specialization(doctor_id) {
        Some(actual) if actual.trim().eq_ignore_ascii_case(required) => None,
        Some(actual) => Some(Violation::billing(
            row,
            RuleId::R9,
            format!("{procedure} requires {required} but doctor {doctor_id} is {}", actual.trim()),
        )),
        None => Some(Violation::billing(
            row,
            RuleId::R9,
            format!("{procedure} requires {required} but doctor {doctor_id} has no specialization on record"),
        )),
    }
}

/// R10: payer is a recognized category. A missing payer is tallied as
/// `Unknown` in the summaries instead of being flagged.
pub fn check_payer_type(record: &BillingRecord, row: usize, _context: &RuleContext<'_>) -> Option<Violation> {
    let payer = record.payer_type.as_ref()?;
    (!payer.is_recognized()).then(|| {
        Violation::billing(
            row,
            RuleId::R10,
            format!("Payer_Type {} is not one of CASH, INSURANCE, GOVT", payer.as_str()),
        )
    })
}
