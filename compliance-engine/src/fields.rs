//! Header aliases and the single normalization boundary from uploaded rows
//! to typed records. Rules never look at raw rows.

use field_resolver::{resolve_date, resolve_decimal, resolve_number, resolve_text, RawRecord};

use crate::models::{BillingRecord, ConsentFlag, DoctorRecord, PayerType, ProcedureCode};

pub const VISIT_ID: &[&str] = &["Visit_ID", "VisitID", "Visit_No", "Visit_Number", "Encounter_ID", "OP_ID"];
pub const PATIENT_ID: &[&str] = &["Patient_ID", "PatientID", "Patient_No", "UHID", "MRN"];
pub const PATIENT_NAME: &[&str] = &["Patient_Name", "PatientName", "Patient_Full_Name"];
pub const DOCTOR_ID: &[&str] = &["Doctor_ID", "DoctorID", "Doctor_Code", "Physician_ID", "Consultant_ID"];
pub const DOCTOR_NAME: &[&str] = &["Doctor_Name", "DoctorName", "Physician_Name", "Consultant_Name"];
pub const AGE: &[&str] = &["Age", "Patient_Age", "Age_Years"];
pub const VISIT_DATE: &[&str] = &["Visit_Date", "VisitDate", "Date_Of_Visit", "Service_Date", "Date"];
pub const PROCEDURE_CODE: &[&str] = &["Procedure_Code", "ProcedureCode", "Procedure", "Service_Code", "OP_Code"];
pub const CONSENT_FLAG: &[&str] = &["Consent_Flag", "ConsentFlag", "Consent", "Consent_Given"];
pub const PAYER_TYPE: &[&str] = &["Payer_Type", "PayerType", "Payer", "Payment_Mode", "Payment_Type"];
pub const TOTAL_AMOUNT: &[&str] = &["Total_Amount", "TotalAmount", "Amount", "Bill_Amount", "Net_Amount"];
pub const PAYMENT_STATUS: &[&str] = &["Payment_Status", "PaymentStatus", "Status"];

pub const ROSTER_DOCTOR_NAME: &[&str] = &["Doctor_Name", "DoctorName", "Physician_Name", "Name"];
pub const SPECIALIZATION: &[&str] = &["Specialization", "Specialisation", "Specialty", "Speciality", "Department"];
pub const LICENSE_EXPIRY: &[&str] = &[
    "License_Expiry",
    "Licence_Expiry",
    "License_Expiry_Date",
    "License_Valid_Till",
    "License_Exp",
];
pub const SHIFT_START: &[&str] = &["Shift_Start", "ShiftStart", "Shift_Start_Time", "Shift_From"];
pub const SHIFT_END: &[&str] = &["Shift_End", "ShiftEnd", "Shift_End_Time", "Shift_To"];

impl BillingRecord {
    /// Resolve an uploaded billing row. Never fails: unresolvable fields
    /// are left empty for the rules to flag.
    pub fn from_raw(row: &RawRecord) -> Self {
        Self {
            visit_id: resolve_text(row, VISIT_ID),
            patient_id: resolve_text(row, PATIENT_ID),
            patient_name: resolve_text(row, PATIENT_NAME),
            doctor_id: resolve_text(row, DOCTOR_ID),
            doctor_name: resolve_text(row, DOCTOR_NAME),
            age: resolve_number(row, AGE),
            visit_date: resolve_date(row, VISIT_DATE),
            procedure_code: resolve_text(row, PROCEDURE_CODE).map(|code| ProcedureCode::parse(&code)),
            consent_flag: resolve_text(row, CONSENT_FLAG).map(|flag| ConsentFlag::parse(&flag)),
            payer_type: resolve_text(row, PAYER_TYPE).map(|payer| PayerType::parse(&payer)),
            total_amount: resolve_decimal(row, TOTAL_AMOUNT),
            payment_status: resolve_text(row, PAYMENT_STATUS),
        }
    }
}

impl DoctorRecord {
    pub fn from_raw(row: &RawRecord) -> Self {
        Self {
            doctor_id: resolve_text(row, DOCTOR_ID),
            doctor_name: resolve_text(row, ROSTER_DOCTOR_NAME),
            specialization: resolve_text(row, SPECIALIZATION),
            license_expiry: resolve_date(row, LICENSE_EXPIRY),
            shift_start: resolve_text(row, SHIFT_START),
            shift_end: resolve_text(row, SHIFT_END),
        }
    }
}
