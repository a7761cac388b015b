use std::collections::{BTreeSet, HashMap};

use crate::models::{BillingRecord, DoctorRecord};

/// Lookups spanning the two uploads
///
/// Built once per run before any rule executes: doctors by ID from the
/// roster, and the set of patients seen under each visit ID across the whole
/// billing upload.
#[derive(Debug, Clone, Default)]
pub struct CrossReferenceIndex {
    doctors_by_id: HashMap<String, DoctorRecord>,
    specialization_by_id: HashMap<String, String>,
    visit_patients: HashMap<String, BTreeSet<String>>,
}

/// IDs compare trimmed and case-insensitively: `d1 ` and `D1` are one doctor.
pub fn lookup_key(id: &str) -> String {
    id.trim().to_uppercase()
}

impl CrossReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index both uploads.
    pub fn build(doctors: &[DoctorRecord], billing: &[BillingRecord]) -> Self {
        let mut index = Self::from_roster(doctors);
        for record in billing {
            if let (Some(visit_id), Some(patient_id)) = (&record.visit_id, &record.patient_id) {
                index.record_visit(visit_id, patient_id);
            }
        }
        index
    }

    /// Index the roster. Duplicate doctor IDs: the last row wins.
    pub fn from_roster(doctors: &[DoctorRecord]) -> Self {
        let mut index = Self::new();
        for doctor in doctors {
            let Some(id) = doctor.doctor_id.as_deref() else {
                continue;
            };
            let key = lookup_key(id);
            match &doctor.specialization {
                Some(specialization) => {
                    index.specialization_by_id.insert(key.clone(), specialization.clone());
                }
                None => {
                    index.specialization_by_id.remove(&key);
                }
            }
            index.doctors_by_id.insert(key, doctor.clone());
        }
        index
    }

    /// Note that `patient_id` was billed under `visit_id`.
    pub fn record_visit(&mut self, visit_id: &str, patient_id: &str) {
        let visit = visit_id.trim();
        let patient = patient_id.trim();
        if visit.is_empty() || patient.is_empty() {
            return;
        }
        self.visit_patients
            .entry(visit.to_string())
            .or_default()
            .insert(patient.to_string());
    }

    pub fn doctor(&self, doctor_id: &str) -> Option<&DoctorRecord> {
        self.doctors_by_id.get(&lookup_key(doctor_id))
    }

    pub fn specialization(&self, doctor_id: &str) -> Option<&str> {
        self.specialization_by_id.get(&lookup_key(doctor_id)).map(String::as_str)
    }

    pub fn patients_for_visit(&self, visit_id: &str) -> Option<&BTreeSet<String>> {
        self.visit_patients.get(visit_id.trim())
    }

    /// Number of distinct patients billed under `visit_id`.
    pub fn patient_count(&self, visit_id: &str) -> usize {
        self.patients_for_visit(visit_id).map_or(0, BTreeSet::len)
    }

    pub fn doctor_count(&self) -> usize {
        self.doctors_by_id.len()
    }

    pub fn visit_count(&self) -> usize {
        self.visit_patients.len()
    }
}
