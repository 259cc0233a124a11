//! Patient profiles held by the ward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage_engine::{is_emergency_case, severity_score};
use triage_types::{
    MedicalHistory, PatientRecord, RiskCategory, Sex, Symptoms, TriageResult, ValidationError,
    VitalSigns,
};
use uuid::Uuid;

/// A patient in the department, from arrival to discharge.
///
/// Unlike [`PatientRecord`], a profile is mutable and may lack vital signs
/// (e.g. right after registration). The triage inputs are assembled on demand
/// by [`PatientProfile::record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Sex.
    pub sex: Sex,
    /// Arrival time.
    pub arrived_at: DateTime<Utc>,
    /// Reason for the visit.
    #[serde(default)]
    pub chief_complaint: String,
    /// Latest vital signs, if measured.
    #[serde(default)]
    pub vitals: Option<VitalSigns>,
    /// Reported symptoms.
    #[serde(default)]
    pub symptoms: Symptoms,
    /// Medical history.
    #[serde(default)]
    pub history: MedicalHistory,
    /// Current category; `None` until triaged or forced.
    #[serde(default)]
    pub category: Option<RiskCategory>,
    /// Most recent triage outcome.
    #[serde(default)]
    pub last_triage: Option<TriageResult>,
    /// Free-text clinical notes.
    #[serde(default)]
    pub notes: String,
}

impl PatientProfile {
    /// Creates a profile arriving now.
    ///
    /// # Errors
    /// `OutOfRange` if `age` exceeds [`PatientRecord::MAX_AGE`].
    pub fn new(name: impl Into<String>, age: u8, sex: Sex) -> Result<Self, ValidationError> {
        if age > PatientRecord::MAX_AGE {
            return Err(ValidationError::OutOfRange {
                field: "age",
                value: f64::from(age),
                min: 0.0,
                max: f64::from(PatientRecord::MAX_AGE),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age,
            sex,
            arrived_at: Utc::now(),
            chief_complaint: String::new(),
            vitals: None,
            symptoms: Symptoms::default(),
            history: MedicalHistory::default(),
            category: None,
            last_triage: None,
            notes: String::new(),
        })
    }

    /// Sets the chief complaint.
    pub fn with_complaint(mut self, complaint: impl Into<String>) -> Self {
        self.chief_complaint = complaint.into();
        self
    }

    /// Sets the arrival time.
    pub fn with_arrival(mut self, at: DateTime<Utc>) -> Self {
        self.arrived_at = at;
        self
    }

    /// The triage input for this patient, or `None` without vital signs.
    pub fn record(&self) -> Result<Option<PatientRecord>, ValidationError> {
        let Some(vitals) = self.vitals else {
            return Ok(None);
        };
        let record = PatientRecord::new(vitals, self.age, self.sex, self.symptoms)?
            .with_history(self.history.clone());
        Ok(Some(record))
    }

    /// Severity score; 0 without vital signs.
    pub fn severity(&self) -> f64 {
        match self.record() {
            Ok(Some(record)) => severity_score(&record),
            _ => 0.0,
        }
    }

    /// Whether vitals or symptoms call for emergency care; false without vitals.
    pub fn is_emergency_case(&self) -> bool {
        matches!(self.record(), Ok(Some(record)) if is_emergency_case(&record))
    }

    /// Queue priority: 1 highest, 3 lowest; `None` when untriaged.
    pub fn priority(&self) -> Option<u8> {
        self.category.map(RiskCategory::rank)
    }

    /// Target waiting time for the current category, in minutes.
    pub fn expected_wait_minutes(&self) -> Option<u32> {
        self.category.map(RiskCategory::expected_wait_minutes)
    }

    /// Minutes since arrival, as of `now`.
    pub fn waiting_minutes(&self, now: DateTime<Utc>) -> f64 {
        (now - self.arrived_at).num_seconds() as f64 / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn vitals() -> VitalSigns {
        VitalSigns::new(200.0, 120.0, 140.0, 85.0, 40.0).unwrap()
    }

    #[test]
    fn test_new_profile() {
        let profile = PatientProfile::new("Ana", 40, Sex::Female)
            .unwrap()
            .with_complaint("headache");
        assert_eq!(profile.chief_complaint, "headache");
        assert!(profile.record().unwrap().is_none());
        assert_eq!(profile.severity(), 0.0);
        assert!(!profile.is_emergency_case());
        assert_eq!(profile.priority(), None);

        assert!(PatientProfile::new("Old", 121, Sex::Male).is_err());
    }

    #[test]
    fn test_record_carries_history() {
        let mut profile = PatientProfile::new("Rui", 70, Sex::Male).unwrap();
        profile.vitals = Some(vitals());
        profile.history.chronic_conditions.push("asthma".to_string());

        let record = profile.record().unwrap().unwrap();
        assert!(record.history().has_respiratory_history());
        // 2 + 2 + 2 + 1 + 1 + 1 (history)
        assert_eq!(profile.severity(), 9.0);
        assert!(profile.is_emergency_case());
    }

    #[test]
    fn test_priority_and_wait() {
        let mut profile = PatientProfile::new("Lia", 30, Sex::Other).unwrap();
        profile.category = Some(RiskCategory::Urgent);
        assert_eq!(profile.priority(), Some(2));
        assert_eq!(profile.expected_wait_minutes(), Some(60));

        let now = profile.arrived_at + Duration::minutes(45);
        assert_eq!(profile.waiting_minutes(now), 45.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut profile = PatientProfile::new("Ana", 40, Sex::Female).unwrap();
        profile.vitals = Some(vitals());
        profile.symptoms.chest_pain = true;
        profile.category = Some(RiskCategory::Emergency);

        let json = serde_json::to_string(&profile).unwrap();
        let back: PatientProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
