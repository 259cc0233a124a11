//! Medical history.

/// Chronic conditions treated as cardiac history.
pub const CARDIAC_CONDITIONS: &[&str] = &[
    "hypertension",
    "myocardial infarction",
    "arrhythmia",
    "angina",
    "heart failure",
    "valvular disease",
];

/// Chronic conditions treated as respiratory history.
pub const RESPIRATORY_CONDITIONS: &[&str] = &[
    "asthma",
    "copd",
    "pneumonia",
    "bronchitis",
    "emphysema",
    "pulmonary fibrosis",
];

/// Background medical history of a patient.
///
/// # Examples
///
/// ```
/// use triage_types::MedicalHistory;
///
/// let history = MedicalHistory {
///     chronic_conditions: vec!["Asthma".to_string()],
///     ..Default::default()
/// };
///
/// assert!(history.has_respiratory_history());
/// assert!(!history.has_cardiac_history());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MedicalHistory {
    /// Chronic conditions, free text.
    pub chronic_conditions: Vec<String>,
    /// Current medications.
    pub medications: Vec<String>,
    /// Known allergies.
    pub allergies: Vec<String>,
    /// Previous surgeries.
    pub previous_surgeries: Vec<String>,
}

impl MedicalHistory {
    /// Returns true if any chronic condition is a known cardiac condition.
    ///
    /// Matching is case-insensitive and on whole entries.
    pub fn has_cardiac_history(&self) -> bool {
        self.has_any(CARDIAC_CONDITIONS)
    }

    /// Returns true if any chronic condition is a known respiratory condition.
    pub fn has_respiratory_history(&self) -> bool {
        self.has_any(RESPIRATORY_CONDITIONS)
    }

    /// Returns true if the history counts toward the severity score.
    pub fn is_relevant(&self) -> bool {
        self.has_cardiac_history() || self.has_respiratory_history()
    }

    fn has_any(&self, conditions: &[&str]) -> bool {
        self.chronic_conditions.iter().any(|entry| {
            let entry = entry.trim();
            conditions.iter().any(|c| entry.eq_ignore_ascii_case(c))
        })
    }
}
