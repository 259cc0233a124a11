//! Well-known feature names.
//!
//! These are the keys of a [`FeatureSet`](crate::FeatureSet). Both decision
//! paths look features up by these names, so they are part of the contract
//! between extraction and scoring.
//!
//! # Examples
//!
//! ```
//! use triage_types::well_known;
//!
//! assert_eq!(well_known::SYSTOLIC, "systolic");
//! assert_eq!(well_known::BASE_FEATURES.len(), 13);
//! ```

// =============================================================================
// Vital Signs
// =============================================================================

/// Systolic blood pressure (mmHg).
pub const SYSTOLIC: &str = "systolic";

/// Diastolic blood pressure (mmHg).
pub const DIASTOLIC: &str = "diastolic";

/// Heart rate (bpm).
pub const HEART_RATE: &str = "heart_rate";

/// Peripheral oxygen saturation (%).
pub const OXYGEN_SATURATION: &str = "oxygen_saturation";

/// Body temperature (°C).
pub const TEMPERATURE: &str = "temperature";

// =============================================================================
// Demographics
// =============================================================================

/// Age in whole years.
pub const AGE: &str = "age";

/// Binary sex indicator: 1 for male, 0 otherwise.
pub const SEX_MALE: &str = "sex_male";

// =============================================================================
// Symptoms (0/1)
// =============================================================================

/// Chest pain.
pub const CHEST_PAIN: &str = "chest_pain";
/// Breathing difficulty.
pub const BREATHING_DIFFICULTY: &str = "breathing_difficulty";
/// Fever.
pub const FEVER: &str = "fever";
/// Dizziness.
pub const DIZZINESS: &str = "dizziness";
/// Vomiting.
pub const VOMITING: &str = "vomiting";
/// Abdominal pain.
pub const ABDOMINAL_PAIN: &str = "abdominal_pain";
/// Seizures.
pub const SEIZURES: &str = "seizures";
/// Active bleeding.
pub const ACTIVE_BLEEDING: &str = "active_bleeding";
/// Loss of consciousness.
pub const LOSS_OF_CONSCIOUSNESS: &str = "loss_of_consciousness";
/// Severe headache.
pub const SEVERE_HEADACHE: &str = "severe_headache";
/// Extreme weakness.
pub const EXTREME_WEAKNESS: &str = "extreme_weakness";
/// Extreme pallor.
pub const EXTREME_PALLOR: &str = "extreme_pallor";

// =============================================================================
// Engineered Features
// =============================================================================

/// Mean arterial-style pressure: (systolic + 2 × diastolic) / 3.
pub const MEAN_PRESSURE: &str = "mean_pressure";

/// Shock-index-like ratio: heart rate / systolic pressure.
pub const SHOCK_INDEX: &str = "shock_index";

/// Age bucket: 0 (≤ 50), 1 (51–65), 2 (> 65).
pub const AGE_RISK: &str = "age_risk";

/// Count of critical symptoms (chest pain, breathing difficulty, fever).
pub const CRITICAL_SYMPTOMS: &str = "critical_symptoms";

// =============================================================================
// Feature Groups
// =============================================================================

/// The thirteen base features, in the column order used for model input.
pub const BASE_FEATURES: &[&str] = &[
    SYSTOLIC,
    DIASTOLIC,
    HEART_RATE,
    OXYGEN_SATURATION,
    TEMPERATURE,
    AGE,
    SEX_MALE,
    CHEST_PAIN,
    BREATHING_DIFFICULTY,
    FEVER,
    DIZZINESS,
    VOMITING,
    ABDOMINAL_PAIN,
];

/// Derived features appended to [`BASE_FEATURES`] before model input.
pub const ENGINEERED_FEATURES: &[&str] =
    &[MEAN_PRESSURE, SHOCK_INDEX, AGE_RISK, CRITICAL_SYMPTOMS];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_unique() {
        let mut all: Vec<&str> = BASE_FEATURES
            .iter()
            .chain(ENGINEERED_FEATURES.iter())
            .copied()
            .collect();
        let before = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), before);
    }
}
