//! Feature extraction.
//!
//! Flattens a [`PatientRecord`] into the named features both decision paths
//! consume.

use triage_types::{well_known, FeatureSet, PatientRecord};

use crate::types::{EngineResult, TriageError};

/// Extracts the feature set for a record.
///
/// Emits the five vitals, age, the binary sex indicator, and one 0/1 entry per
/// symptom flag (base and extended). Total for any constructed record.
///
/// # Examples
///
/// ```
/// use triage_engine::extract;
/// use triage_types::{well_known, PatientRecord, Sex, Symptoms, VitalSigns};
///
/// let vitals = VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap();
/// let record = PatientRecord::new(vitals, 35, Sex::Male, Symptoms::default()).unwrap();
///
/// let features = extract(&record);
/// assert_eq!(features.get(well_known::SEX_MALE), Some(1.0));
/// assert_eq!(features.get(well_known::CHEST_PAIN), Some(0.0));
/// ```
pub fn extract(record: &PatientRecord) -> FeatureSet {
    let vitals = record.vitals();
    let mut features = FeatureSet::new();

    features.insert(well_known::SYSTOLIC, vitals.systolic());
    features.insert(well_known::DIASTOLIC, vitals.diastolic());
    features.insert(well_known::HEART_RATE, vitals.heart_rate());
    features.insert(well_known::OXYGEN_SATURATION, vitals.oxygen_saturation());
    features.insert(well_known::TEMPERATURE, vitals.temperature());
    features.insert(well_known::AGE, f64::from(record.age()));
    features.insert(well_known::SEX_MALE, record.sex().male_indicator());

    for (name, present) in record.symptoms().flags() {
        features.insert_flag(name, present);
    }

    features
}

/// Checks that every feature holds a finite value.
///
/// # Errors
/// Returns `MalformedFeature` for the first non-finite value, in name order.
pub fn check_finite(features: &FeatureSet) -> EngineResult<()> {
    match features.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(TriageError::MalformedFeature {
            name: name.to_string(),
            value,
        }),
        None => Ok(()),
    }
}

/// Helpers for reading required features.
pub mod read {
    use super::{EngineResult, FeatureSet, TriageError};

    /// Reads a required numeric feature.
    ///
    /// # Errors
    /// `MissingFeature` if absent, `MalformedFeature` if NaN or infinite.
    pub fn value(features: &FeatureSet, name: &str) -> EngineResult<f64> {
        let value = features.get(name).ok_or_else(|| TriageError::MissingFeature {
            name: name.to_string(),
        })?;
        if !value.is_finite() {
            return Err(TriageError::MalformedFeature {
                name: name.to_string(),
                value,
            });
        }
        Ok(value)
    }

    /// Reads a required 0/1 feature. Any non-zero value reads as present.
    pub fn flag(features: &FeatureSet, name: &str) -> EngineResult<bool> {
        value(features, name).map(|v| v != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_types::{Sex, Symptoms, VitalSigns};

    fn record(sex: Sex, symptoms: Symptoms) -> PatientRecord {
        let vitals = VitalSigns::new(150.0, 95.0, 105.0, 92.0, 38.5).unwrap();
        PatientRecord::new(vitals, 55, sex, symptoms).unwrap()
    }

    #[test]
    fn test_extract_contains_base_features() {
        let features = extract(&record(Sex::Male, Symptoms::default()));
        for name in well_known::BASE_FEATURES {
            assert!(features.contains(name), "missing {}", name);
        }
        // 7 numeric + 12 symptom flags
        assert_eq!(features.len(), 19);
    }

    #[test]
    fn test_extract_values() {
        let symptoms = Symptoms {
            chest_pain: true,
            seizures: true,
            ..Default::default()
        };
        let features = extract(&record(Sex::Female, symptoms));

        assert_eq!(features.get(well_known::SYSTOLIC), Some(150.0));
        assert_eq!(features.get(well_known::DIASTOLIC), Some(95.0));
        assert_eq!(features.get(well_known::AGE), Some(55.0));
        assert_eq!(features.get(well_known::SEX_MALE), Some(0.0));
        assert_eq!(features.get(well_known::CHEST_PAIN), Some(1.0));
        assert_eq!(features.get(well_known::SEIZURES), Some(1.0));
        assert_eq!(features.get(well_known::FEVER), Some(0.0));
    }

    #[test]
    fn test_other_sex_is_not_male() {
        let features = extract(&record(Sex::Other, Symptoms::default()));
        assert_eq!(features.get(well_known::SEX_MALE), Some(0.0));
    }

    #[test]
    fn test_read_helpers() {
        let mut features = FeatureSet::new();
        features.insert("a", 1.0);
        features.insert("nan", f64::NAN);

        assert_eq!(read::value(&features, "a").unwrap(), 1.0);
        assert!(read::flag(&features, "a").unwrap());
        assert!(matches!(
            read::value(&features, "b"),
            Err(TriageError::MissingFeature { .. })
        ));
        assert!(matches!(
            read::value(&features, "nan"),
            Err(TriageError::MalformedFeature { .. })
        ));
        assert!(check_finite(&features).is_err());
    }
}
