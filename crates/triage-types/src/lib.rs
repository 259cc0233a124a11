//! # triage-types
//!
//! Type definitions for emergency department triage.
//!
//! This crate provides the validated patient record consumed by the triage
//! core, the feature mapping both decision paths read, the three-level risk
//! category, and the immutable triage result.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Deserialization runs the same range checks as the constructors.
//!
//! ## Usage
//!
//! ```rust
//! use triage_types::{PatientRecord, RiskCategory, Sex, Symptoms, VitalSigns};
//!
//! let vitals = VitalSigns::new(200.0, 120.0, 140.0, 85.0, 40.0).unwrap();
//! let symptoms = Symptoms {
//!     chest_pain: true,
//!     breathing_difficulty: true,
//!     ..Default::default()
//! };
//! let record = PatientRecord::new(vitals, 70, Sex::Female, symptoms).unwrap();
//!
//! assert_eq!(record.symptoms().red_flags().len(), 2);
//! assert!(RiskCategory::Emergency < RiskCategory::Urgent);
//! ```

#![warn(missing_docs)]

mod category;
mod error;
mod features;
pub mod history;
mod record;
mod result;
mod symptoms;
mod vitals;
pub mod well_known;

// Re-export all public types at crate root
pub use category::RiskCategory;
pub use error::ValidationError;
pub use features::FeatureSet;
pub use history::MedicalHistory;
pub use record::{PatientRecord, Sex};
pub use result::{DecisionPath, TriageResult};
pub use symptoms::Symptoms;
pub use vitals::{ValidRange, VitalSigns};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _category = RiskCategory::NonUrgent;
        let _path = DecisionPath::Rules;
        let _sex = Sex::Other;
        let _features = FeatureSet::new();
        let _range = VitalSigns::SYSTOLIC_RANGE;
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let vitals = VitalSigns::new(150.0, 95.0, 105.0, 92.0, 38.5).unwrap();
        let symptoms = Symptoms {
            chest_pain: true,
            fever: true,
            abdominal_pain: true,
            ..Default::default()
        };
        let record = PatientRecord::new(vitals, 55, Sex::Male, symptoms)
            .unwrap()
            .with_history(MedicalHistory {
                chronic_conditions: vec!["hypertension".to_string()],
                ..Default::default()
            });

        let json = serde_json::to_string(&record).unwrap();
        let parsed: PatientRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
