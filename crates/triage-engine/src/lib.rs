//! # triage-engine
//!
//! Risk classification core for emergency department triage.
//!
//! A [`PatientRecord`](triage_types::PatientRecord) is flattened into a
//! [`FeatureSet`](triage_types::FeatureSet) by [`extract`], decided by one
//! [`DecisionStrategy`] (the [`RuleEvaluator`] by default, or a trained
//! [`ClassifierAdapter`]), and packaged with recommendations by the
//! [`TriageAgent`]. [`severity_score`] is an independent 0–10 rubric for
//! ordering patients inside a category.
//!
//! ## Features
//!
//! - `parallel` (default): [`TriageAgent::process_batch`] runs on rayon.
//!
//! ## Usage
//!
//! ```rust
//! use triage_engine::{severity_score, TriageAgent};
//! use triage_types::{PatientRecord, RiskCategory, Sex, Symptoms, VitalSigns};
//!
//! let vitals = VitalSigns::new(200.0, 120.0, 140.0, 85.0, 40.0).unwrap();
//! let symptoms = Symptoms {
//!     chest_pain: true,
//!     breathing_difficulty: true,
//!     fever: true,
//!     ..Default::default()
//! };
//! let record = PatientRecord::new(vitals, 70, Sex::Female, symptoms).unwrap();
//!
//! let result = TriageAgent::rule_based().process(&record);
//! assert_eq!(result.category(), RiskCategory::Emergency);
//! assert!(result.confidence() >= 0.70);
//! assert_eq!(severity_score(&record), 10.0);
//! ```

#![warn(missing_docs)]

pub mod classifier;
pub mod dataset;
mod features;
pub mod generator;
pub mod metrics;
mod orchestrator;
mod recommend;
pub mod rules;
mod severity;
pub mod strategy;
mod types;

pub use classifier::{
    engineer, Classifier, ClassifierAdapter, GaussianNaiveBayes, LabeledSample, LearnedPrediction,
    StandardScaler, TrainingReport,
};
pub use features::{check_finite, extract, read};
pub use generator::{GeneratorConfig, RiskProfile, SyntheticGenerator, SyntheticPatient};
pub use metrics::ClassificationReport;
pub use orchestrator::{TriageAgent, FAIL_SAFE_CATEGORY, FAIL_SAFE_CONFIDENCE};
pub use recommend::{clinical_recommendations, recommend, MANUAL_EVALUATION};
pub use rules::{RuleAssessment, RuleEvaluator};
pub use severity::{is_emergency_case, severity_score, MAX_SEVERITY};
pub use strategy::{Decision, DecisionStrategy};
pub use types::{EngineResult, TrainingConfig, TriageConfig, TriageError};

// Re-export triage-types for convenience
pub use triage_types;
