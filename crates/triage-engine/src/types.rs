//! Engine-wide error and configuration types.

use thiserror::Error;
use triage_types::ValidationError;

/// Errors raised inside the triage engine.
///
/// Only [`TriageError::Validation`] is meant to reach callers of the triage
/// pipeline; every other variant is absorbed by the orchestrator and turned
/// into the fail-safe result.
#[derive(Error, Debug)]
pub enum TriageError {
    /// A feature required by a decision path is absent.
    #[error("missing feature: {name}")]
    MissingFeature {
        /// Name of the missing feature.
        name: String,
    },

    /// A feature holds a value that cannot be scored.
    #[error("malformed feature {name}: {value}")]
    MalformedFeature {
        /// Name of the malformed feature.
        name: String,
        /// The offending value.
        value: f64,
    },

    /// The learned classifier has not been trained or loaded.
    #[error("model unavailable: {reason}")]
    ModelUnavailable {
        /// Why the model cannot be used.
        reason: String,
    },

    /// Unexpected failure inside a scoring routine.
    #[error("scoring error: {0}")]
    Scoring(String),

    /// Training could not complete.
    #[error("training error: {0}")]
    Training(String),

    /// A dataset file has the wrong shape.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A record or value failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error reading or writing a dataset.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error reading or writing a dataset.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TriageError {
    /// Creates a `ModelUnavailable` error.
    pub fn model_unavailable(reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, TriageError>;

/// Configuration for the triage agent.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Append record-specific recommendations (ECG, imaging, ...) to the
    /// fixed per-category list.
    pub clinical_recommendations: bool,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            clinical_recommendations: true,
        }
    }
}

impl TriageConfig {
    /// Only the fixed per-category recommendations.
    pub fn base_profile() -> Self {
        Self {
            clinical_recommendations: false,
        }
    }
}

/// Configuration for fitting the learned classifier.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Share of each class held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the holdout split.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triage_config_default() {
        assert!(TriageConfig::default().clinical_recommendations);
        assert!(!TriageConfig::base_profile().clinical_recommendations);
    }

    #[test]
    fn test_training_config_default() {
        let config = TrainingConfig::default();
        assert!((config.test_fraction - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_error_display() {
        let err = TriageError::model_unavailable("not trained");
        assert_eq!(err.to_string(), "model unavailable: not trained");

        let err = TriageError::MissingFeature {
            name: "age".to_string(),
        };
        assert_eq!(err.to_string(), "missing feature: age");
    }
}
