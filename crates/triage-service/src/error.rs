//! Service error types.

use thiserror::Error;
use triage_engine::TriageError;
use triage_types::ValidationError;
use uuid::Uuid;

/// Errors raised by a [`PatientStore`](crate::PatientStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// No patient with this id.
    #[error("patient not found: {0}")]
    NotFound(Uuid),

    /// I/O error on the backing file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid patient JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors raised by the [`WardService`](crate::WardService).
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid patient data.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Engine failure outside the triage pipeline (training, data loading).
    #[error("engine error: {0}")]
    Engine(#[from] TriageError),
}

/// Errors reading [`ServiceConfig`](crate::ServiceConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable holds an unusable value.
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
