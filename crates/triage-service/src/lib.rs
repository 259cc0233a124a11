//! # triage-service
//!
//! Ward-level plumbing around the triage engine.
//!
//! This crate keeps patient profiles in a [`PatientStore`] (in memory or in a
//! JSON file), re-triages them through a
//! [`TriageAgent`](triage_engine::TriageAgent) whenever their data changes,
//! and answers queue and waiting-time queries through the [`WardService`].
//! Configuration is read from `TRIAGE_*` environment variables.

#![warn(missing_docs)]

mod config;
mod error;
mod profile;
pub mod store;
mod ward;

pub use config::{ServiceConfig, StrategyKind};
pub use error::{ConfigError, ServiceError, ServiceResult, StoreError, StoreResult};
pub use profile::PatientProfile;
pub use store::{InMemoryStore, JsonFileStore, PatientStore, ProfileChange};
pub use ward::{EmergencyStats, WaitingTimeStats, WardService, CRITICAL_SEVERITY};

// Re-export the engine for convenience
pub use triage_engine;
