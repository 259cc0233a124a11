//! In-memory patient store.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use super::{by_arrival, PatientStore, ProfileChange};
use crate::error::{StoreError, StoreResult};
use crate::profile::PatientProfile;

/// Patient store backed by a `HashMap` behind a `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    patients: RwLock<HashMap<Uuid, PatientProfile>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    pub fn len(&self) -> usize {
        self.patients.read().map(|p| p.len()).unwrap_or(0)
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PatientStore for InMemoryStore {
    fn save(&self, profile: &PatientProfile) -> StoreResult<()> {
        let mut patients = self.patients.write().map_err(|_| StoreError::Poisoned)?;
        patients.insert(profile.id, profile.clone());
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> StoreResult<Option<PatientProfile>> {
        let patients = self.patients.read().map_err(|_| StoreError::Poisoned)?;
        Ok(patients.get(&id).cloned())
    }

    fn get_all(&self) -> StoreResult<Vec<PatientProfile>> {
        let patients = self.patients.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<PatientProfile> = patients.values().cloned().collect();
        by_arrival(&mut all);
        Ok(all)
    }

    fn update(&self, profile: &PatientProfile) -> StoreResult<()> {
        let mut patients = self.patients.write().map_err(|_| StoreError::Poisoned)?;
        match patients.get_mut(&profile.id) {
            Some(slot) => {
                *slot = profile.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(profile.id)),
        }
    }

    fn modify(&self, id: Uuid, change: ProfileChange<'_>) -> StoreResult<PatientProfile> {
        let mut patients = self.patients.write().map_err(|_| StoreError::Poisoned)?;
        let slot = patients.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let mut changed = slot.clone();
        if change(&mut changed) {
            *slot = changed;
        }
        Ok(slot.clone())
    }

    fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut patients = self.patients.write().map_err(|_| StoreError::Poisoned)?;
        patients
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
