//! Patient storage.
//!
//! [`PatientStore`] is the capability the ward service is built on. Two
//! backends are provided: [`InMemoryStore`] and [`JsonFileStore`].

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use triage_types::RiskCategory;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::profile::PatientProfile;

/// A change applied by [`PatientStore::modify`]; returning `false` discards it.
pub type ProfileChange<'a> = Box<dyn FnOnce(&mut PatientProfile) -> bool + 'a>;

/// Storage for patient profiles.
///
/// Listing methods return patients by arrival time, oldest first.
pub trait PatientStore: Send + Sync {
    /// Inserts or replaces a profile.
    fn save(&self, profile: &PatientProfile) -> StoreResult<()>;

    /// Looks up a profile.
    fn get_by_id(&self, id: Uuid) -> StoreResult<Option<PatientProfile>>;

    /// All stored profiles.
    fn get_all(&self) -> StoreResult<Vec<PatientProfile>>;

    /// Replaces an existing profile.
    ///
    /// # Errors
    /// `NotFound` if no profile has this id.
    fn update(&self, profile: &PatientProfile) -> StoreResult<()>;

    /// Applies `change` to a stored profile while holding the write lock, so
    /// concurrent modifications of one patient never overwrite each other.
    ///
    /// The changed profile is kept only when `change` returns `true`. Returns
    /// the profile as stored afterwards.
    ///
    /// # Errors
    /// `NotFound` if no profile has this id.
    fn modify(&self, id: Uuid, change: ProfileChange<'_>) -> StoreResult<PatientProfile>;

    /// Removes a profile.
    ///
    /// # Errors
    /// `NotFound` if no profile has this id.
    fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Profiles currently in `category`.
    fn get_by_category(&self, category: RiskCategory) -> StoreResult<Vec<PatientProfile>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|p| p.category == Some(category))
            .collect())
    }
}

fn by_arrival(profiles: &mut [PatientProfile]) {
    profiles.sort_by(|a, b| a.arrived_at.cmp(&b.arrived_at).then(a.id.cmp(&b.id)));
}
