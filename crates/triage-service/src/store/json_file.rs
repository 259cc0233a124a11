//! JSON file patient store.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use uuid::Uuid;

use super::{by_arrival, PatientStore, ProfileChange};
use crate::error::{StoreError, StoreResult};
use crate::profile::PatientProfile;

type Patients = BTreeMap<Uuid, PatientProfile>;

/// Patient store persisted as one JSON object keyed by patient id.
///
/// Every operation reads the file; writes rewrite it whole through a sibling
/// temporary file and a rename. A mutex serializes access within the process.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens a store at `path`, creating parent directories.
    ///
    /// The file itself is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        tracing::info!(path = %path.display(), "opened patient file store");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<Patients> {
        match File::open(&self.path) {
            Ok(file) => Ok(serde_json::from_reader(BufReader::new(file))?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Patients::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, patients: &Patients) -> StoreResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, patients)?;
        writer.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Runs `f` on the loaded patients under the lock; writes back when it
    /// reports a change.
    fn with_patients<T>(
        &self,
        f: impl FnOnce(&mut Patients) -> StoreResult<(T, bool)>,
    ) -> StoreResult<T> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut patients = self.load()?;
        let (value, dirty) = f(&mut patients)?;
        if dirty {
            if let Err(e) = self.write(&patients) {
                tracing::error!(path = %self.path.display(), error = %e, "failed to write patient file");
                return Err(e);
            }
        }
        Ok(value)
    }
}

impl PatientStore for JsonFileStore {
    fn save(&self, profile: &PatientProfile) -> StoreResult<()> {
        self.with_patients(|patients| {
            patients.insert(profile.id, profile.clone());
            Ok(((), true))
        })
    }

    fn get_by_id(&self, id: Uuid) -> StoreResult<Option<PatientProfile>> {
        self.with_patients(|patients| Ok((patients.remove(&id), false)))
    }

    fn get_all(&self) -> StoreResult<Vec<PatientProfile>> {
        self.with_patients(|patients| {
            let mut all: Vec<PatientProfile> = std::mem::take(patients).into_values().collect();
            by_arrival(&mut all);
            Ok((all, false))
        })
    }

    fn update(&self, profile: &PatientProfile) -> StoreResult<()> {
        self.with_patients(|patients| match patients.get_mut(&profile.id) {
            Some(slot) => {
                *slot = profile.clone();
                Ok(((), true))
            }
            None => Err(StoreError::NotFound(profile.id)),
        })
    }

    fn modify(&self, id: Uuid, change: ProfileChange<'_>) -> StoreResult<PatientProfile> {
        self.with_patients(|patients| {
            let slot = patients.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            let mut changed = slot.clone();
            let keep = change(&mut changed);
            if keep {
                *slot = changed;
            }
            Ok((slot.clone(), keep))
        })
    }

    fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.with_patients(|patients| match patients.remove(&id) {
            Some(_) => Ok(((), true)),
            None => Err(StoreError::NotFound(id)),
        })
    }
}
