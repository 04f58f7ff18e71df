use std::convert::Infallible;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::backend::StorageBackend;
use super::StorageError;

/// Result of a read-modify-write closure: whether the collection needs writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<R> {
    Applied(R),
    Unchanged(R),
}

/// Ordered list of records persisted as a single JSON array.
///
/// Reads always go back to the authoritative copy; the mirror answers when
/// the file is missing or unreadable. Writes hold the lock for the whole
/// read-modify-write so concurrent requests cannot lose each other's updates.
pub struct JsonCollection<T> {
    name: &'static str,
    state: Mutex<CollectionState<T>>,
}

struct CollectionState<T> {
    backend: StorageBackend,
    mirror: Vec<T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// `seed` is what readers see until the backend holds something readable.
    pub fn open(name: &'static str, backend: StorageBackend, seed: Vec<T>) -> Self {
        Self {
            name,
            state: Mutex::new(CollectionState {
                backend,
                mirror: seed,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether writes are still reaching durable storage.
    pub fn is_durable(&self) -> bool {
        self.lock().backend.is_durable()
    }

    pub fn load(&self) -> Vec<T> {
        let mut state = self.lock();
        self.refresh(&mut state);
        state.mirror.clone()
    }

    /// Re-read, apply `change` to a working copy, and persist it when applied.
    ///
    /// An `Err` from `change` leaves both copies untouched.
    pub fn update<R, E>(
        &self,
        change: impl FnOnce(&mut Vec<T>) -> Result<Mutation<R>, E>,
    ) -> Result<R, E> {
        let mut state = self.lock();
        self.refresh(&mut state);

        let mut working = state.mirror.clone();
        match change(&mut working)? {
            Mutation::Unchanged(result) => Ok(result),
            Mutation::Applied(result) => {
                self.persist(&mut state, &working);
                state.mirror = working;
                Ok(result)
            }
        }
    }

    /// `update` for changes that cannot fail.
    pub fn modify<R>(&self, change: impl FnOnce(&mut Vec<T>) -> Mutation<R>) -> R {
        match self.update(|records| Ok::<_, Infallible>(change(records))) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    fn lock(&self) -> MutexGuard<'_, CollectionState<T>> {
        // A panic mid-update never leaves `mirror` half-written, so the data is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh(&self, state: &mut CollectionState<T>) {
        let Some(path) = state.backend.collection_path(self.name) else {
            return;
        };

        match read_records(&path) {
            Ok(Some(records)) => state.mirror = records,
            Ok(None) => {
                debug!(collection = self.name, "no stored file yet; serving defaults");
            }
            Err(err) => {
                warn!(
                    collection = self.name,
                    path = %path.display(),
                    error = %err,
                    "stored collection unreadable; serving in-memory copy"
                );
            }
        }
    }

    fn persist(&self, state: &mut CollectionState<T>, records: &[T]) {
        let Some(path) = state.backend.collection_path(self.name) else {
            return;
        };

        if let Err(err) = write_records(&path, records) {
            warn!(
                collection = self.name,
                path = %path.display(),
                error = %err,
                "storage unavailable; continuing with in-memory storage"
            );
            state.backend = StorageBackend::Memory;
        }
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, StorageError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_slice(&raw)?))
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let encoded = serde_json::to_vec_pretty(records)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, encoded)?;
    fs::rename(&staging, path)?;
    Ok(())
}
