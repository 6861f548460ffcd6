//! Persistence boundary for the schedule.
//!
//! The session writes a full [`PersistedState`] snapshot after every
//! mutation; backends never see partial updates.

use std::path::Path;

use anyhow::Result;

use crate::models::schedule::PersistedState;
use crate::models::settings::StorageBackend;
use crate::services::database::SqliteScheduleStore;
use crate::services::snapshot::JsonScheduleStore;

/// Load and save the complete application state.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleStore {
    /// Read the stored state. A store with nothing in it yields the default
    /// (empty) state rather than an error.
    fn load(&self) -> Result<PersistedState>;

    /// Replace the stored state with `state`.
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// Open the backend selected in settings at `path`.
pub fn open_store(backend: StorageBackend, path: &Path) -> Result<Box<dyn ScheduleStore>> {
    log::info!("Opening {:?} schedule store at {}", backend, path.display());
    let store: Box<dyn ScheduleStore> = match backend {
        StorageBackend::Sqlite => Box::new(SqliteScheduleStore::open(path)?),
        StorageBackend::Json => Box::new(JsonScheduleStore::new(path)),
    };
    Ok(store)
}
