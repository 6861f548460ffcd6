//! JSON file persistence for the schedule.
//!
//! Writes the whole [`PersistedState`] as one pretty-printed document.
//! Files written by early releases hold only a bare array of tasks for a
//! single day; those are migrated into today's bucket on load.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{self, Error as SerdeError, Value};

use crate::models::schedule::{PersistedState, TaskBuckets};
use crate::models::task::Task;
use crate::services::store::ScheduleStore;

/// [`ScheduleStore`] backed by a single JSON file.
pub struct JsonScheduleStore {
    path: PathBuf,
}

impl JsonScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for JsonScheduleStore {
    fn load(&self) -> Result<PersistedState> {
        let loaded = load_snapshot(&self.path, Local::now().date_naive())?;
        if loaded.migrated {
            log::info!("Migrated single-day task list in {}", self.path.display());
            if let Err(err) = save_snapshot(&self.path, &loaded.state) {
                log::warn!("Failed to rewrite migrated snapshot: {:#}", err);
            }
        }
        Ok(loaded.state)
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        save_snapshot(&self.path, state)
    }
}

/// A loaded snapshot and whether it came from the single-day format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSnapshot {
    pub state: PersistedState,
    pub migrated: bool,
}

/// Task shape used before tasks carried their own date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UndatedTask {
    id: u64,
    text: String,
    hour: u32,
    #[serde(default)]
    minute: u32,
    #[serde(default = "default_duration")]
    duration: u32,
    #[serde(default)]
    subtasks: Vec<String>,
    #[serde(default)]
    subtasks_completed: Vec<bool>,
}

fn default_duration() -> u32 {
    crate::models::task::DEFAULT_DURATION_MINUTES
}

impl UndatedTask {
    fn into_task(self, date: NaiveDate) -> Task {
        Task {
            id: self.id,
            text: self.text,
            date,
            hour: self.hour,
            minute: self.minute,
            duration: self.duration,
            subtasks: self.subtasks,
            subtasks_completed: self.subtasks_completed,
        }
    }
}

/// Read the snapshot at `path`. A missing file is the empty state.
///
/// `today` receives the tasks of a single-day legacy file.
pub fn load_snapshot(path: &Path, today: NaiveDate) -> Result<LoadedSnapshot> {
    if !path.exists() {
        return Ok(LoadedSnapshot {
            state: PersistedState::default(),
            migrated: false,
        });
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read schedule from {}", path.display()))?;
    let value: Value = serde_json::from_str(&data).map_err(|err| map_deser_error(err, path))?;

    if value.is_array() {
        let tasks: Vec<UndatedTask> =
            serde_json::from_value(value).map_err(|err| map_deser_error(err, path))?;
        let mut schedule = TaskBuckets::new();
        schedule.insert(
            today,
            tasks.into_iter().map(|task| task.into_task(today)).collect(),
        );
        return Ok(LoadedSnapshot {
            state: PersistedState {
                schedule,
                ..PersistedState::default()
            },
            migrated: true,
        });
    }

    let state = serde_json::from_value(value).map_err(|err| map_deser_error(err, path))?;
    Ok(LoadedSnapshot {
        state,
        migrated: false,
    })
}

pub fn save_snapshot(path: &Path, state: &PersistedState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }

    let data = serde_json::to_string_pretty(state)?;
    fs::write(path, data)
        .with_context(|| format!("failed to write schedule to {}", path.display()))?;
    Ok(())
}

fn map_deser_error(err: SerdeError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!(
        "failed to deserialize schedule from {}",
        path.display()
    ))
}
