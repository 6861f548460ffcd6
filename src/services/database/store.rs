use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::Database;
use crate::models::schedule::{PersistedState, TaskBuckets};
use crate::models::task::Task;
use crate::services::store::ScheduleStore;

const COUNTER_KEY: &str = "task_counter";
const CONTEXT_KEY: &str = "context_text";

/// [`ScheduleStore`] backed by a SQLite database.
pub struct SqliteScheduleStore {
    db: Database,
}

impl SqliteScheduleStore {
    /// Open (or create) the database file at `path` and make sure the
    /// schema is current.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create dir {}", parent.display()))?;
            }
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", path.display()))?;
        Self::from_database(Database::new(path_str)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_database(Database::new(":memory:")?)
    }

    fn from_database(db: Database) -> Result<Self> {
        db.initialize_schema()?;
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn load(&self) -> Result<PersistedState> {
        let conn = self.db.connection();
        let mut schedule = load_tasks(conn)?;
        attach_subtasks(conn, &mut schedule)?;

        let counter = match read_state(conn, COUNTER_KEY)? {
            Some(value) => value
                .parse::<u64>()
                .with_context(|| format!("Invalid stored task counter '{}'", value))?,
            None => 0,
        };
        let context_text = read_state(conn, CONTEXT_KEY)?.unwrap_or_default();

        Ok(PersistedState {
            schedule,
            counter,
            context_text,
        })
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let tx = self
            .db
            .connection()
            .unchecked_transaction()
            .context("Failed to begin snapshot transaction")?;

        tx.execute("DELETE FROM subtasks", [])
            .context("Failed to clear subtasks")?;
        tx.execute("DELETE FROM tasks", [])
            .context("Failed to clear tasks")?;

        {
            let mut insert_task = tx.prepare(
                "INSERT INTO tasks (id, date, position, text, hour, minute, duration)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            let mut insert_subtask = tx.prepare(
                "INSERT INTO subtasks (task_id, position, text, completed)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for (date, tasks) in &state.schedule {
                for (position, task) in tasks.iter().enumerate() {
                    let id = i64::try_from(task.id)
                        .with_context(|| format!("Task id {} is too large to store", task.id))?;
                    let position = i64::try_from(position)
                        .with_context(|| format!("Position of task {} is too large to store", task.id))?;
                    insert_task
                        .execute(params![
                            id,
                            date,
                            position,
                            task.text,
                            task.hour,
                            task.minute,
                            task.duration,
                        ])
                        .with_context(|| format!("Failed to insert task {}", task.id))?;

                    for (index, text) in task.subtasks.iter().enumerate() {
                        let completed = task.subtasks_completed.get(index).copied().unwrap_or(false);
                        let index = i64::try_from(index).with_context(|| {
                            format!("Subtask index of task {} is too large to store", task.id)
                        })?;
                        insert_subtask
                            .execute(params![id, index, text, completed as i32])
                            .with_context(|| format!("Failed to insert subtask of task {}", task.id))?;
                    }
                }
            }
        }

        write_state(&tx, COUNTER_KEY, &state.counter.to_string())?;
        write_state(&tx, CONTEXT_KEY, &state.context_text)?;

        tx.commit().context("Failed to commit snapshot")?;
        Ok(())
    }
}

fn load_tasks(conn: &Connection) -> Result<TaskBuckets> {
    let mut stmt = conn.prepare(
        "SELECT id, date, text, hour, minute, duration
         FROM tasks ORDER BY date ASC, position ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Task {
            id: stored_id(row, 0)?,
            date: row.get::<_, NaiveDate>(1)?,
            text: row.get(2)?,
            hour: row.get(3)?,
            minute: row.get(4)?,
            duration: row.get(5)?,
            subtasks: Vec::new(),
            subtasks_completed: Vec::new(),
        })
    })?;

    let mut buckets = TaskBuckets::new();
    for task in rows {
        let task = task.context("Failed to read task row")?;
        buckets.entry(task.date).or_default().push(task);
    }
    Ok(buckets)
}

fn attach_subtasks(conn: &Connection, buckets: &mut TaskBuckets) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT task_id, text, completed FROM subtasks ORDER BY task_id ASC, position ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            stored_id(row, 0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i32>(2)? != 0,
        ))
    })?;

    let mut by_task: HashMap<u64, Vec<(String, bool)>> = HashMap::new();
    for row in rows {
        let (task_id, text, completed) = row.context("Failed to read subtask row")?;
        by_task.entry(task_id).or_default().push((text, completed));
    }

    for task in buckets.values_mut().flatten() {
        if let Some(entries) = by_task.remove(&task.id) {
            let (subtasks, completed): (Vec<String>, Vec<bool>) = entries.into_iter().unzip();
            task.subtasks = subtasks;
            task.subtasks_completed = completed;
        }
    }
    Ok(())
}

/// Read a task id column, rejecting negative values.
fn stored_id(row: &rusqlite::Row<'_>, column: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(column)?;
    u64::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(column, value))
}

fn read_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM app_state WHERE key = ?1", [key], |row| row.get(0))
        .optional()
        .with_context(|| format!("Failed to read app state '{}'", key))
}

fn write_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )
    .with_context(|| format!("Failed to write app state '{}'", key))?;
    Ok(())
}
