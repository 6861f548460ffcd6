use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;

const IN_MEMORY: &str = ":memory:";

/// SQLite connection holding the schedule tables.
pub struct Database {
    conn: Connection,
    location: String,
}

impl Database {
    /// Open (or create) the database at `path`. `":memory:"` opens a
    /// private in-memory database.
    pub fn new(path: &str) -> Result<Self> {
        let conn = if path == IN_MEMORY {
            Connection::open_in_memory().context("Failed to open in-memory database")?
        } else {
            Connection::open(path).with_context(|| format!("Failed to open database at {}", path))?
        };

        // Subtask rows cascade with their task.
        conn.pragma_update(None, "foreign_keys", true)
            .context("Failed to enable foreign keys")?;
        conn.busy_timeout(Duration::from_secs(5))
            .context("Failed to set busy timeout")?;

        log::debug!("Opened schedule database at {}", path);
        Ok(Self {
            conn,
            location: path.to_string(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Path the database was opened from, or `":memory:"`.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Create the schedule tables and bring older files up to date.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(&self.conn)
    }
}
