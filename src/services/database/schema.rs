use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_tasks_table(conn)?;
    run_task_migrations(conn)?;
    create_subtasks_table(conn)?;
    create_app_state_table(conn)?;
    Ok(())
}

fn create_tasks_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            hour INTEGER NOT NULL,
            minute INTEGER NOT NULL DEFAULT 0,
            duration INTEGER NOT NULL DEFAULT 60
        )",
        [],
    )
    .context("Failed to create tasks table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date, position)",
        [],
    )
    .context("Failed to create tasks date index")?;

    Ok(())
}

fn run_task_migrations(conn: &Connection) -> Result<()> {
    // Early databases stored only a start hour and minute.
    migrations::ensure_column(
        conn,
        "tasks",
        "duration",
        "ALTER TABLE tasks ADD COLUMN duration INTEGER NOT NULL DEFAULT 60",
    )?;

    Ok(())
}

fn create_subtasks_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS subtasks (
            task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (task_id, position)
        )",
        [],
    )
    .context("Failed to create subtasks table")?;

    Ok(())
}

fn create_app_state_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create app_state table")?;

    Ok(())
}
