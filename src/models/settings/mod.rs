// Settings module
// User configuration persisted as TOML

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/api/schedule-text";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the schedule snapshot is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Json,
}

/// View used when no `--week` / `--date` flags are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    Day,
    Week,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub interpreter_endpoint: String,
    pub request_timeout_secs: u64,
    pub storage_backend: StorageBackend,
    /// Overrides the platform data directory when set.
    pub data_path: Option<PathBuf>,
    pub default_view: DefaultView,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interpreter_endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_backend: StorageBackend::Sqlite,
            data_path: None,
            default_view: DefaultView::Day,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        let endpoint = self.interpreter_endpoint.trim();
        if endpoint.is_empty() {
            return Err("Interpreter endpoint cannot be empty".to_string());
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err("Interpreter endpoint must be an http(s) URL".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be at least 1 second".to_string());
        }
        Ok(())
    }

    /// File name used inside the data directory for the chosen backend.
    pub fn storage_file_name(&self) -> &'static str {
        match self.storage_backend {
            StorageBackend::Sqlite => "skej.db",
            StorageBackend::Json => "skej.json",
        }
    }
}
