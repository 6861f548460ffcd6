use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

/// Environment variable that overrides `interpreter_endpoint`.
pub const ENDPOINT_ENV_VAR: &str = "SKEJ_ENDPOINT";

const SETTINGS_FILE: &str = "settings.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "skej", "skej")
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service for `settings.toml` in the platform config directory,
    /// falling back to the working directory.
    pub fn from_default_location() -> Self {
        match project_dirs() {
            Some(dirs) => Self::new(dirs.config_dir().join(SETTINGS_FILE)),
            None => {
                log::warn!("Unable to resolve project directory; using current dir for settings");
                Self::new(SETTINGS_FILE)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings from disk, apply environment overrides and validate.
    ///
    /// A missing file yields the defaults.
    pub fn get(&self) -> Result<Settings> {
        let mut settings = self.read_file()?;
        apply_endpoint_override(&mut settings, std::env::var(ENDPOINT_ENV_VAR).ok());
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;
        Ok(settings)
    }

    /// Validate and write `settings`, creating the config directory if needed.
    pub fn update(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create dir {}", parent.display()))?;
            }
        }

        let data = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        log::info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    fn read_file(&self) -> Result<Settings> {
        if !self.path.exists() {
            log::debug!("No settings at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("failed to parse settings in {}", self.path.display()))
    }
}

fn apply_endpoint_override(settings: &mut Settings, value: Option<String>) {
    if let Some(endpoint) = value.filter(|v| !v.trim().is_empty()) {
        log::debug!("Using interpreter endpoint from {}", ENDPOINT_ENV_VAR);
        settings.interpreter_endpoint = endpoint;
    }
}

/// Directory holding the schedule data for `settings`.
pub fn data_dir(settings: &Settings) -> PathBuf {
    if let Some(path) = &settings.data_path {
        return path.clone();
    }
    match project_dirs() {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => {
            log::warn!("Unable to resolve project directory; using current dir for data");
            PathBuf::from(".")
        }
    }
}

/// Full path of the storage file for the configured backend.
pub fn storage_path(settings: &Settings) -> PathBuf {
    data_dir(settings).join(settings.storage_file_name())
}
