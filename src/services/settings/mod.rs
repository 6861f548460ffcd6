// Settings service module
// Loads and stores the TOML settings file and resolves data locations

mod service;

pub use service::{data_dir, storage_path, SettingsService, ENDPOINT_ENV_VAR};
