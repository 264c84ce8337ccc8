//! Settings and history persistence.
//!
//! Both files are plain JSON. Missing or malformed data never blocks startup:
//! we log a warning and fall back to defaults / an empty history.

use std::fs;

use thiserror::Error;
use tracing::warn;

use syllogi::config::Config;
use syllogi::history::HistoryRecord;

use crate::paths::AppPaths;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not determine the OS data directory")]
    NoDataDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted settings, or defaults when absent/corrupt.
pub fn load_settings(paths: &AppPaths) -> Config {
    let path = paths.settings_file();
    match fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str::<Config>(&text) {
            Ok(config) => config.normalized(),
            Err(e) => {
                warn!("Malformed settings file {:?}: {}; using defaults", path, e);
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

pub fn save_settings(paths: &AppPaths, config: &Config) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(paths.settings_file(), json)?;
    Ok(())
}

/// Persisted session history, or empty when absent/corrupt.
pub fn load_history(paths: &AppPaths) -> Vec<HistoryRecord> {
    let path = paths.history_file();
    match fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str::<Vec<HistoryRecord>>(&text) {
            Ok(history) => history,
            Err(e) => {
                warn!("Malformed history file {:?}: {}; starting empty", path, e);
                Vec::new()
            }
        },
        Err(_) => Vec::new(),
    }
}

pub fn save_history(paths: &AppPaths, history: &[HistoryRecord]) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(history)?;
    fs::write(paths.history_file(), json)?;
    Ok(())
}
