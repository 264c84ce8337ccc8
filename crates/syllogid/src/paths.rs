//! Cross-platform application paths

use std::fs;
use std::path::PathBuf;

use crate::persist::PersistError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self, PersistError> {
        let base = dirs::data_dir().ok_or(PersistError::NoDataDir)?;
        let data_dir = base.join("syllogi");

        // Ensure directory exists
        fs::create_dir_all(&data_dir)?;

        Ok(Self { data_dir })
    }

    #[cfg(test)]
    pub fn at(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join("history.json")
    }
}
