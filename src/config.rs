//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::io::FileStorage;
use crate::model::event::{is_valid_datetime_format, DEFAULT_DATETIME_FORMAT};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Save events to disk. When false the session runs without durable storage.
    pub persist: bool,
    /// Overrides the OS data directory for the events file.
    pub data_dir: Option<PathBuf>,
    /// chrono format string for start/end cells.
    pub datetime_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            persist: true,
            data_dir: None,
            datetime_format: DEFAULT_DATETIME_FORMAT.into(),
        }
    }
}

impl AppSettings {
    /// Load from the config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Using default settings");
                Self::default()
            }
        }
    }

    /// Read settings from `path`. A `datetime_format` chrono cannot render
    /// is replaced by the default.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&contents)?;
        if !is_valid_datetime_format(&settings.datetime_format) {
            tracing::warn!(format = %settings.datetime_format, "Invalid datetime_format, using default");
            settings.datetime_format = DEFAULT_DATETIME_FORMAT.into();
        }
        Ok(settings)
    }

    /// The storage events are persisted to, or `None` if persistence is off
    /// or no data directory can be found.
    pub fn storage(&self) -> Option<FileStorage> {
        if !self.persist {
            tracing::info!("Persistence disabled in settings");
            return None;
        }
        if let Some(dir) = &self.data_dir {
            return Some(FileStorage::new(dir));
        }
        match FileStorage::in_data_dir() {
            Ok(storage) => Some(storage),
            Err(e) => {
                tracing::warn!(error = %e, "Events will not be saved");
                None
            }
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "EventCountdown")
        .map(|dirs| dirs.config_dir().join("settings.json"))
}
