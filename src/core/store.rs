//! JSON file storage for settings
//!
//! Provides:
//! - Default file generation on first run
//! - Atomic writes using temp file + rename
//! - Reset to the stock defaults

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::config::AppConfig;
use crate::core::error::ConfigError;
use crate::exclusion::ExclusionRules;

/// Configuration result type
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Application folder name under the platform config directory
pub const APP_FOLDER: &str = "TranslucentTaskbar";

/// Settings file name
pub const CONFIG_FILE: &str = "config.json";

/// Exclusion rules file name
pub const EXCLUDE_FILE: &str = "exclude.json";

/// Default configuration folder
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_FOLDER)
}

/// A JSON document of type `T` kept in a single file
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

/// Store for the main settings
pub type ConfigStore = JsonStore<AppConfig>;

/// Store for the exclusion rules
pub type ExclusionStore = JsonStore<ExclusionRules>;

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the defaults if the file does not exist yet.
    ///
    /// Returns `true` when a new file was created.
    pub fn ensure_exists(&self) -> ConfigResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        self.save(&T::default())?;
        tracing::info!("Created default settings file at {:?}", self.path);
        Ok(true)
    }

    /// Load the document, creating it with defaults when missing
    pub fn load(&self) -> ConfigResult<T> {
        if self.ensure_exists()? {
            return Ok(T::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        let value = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded settings from {:?}", self.path);
        Ok(value)
    }

    /// Save atomically (temp file + rename)
    pub fn save(&self, value: &T) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(value)?;
        let temp_path = self.path.with_extension("json.tmp");

        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!("Saved settings to {:?}", self.path);
        Ok(())
    }

    /// Overwrite the file with the stock defaults and return them
    pub fn reset(&self) -> ConfigResult<T> {
        let value = T::default();
        self.save(&value)?;
        tracing::info!("Restored default settings in {:?}", self.path);
        Ok(value)
    }
}
