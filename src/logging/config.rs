//! Logging settings
//!
//! Debug builds log to the console, release builds to a file under the local
//! data folder. [`LoggingConfig::for_host`] picks between the two.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::store::APP_FOLDER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }

    /// Level used when the user turns on verbose logging
    pub fn verbose(self) -> Self {
        match self {
            LogLevel::Trace => LogLevel::Trace,
            _ => LogLevel::Debug,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Console,
    #[default]
    File,
    Both,
}

impl LogOutput {
    pub fn has_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

/// When the log file rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// A single file, truncated by the user
    #[default]
    Never,
    Hourly,
    Daily,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,

    /// Folder of the log file; `logs` next to the executable when unset
    pub log_directory: Option<PathBuf>,

    /// Per-target overrides of `level`
    #[serde(default)]
    pub module_levels: HashMap<String, LogLevel>,

    #[serde(default = "default_true")]
    pub include_target: bool,

    #[serde(default)]
    pub include_thread_id: bool,

    /// File and line of the log call
    #[serde(default)]
    pub include_file_info: bool,

    #[serde(default)]
    pub rotation: LogRotation,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LoggingConfig {
    /// Settings for the binary.
    ///
    /// `verbose` forces debug level. `log_directory` replaces the default
    /// folder, which only matters when a file is written.
    pub fn for_host(verbose: bool, log_directory: Option<PathBuf>) -> Self {
        let mut config = if cfg!(debug_assertions) {
            Self::development()
        } else {
            Self::production()
        };
        if verbose {
            let level = config.level.verbose();
            config = config.with_level(level);
        }
        match log_directory {
            Some(dir) => config.with_log_directory(dir),
            None => config,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_log_directory(mut self, dir: PathBuf) -> Self {
        self.log_directory = Some(dir);
        self
    }

    /// Console at debug level, with thread ids and call sites
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Text,
            output: LogOutput::Console,
            log_directory: None,
            module_levels: HashMap::new(),
            include_target: true,
            include_thread_id: true,
            include_file_info: true,
            rotation: LogRotation::Never,
        }
    }

    /// A single file in the local data folder at info level
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
            output: LogOutput::File,
            log_directory: Some(default_log_directory()),
            module_levels: HashMap::new(),
            include_target: false,
            include_thread_id: false,
            include_file_info: false,
            rotation: LogRotation::Never,
        }
    }
}

/// `<local data>/TranslucentTaskbar/logs`
pub fn default_log_directory() -> PathBuf {
    match dirs::data_local_dir() {
        Some(data_dir) => data_dir.join(APP_FOLDER).join("logs"),
        None => PathBuf::from("logs"),
    }
}
