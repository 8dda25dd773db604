//! Logging System for TranslucentTaskbar
//!
//! Provides:
//! - Structured logs with configurable verbosity levels
//! - Console and file output, text or JSON
//! - Runtime switching between the configured level and verbose logging

mod config;


pub use config::{default_log_directory, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig};

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Log file name prefix
pub const LOG_FILE_NAME: &str = "translucent-taskbar.log";

/// Logging system errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Failed to create log directory: {0}")]
    DirectoryCreationError(String),

    #[error("Failed to change log level: {0}")]
    ReloadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for logging operations
pub type LoggingResult<T> = Result<T, LoggingError>;

/// Handle to the live filter
#[derive(Clone)]
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    level: LogLevel,
    module_levels: HashMap<String, LogLevel>,
}

impl LogLevelHandle {
    fn new(handle: reload::Handle<EnvFilter, Registry>, config: &LoggingConfig) -> Self {
        Self {
            handle,
            level: config.level,
            module_levels: config.module_levels.clone(),
        }
    }

    /// Replace the global level, keeping module overrides
    pub fn set_level(&self, level: LogLevel) -> LoggingResult<()> {
        let filter = build_env_filter(level, &self.module_levels);
        self.handle
            .reload(filter)
            .map_err(|e| LoggingError::ReloadError(e.to_string()))
    }

    /// Switch between the configured level and debug
    pub fn set_verbose(&self, verbose: bool) -> LoggingResult<()> {
        let level = if verbose {
            self.level.verbose()
        } else {
            self.level
        };
        self.set_level(level)?;
        tracing::info!("Log level set to {}", level);
        Ok(())
    }

    /// Current filter directives
    pub fn current(&self) -> Option<String> {
        self.handle.with_current(|filter| filter.to_string()).ok()
    }
}

impl std::fmt::Debug for LogLevelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogLevelHandle")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Global logging system state
pub struct LoggingSystem {
    config: LoggingConfig,
    level_handle: LogLevelHandle,
    _guards: Vec<WorkerGuard>,
}

impl LoggingSystem {
    /// Initialize the logging system with the given configuration
    pub fn init(config: LoggingConfig) -> LoggingResult<Self> {
        // Ensure log directory exists
        if config.output.has_file() {
            if let Some(ref log_dir) = config.log_directory {
                std::fs::create_dir_all(log_dir).map_err(|e| {
                    LoggingError::DirectoryCreationError(format!(
                        "Failed to create log directory {:?}: {}",
                        log_dir, e
                    ))
                })?;
            }
        }

        let mut guards = Vec::new();

        let (env_filter, handle) =
            reload::Layer::new(build_env_filter(config.level, &config.module_levels));
        let registry = tracing_subscriber::registry().with(env_filter);

        match config.output {
            LogOutput::Console => {
                let fmt_layer = Self::create_console_layer(&config);
                registry
                    .with(fmt_layer)
                    .try_init()
                    .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
            }
            LogOutput::File => {
                let (file_layer, guard) = Self::create_file_layer(&config)?;
                guards.push(guard);
                registry
                    .with(file_layer)
                    .try_init()
                    .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
            }
            LogOutput::Both => {
                let console_layer = Self::create_console_layer(&config);
                let (file_layer, guard) = Self::create_file_layer(&config)?;
                guards.push(guard);
                registry
                    .with(console_layer)
                    .with(file_layer)
                    .try_init()
                    .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
            }
        }

        let level_handle = LogLevelHandle::new(handle, &config);

        Ok(Self {
            config,
            level_handle,
            _guards: guards,
        })
    }

    /// Create console logging layer
    fn create_console_layer<S>(config: &LoggingConfig) -> impl Layer<S>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let layer = fmt::layer()
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_id)
            .with_file(config.include_file_info)
            .with_line_number(config.include_file_info);

        if config.format == LogFormat::Json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }

    /// Create file logging layer
    fn create_file_layer<S>(
        config: &LoggingConfig,
    ) -> LoggingResult<(impl Layer<S>, WorkerGuard)>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let log_dir = log_directory_of(config);

        let rotation = match config.rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
        };

        let file_appender = RollingFileAppender::new(rotation, &log_dir, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_id)
            .with_file(config.include_file_info)
            .with_line_number(config.include_file_info)
            .with_ansi(false); // No ANSI colors in file output

        if config.format == LogFormat::Json {
            Ok((layer.json().boxed(), guard))
        } else {
            Ok((layer.boxed(), guard))
        }
    }

    /// Handle for changing the level at runtime
    pub fn level_handle(&self) -> LogLevelHandle {
        self.level_handle.clone()
    }

    /// Get current log directory
    pub fn log_directory(&self) -> Option<&PathBuf> {
        self.config.log_directory.as_ref()
    }

    /// What "open log" should open, if anything is written to disk
    pub fn log_target(&self) -> Option<PathBuf> {
        log_target_of(&self.config)
    }

    /// Get current log level
    pub fn log_level(&self) -> LogLevel {
        self.config.level
    }
}

/// Build environment filter from a level and module overrides
pub fn build_env_filter(level: LogLevel, module_levels: &HashMap<String, LogLevel>) -> EnvFilter {
    // Start with the base level
    let mut filter = EnvFilter::new(level.to_string());

    // Add module-specific filters
    for (module, module_level) in module_levels {
        filter = filter.add_directive(
            format!("{}={}", module, module_level)
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        );
    }

    filter
}

fn log_directory_of(config: &LoggingConfig) -> PathBuf {
    config
        .log_directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// The log file itself when it never rotates, otherwise its directory
fn log_target_of(config: &LoggingConfig) -> Option<PathBuf> {
    if !config.output.has_file() {
        return None;
    }

    let dir = log_directory_of(config);
    match config.rotation {
        LogRotation::Never => Some(dir.join(LOG_FILE_NAME)),
        LogRotation::Hourly | LogRotation::Daily => Some(dir),
    }
}

/// Initialize logging with custom configuration
pub fn init_logging(config: LoggingConfig) -> LoggingResult<LoggingSystem> {
    LoggingSystem::init(config)
}
