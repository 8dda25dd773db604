//! Error types for TranslucentTaskbar
//!
//! Errors are grouped by the layer that raises them. Every error also
//! carries a recovery action so the host loop can tell a permanent
//! capability gap from a transient miss or a fatal failure.

use thiserror::Error;

/// Result type alias for TranslucentTaskbar operations
pub type Result<T> = std::result::Result<T, TaskbarError>;

/// Main error type for TranslucentTaskbar
#[derive(Error, Debug)]
pub enum TaskbarError {
    #[error("OS integration error: {0}")]
    Os(#[from] OsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// OS integration errors
#[derive(Error, Debug)]
pub enum OsError {
    #[error("Primary taskbar window (Shell_TrayWnd) not found")]
    PrimaryTaskbarNotFound,

    #[error("SetWindowCompositionAttribute is not available on this system")]
    CompositionUnavailable,

    #[error("Composition call failed: {reason}")]
    CompositionCallFailed { reason: String },

    #[error("Event hook failed: {reason}")]
    EventHookFailed { reason: String },

    #[error("Message window failed: {reason}")]
    MessageWindowFailed { reason: String },

    #[error("Single instance check failed: {reason}")]
    InstanceCheckFailed { reason: String },

    #[error("COM initialization failed: {reason}")]
    ComInitFailed { reason: String },

    #[error("Platform not supported: {platform}")]
    PlatformNotSupported { platform: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Recovery action suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Nothing to do this tick; the next tick tries again
    Skip,
    /// The capability is missing for good; keep running without it
    Disable,
    /// The engine cannot operate; surface to the host
    Abort,
}

/// Trait for error recovery strategies
pub trait ErrorRecovery {
    /// Get recovery action suggestion
    fn recovery_action(&self) -> RecoveryAction;

    /// Whether the host must stop
    fn is_fatal(&self) -> bool {
        self.recovery_action() == RecoveryAction::Abort
    }
}

impl ErrorRecovery for TaskbarError {
    fn recovery_action(&self) -> RecoveryAction {
        match self {
            TaskbarError::Os(e) => e.recovery_action(),
            TaskbarError::Config(e) => e.recovery_action(),
            TaskbarError::Logging(_) => RecoveryAction::Disable,
            TaskbarError::Io(_) => RecoveryAction::Skip,
            TaskbarError::Internal(_) => RecoveryAction::Abort,
        }
    }
}

impl ErrorRecovery for OsError {
    fn recovery_action(&self) -> RecoveryAction {
        match self {
            OsError::PrimaryTaskbarNotFound => RecoveryAction::Abort,
            OsError::CompositionUnavailable => RecoveryAction::Disable,
            OsError::CompositionCallFailed { .. } => RecoveryAction::Skip,
            OsError::EventHookFailed { .. } => RecoveryAction::Disable,
            OsError::MessageWindowFailed { .. } => RecoveryAction::Abort,
            OsError::InstanceCheckFailed { .. } => RecoveryAction::Disable,
            OsError::ComInitFailed { .. } => RecoveryAction::Disable,
            OsError::PlatformNotSupported { .. } => RecoveryAction::Abort,
        }
    }
}

impl ErrorRecovery for ConfigError {
    fn recovery_action(&self) -> RecoveryAction {
        // A broken file keeps the previous values in effect
        RecoveryAction::Skip
    }
}
