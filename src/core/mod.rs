//! TranslucentTaskbar Core Module
//!
//! This module contains:
//! - Configuration model and persistence
//! - Error types and handling
//! - The ARGB color type

pub mod color;
pub mod config;
pub mod error;
pub mod store;

// Re-export commonly used items
pub use color::Color;
pub use config::{AppConfig, AppearanceConfig, DynamicWindowsConfig, PeekMode};
pub use error::{ErrorRecovery, RecoveryAction, Result, TaskbarError};
pub use store::{ConfigStore, ExclusionStore, JsonStore};
