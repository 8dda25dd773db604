//! TranslucentTaskbar - keeps the Windows taskbar translucent
//!
//! This crate provides:
//! - Taskbar discovery across monitors
//! - Per-monitor state detection (maximized windows, start menu, Aero Peek)
//! - Appearance application through the composition API
//! - Peek button hiding
//! - User-editable settings and window exclusion rules
//! - The polling engine that ties them together

pub mod core;
pub mod engine;
pub mod exclusion;
pub mod logging;
pub mod os;
pub mod taskbar;

// Re-export commonly used items
pub use core::config::AppConfig;
pub use core::error::{Result, TaskbarError};
pub use engine::{Engine, EventSource, ExitReason, HostEvent};
pub use exclusion::{ExclusionList, ExclusionRules};
pub use os::{StubWindowSystem, WindowSystem};
pub use taskbar::{MonitorState, TaskbarDirectory};
