//! Configuration module for TranslucentTaskbar
//!
//! Handles the user-facing settings consumed by the engine:
//! - Regular taskbar appearance
//! - Dynamic appearance for maximized windows and the start menu
//! - Peek button behavior
//! - Polling cadence and verbosity

use serde::{Deserialize, Serialize};

use crate::core::color::Color;
use crate::taskbar::accent::AccentMode;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Appearance when nothing special is happening on a monitor
    #[serde(default)]
    pub taskbar: AppearanceConfig,

    /// Appearance when a window is maximized on a monitor
    #[serde(default)]
    pub dynamic_windows: DynamicWindowsConfig,

    /// Use the stock appearance while the start menu is open
    #[serde(default)]
    pub dynamic_start: bool,

    /// Peek button visibility
    #[serde(default)]
    pub peek: PeekMode,

    /// Log at debug level
    #[serde(default)]
    pub verbose: bool,

    /// Delay between polling ticks in milliseconds
    #[serde(default = "default_sleep_time")]
    pub sleep_time_ms: u64,

    /// Run the window scan once every this many ticks
    #[serde(default = "default_scan_interval")]
    pub scan_interval_ticks: u32,
}

/// Accent mode and color pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    #[serde(default)]
    pub accent: AccentMode,

    #[serde(default)]
    pub color: Color,
}

/// Settings for the maximized-window state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicWindowsConfig {
    /// Whether maximized windows change the appearance at all
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_dynamic_accent")]
    pub accent: AccentMode,

    #[serde(default = "default_dynamic_color")]
    pub color: Color,

    /// Use `taskbar.color` instead of `color`
    #[serde(default)]
    pub use_regular_color: bool,

    /// Fall back to the regular appearance while Aero Peek is active
    #[serde(default)]
    pub regular_on_peek: bool,
}

/// Peek button behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeekMode {
    /// Always shown
    #[default]
    Enabled,
    /// Shown only while a window is maximized on the primary monitor
    Dynamic,
    /// Shown while any real window is open on the current desktop
    DynamicGenerous,
    /// Always hidden
    Disabled,
}

impl PeekMode {
    /// Whether the peek button depends on the window set
    pub fn is_dynamic(self) -> bool {
        matches!(self, PeekMode::Dynamic | PeekMode::DynamicGenerous)
    }
}

fn default_sleep_time() -> u64 {
    10
}

fn default_scan_interval() -> u32 {
    10
}

fn default_dynamic_accent() -> AccentMode {
    AccentMode::Opaque
}

fn default_dynamic_color() -> Color {
    Color(0xFF00_0000)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            taskbar: AppearanceConfig::default(),
            dynamic_windows: DynamicWindowsConfig::default(),
            dynamic_start: false,
            peek: PeekMode::default(),
            verbose: false,
            sleep_time_ms: default_sleep_time(),
            scan_interval_ticks: default_scan_interval(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            accent: AccentMode::Blur,
            color: Color::TRANSPARENT,
        }
    }
}

impl Default for DynamicWindowsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            accent: default_dynamic_accent(),
            color: default_dynamic_color(),
            use_regular_color: false,
            regular_on_peek: false,
        }
    }
}

impl AppConfig {
    /// Whether a resolution pass has to enumerate top-level windows
    pub fn needs_window_scan(&self) -> bool {
        self.dynamic_windows.enabled || self.peek.is_dynamic()
    }

    /// Appearance for a monitor with a maximized window
    pub fn maximized_appearance(&self) -> AppearanceConfig {
        let color = if self.dynamic_windows.use_regular_color {
            self.taskbar.color
        } else {
            self.dynamic_windows.color
        };

        AppearanceConfig {
            accent: self.dynamic_windows.accent,
            color,
        }
    }
}
