//! OS Integration Layer for TranslucentTaskbar
//!
//! Everything the engine needs from the window system goes through the
//! [`WindowSystem`] trait:
//! - Window lookup by class and title
//! - Top-level window enumeration
//! - Visibility, cloaking, show state and virtual desktop queries
//! - Extended style and layered window attributes
//! - The undocumented composition entry point
//!
//! The Win32 backend lives in [`windows`]; [`stub`] is an in-memory desktop
//! used on other platforms and by the tests.

#[cfg(windows)]
pub mod windows;

#[cfg(windows)]
pub use windows::{AeroPeekHook, InstanceGuard, MessageWindow, Win32WindowSystem};

pub mod stub;

pub use stub::{StubWindow, StubWindowSystem};


use crate::core::error::OsError;
use crate::taskbar::accent::AccentPolicy;

/// `WS_EX_TOOLWINDOW`
pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;

/// `WS_EX_LAYERED`
pub const WS_EX_LAYERED: u32 = 0x0008_0000;

/// Opaque window handle (an `HWND` value on Windows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub usize);

/// Opaque display handle (an `HMONITOR` value on Windows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorId(pub usize);

/// Show state of a top-level window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowState {
    #[default]
    Normal,
    Maximized,
    Minimized,
}

/// What the exclusion rules match against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowIdentity {
    pub class_name: String,
    pub title: String,
    /// File name of the owning process image, if it could be read
    pub executable: Option<String>,
}

/// Window system queries and the few native writes the engine performs
///
/// All methods are expected to return promptly; a failed query reads as
/// the harmless answer (not visible, not cloaked, and so on).
pub trait WindowSystem {
    /// Find a window by class and optional title.
    ///
    /// `parent = None` searches top-level windows, `after` continues the
    /// search past a previous match.
    fn find_window(
        &self,
        class_name: &str,
        title: Option<&str>,
        parent: Option<WindowId>,
        after: Option<WindowId>,
    ) -> Option<WindowId>;

    /// Display hosting the window, primary display if none
    fn monitor_from_window(&self, window: WindowId) -> MonitorId;

    /// Snapshot of all top-level windows in z-order
    fn top_level_windows(&self) -> Vec<WindowId>;

    fn is_visible(&self, window: WindowId) -> bool;

    /// Cloaked by DWM (e.g. on another virtual desktop, suspended UWP frame)
    fn is_cloaked(&self, window: WindowId) -> bool;

    fn show_state(&self, window: WindowId) -> ShowState;

    fn is_on_current_desktop(&self, window: WindowId) -> bool;

    /// `GetAncestor(GA_ROOTOWNER)`
    fn root_owner(&self, window: WindowId) -> WindowId;

    /// `GetLastActivePopup`
    fn last_active_popup(&self, window: WindowId) -> WindowId;

    /// Title bar reports `STATE_SYSTEM_INVISIBLE`
    fn is_title_bar_invisible(&self, window: WindowId) -> bool;

    fn ex_style(&self, window: WindowId) -> u32;

    fn set_ex_style(&self, window: WindowId, style: u32);

    /// `SetLayeredWindowAttributes(.., LWA_ALPHA)`
    fn set_layered_alpha(&self, window: WindowId, alpha: u8);

    fn identity(&self, window: WindowId) -> WindowIdentity;

    fn is_start_menu_open(&self) -> bool;

    /// Post `WM_THEMECHANGED` so the shell repaints its stock appearance
    fn send_theme_changed(&self, window: WindowId);

    /// Whether `SetWindowCompositionAttribute` was found at start-up
    fn composition_available(&self) -> bool;

    fn set_accent_policy(&self, window: WindowId, policy: &AccentPolicy) -> Result<(), OsError>;
}
