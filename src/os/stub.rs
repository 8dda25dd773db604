//! Stub window system for non-Windows platforms and tests
//!
//! Holds a scriptable in-memory desktop and records every native write the
//! engine performs, so memoization can be checked call by call.

use parking_lot::Mutex;

use crate::core::error::OsError;
use crate::os::{MonitorId, ShowState, WindowId, WindowIdentity, WindowSystem};
use crate::taskbar::accent::AccentPolicy;
use crate::taskbar::directory::{PRIMARY_TASKBAR_CLASS, SECONDARY_TASKBAR_CLASS};
use crate::taskbar::peek::{SHOW_DESKTOP_BUTTON_CLASS, TRAY_NOTIFY_CLASS};
use crate::taskbar::resolver::{START_MENU_CLASS, START_MENU_TITLE};

/// A simulated window
#[derive(Debug, Clone)]
pub struct StubWindow {
    pub class_name: String,
    pub title: String,
    pub executable: Option<String>,
    pub monitor: MonitorId,
    pub parent: Option<WindowId>,
    /// Root owner, the window itself when `None`
    pub owner: Option<WindowId>,
    /// Last active popup, the window itself when `None`
    pub popup: Option<WindowId>,
    pub visible: bool,
    pub cloaked: bool,
    pub show_state: ShowState,
    pub on_current_desktop: bool,
    pub title_bar_invisible: bool,
    pub ex_style: u32,
}

impl StubWindow {
    /// A plain, visible application window
    pub fn app(monitor: MonitorId) -> Self {
        Self {
            class_name: "StubAppWindow".to_string(),
            title: "Untitled".to_string(),
            executable: Some("app.exe".to_string()),
            monitor,
            parent: None,
            owner: None,
            popup: None,
            visible: true,
            cloaked: false,
            show_state: ShowState::Normal,
            on_current_desktop: true,
            title_bar_invisible: false,
            ex_style: 0,
        }
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_string();
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_executable(mut self, executable: &str) -> Self {
        self.executable = Some(executable.to_string());
        self
    }

    pub fn child_of(mut self, parent: WindowId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn owned_by(mut self, owner: WindowId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn maximized(mut self) -> Self {
        self.show_state = ShowState::Maximized;
        self
    }

    pub fn minimized(mut self) -> Self {
        self.show_state = ShowState::Minimized;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn cloaked(mut self) -> Self {
        self.cloaked = true;
        self
    }

    pub fn on_other_desktop(mut self) -> Self {
        self.on_current_desktop = false;
        self
    }

    pub fn with_ex_style(mut self, ex_style: u32) -> Self {
        self.ex_style = ex_style;
        self
    }

    pub fn with_invisible_title_bar(mut self) -> Self {
        self.title_bar_invisible = true;
        self
    }
}

/// Native writes recorded by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    SetAccentPolicy(WindowId, AccentPolicy),
    ThemeChanged(WindowId),
    SetExStyle(WindowId, u32),
    SetLayeredAlpha(WindowId, u8),
}

#[derive(Debug, Default)]
struct StubDesktop {
    next_id: usize,
    windows: Vec<(WindowId, StubWindow)>,
    start_menu_open: bool,
    composition_missing: bool,
    calls: Vec<NativeCall>,
}

impl StubDesktop {
    fn get(&self, window: WindowId) -> Option<&StubWindow> {
        self.windows
            .iter()
            .find(|(id, _)| *id == window)
            .map(|(_, w)| w)
    }

    fn get_mut(&mut self, window: WindowId) -> Option<&mut StubWindow> {
        self.windows
            .iter_mut()
            .find(|(id, _)| *id == window)
            .map(|(_, w)| w)
    }
}

/// In-memory [`WindowSystem`]
#[derive(Debug, Default)]
pub struct StubWindowSystem {
    desktop: Mutex<StubDesktop>,
}

impl StubWindowSystem {
    /// Create an empty desktop
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window and return its handle
    pub fn add_window(&self, window: StubWindow) -> WindowId {
        let mut desktop = self.desktop.lock();
        desktop.next_id += 1;
        let id = WindowId(desktop.next_id * 0x10);
        desktop.windows.push((id, window));
        id
    }

    /// Add `Shell_TrayWnd` with its notification area and peek button.
    ///
    /// Returns the taskbar handle.
    pub fn add_primary_taskbar(&self, monitor: MonitorId) -> WindowId {
        let taskbar = self.add_taskbar_window(PRIMARY_TASKBAR_CLASS, monitor);
        let tray = self.add_window(
            StubWindow::app(monitor)
                .with_class(TRAY_NOTIFY_CLASS)
                .with_title("")
                .child_of(taskbar),
        );
        self.add_window(
            StubWindow::app(monitor)
                .with_class(SHOW_DESKTOP_BUTTON_CLASS)
                .with_title("")
                .child_of(tray),
        );
        taskbar
    }

    /// Add a `Shell_SecondaryTrayWnd`
    pub fn add_secondary_taskbar(&self, monitor: MonitorId) -> WindowId {
        self.add_taskbar_window(SECONDARY_TASKBAR_CLASS, monitor)
    }

    fn add_taskbar_window(&self, class_name: &str, monitor: MonitorId) -> WindowId {
        self.add_window(
            StubWindow::app(monitor)
                .with_class(class_name)
                .with_title("")
                .with_executable("explorer.exe")
                .with_ex_style(crate::os::WS_EX_TOOLWINDOW),
        )
    }

    /// Handle of the peek button under a primary taskbar
    pub fn peek_button(&self, taskbar: WindowId) -> Option<WindowId> {
        let tray = self.find_window(TRAY_NOTIFY_CLASS, None, Some(taskbar), None)?;
        self.find_window(SHOW_DESKTOP_BUTTON_CLASS, None, Some(tray), None)
    }

    /// Remove a window and all of its descendants
    pub fn remove_window(&self, window: WindowId) {
        let mut desktop = self.desktop.lock();
        let mut doomed = vec![window];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            let children: Vec<WindowId> = desktop
                .windows
                .iter()
                .filter(|(_, w)| w.parent == Some(parent))
                .map(|(id, _)| *id)
                .collect();
            doomed.extend(children);
            i += 1;
        }
        desktop.windows.retain(|(id, _)| !doomed.contains(id));
    }

    /// Mutate a window in place
    pub fn update(&self, window: WindowId, f: impl FnOnce(&mut StubWindow)) {
        if let Some(w) = self.desktop.lock().get_mut(window) {
            f(w);
        }
    }

    /// Open the start menu on a monitor
    pub fn open_start_menu(&self, monitor: MonitorId) {
        let existing = self.find_window(START_MENU_CLASS, Some(START_MENU_TITLE), None, None);
        match existing {
            Some(start) => self.update(start, |w| w.monitor = monitor),
            None => {
                self.add_window(
                    StubWindow::app(monitor)
                        .with_class(START_MENU_CLASS)
                        .with_title(START_MENU_TITLE)
                        .with_executable("StartMenuExperienceHost.exe")
                        .cloaked(),
                );
            }
        }
        self.desktop.lock().start_menu_open = true;
    }

    pub fn close_start_menu(&self) {
        self.desktop.lock().start_menu_open = false;
    }

    /// Simulate an OS without `SetWindowCompositionAttribute`
    pub fn set_composition_available(&self, available: bool) {
        self.desktop.lock().composition_missing = !available;
    }

    /// All recorded native writes, oldest first
    pub fn calls(&self) -> Vec<NativeCall> {
        self.desktop.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.desktop.lock().calls.clear();
    }

    pub fn composition_calls(&self) -> Vec<(WindowId, AccentPolicy)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NativeCall::SetAccentPolicy(w, p) => Some((w, p)),
                _ => None,
            })
            .collect()
    }

    pub fn theme_changed_calls(&self) -> Vec<WindowId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NativeCall::ThemeChanged(w) => Some(w),
                _ => None,
            })
            .collect()
    }

    /// Current extended style of a window
    pub fn current_ex_style(&self, window: WindowId) -> u32 {
        self.ex_style(window)
    }

    fn record(&self, call: NativeCall) {
        self.desktop.lock().calls.push(call);
    }
}

impl WindowSystem for StubWindowSystem {
    fn find_window(
        &self,
        class_name: &str,
        title: Option<&str>,
        parent: Option<WindowId>,
        after: Option<WindowId>,
    ) -> Option<WindowId> {
        let desktop = self.desktop.lock();
        let start = match after {
            Some(prev) => desktop.windows.iter().position(|(id, _)| *id == prev)? + 1,
            None => 0,
        };

        desktop.windows[start..]
            .iter()
            .find(|(_, w)| {
                w.parent == parent
                    && w.class_name == class_name
                    && title.map_or(true, |t| w.title == t)
            })
            .map(|(id, _)| *id)
    }

    fn monitor_from_window(&self, window: WindowId) -> MonitorId {
        let desktop = self.desktop.lock();
        desktop
            .get(window)
            .map(|w| w.monitor)
            .or_else(|| desktop.windows.first().map(|(_, w)| w.monitor))
            .unwrap_or(MonitorId(0))
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        self.desktop
            .lock()
            .windows
            .iter()
            .filter(|(_, w)| w.parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    fn is_visible(&self, window: WindowId) -> bool {
        self.desktop.lock().get(window).map_or(false, |w| w.visible)
    }

    fn is_cloaked(&self, window: WindowId) -> bool {
        self.desktop.lock().get(window).map_or(false, |w| w.cloaked)
    }

    fn show_state(&self, window: WindowId) -> ShowState {
        self.desktop
            .lock()
            .get(window)
            .map(|w| w.show_state)
            .unwrap_or_default()
    }

    fn is_on_current_desktop(&self, window: WindowId) -> bool {
        self.desktop
            .lock()
            .get(window)
            .map_or(false, |w| w.on_current_desktop)
    }

    fn root_owner(&self, window: WindowId) -> WindowId {
        self.desktop
            .lock()
            .get(window)
            .and_then(|w| w.owner)
            .unwrap_or(window)
    }

    fn last_active_popup(&self, window: WindowId) -> WindowId {
        self.desktop
            .lock()
            .get(window)
            .and_then(|w| w.popup)
            .unwrap_or(window)
    }

    fn is_title_bar_invisible(&self, window: WindowId) -> bool {
        self.desktop
            .lock()
            .get(window)
            .map_or(false, |w| w.title_bar_invisible)
    }

    fn ex_style(&self, window: WindowId) -> u32 {
        self.desktop.lock().get(window).map_or(0, |w| w.ex_style)
    }

    fn set_ex_style(&self, window: WindowId, style: u32) {
        self.update(window, |w| w.ex_style = style);
        self.record(NativeCall::SetExStyle(window, style));
    }

    fn set_layered_alpha(&self, window: WindowId, alpha: u8) {
        self.record(NativeCall::SetLayeredAlpha(window, alpha));
    }

    fn identity(&self, window: WindowId) -> WindowIdentity {
        self.desktop
            .lock()
            .get(window)
            .map(|w| WindowIdentity {
                class_name: w.class_name.clone(),
                title: w.title.clone(),
                executable: w.executable.clone(),
            })
            .unwrap_or_default()
    }

    fn is_start_menu_open(&self) -> bool {
        self.desktop.lock().start_menu_open
    }

    fn send_theme_changed(&self, window: WindowId) {
        self.record(NativeCall::ThemeChanged(window));
    }

    fn composition_available(&self) -> bool {
        !self.desktop.lock().composition_missing
    }

    fn set_accent_policy(&self, window: WindowId, policy: &AccentPolicy) -> Result<(), OsError> {
        if !self.composition_available() {
            return Err(OsError::CompositionUnavailable);
        }
        self.record(NativeCall::SetAccentPolicy(window, *policy));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_window_iterates_with_after() {
        let system = StubWindowSystem::new();
        let first = system.add_secondary_taskbar(MonitorId(2));
        let second = system.add_secondary_taskbar(MonitorId(3));

        let found = system.find_window(SECONDARY_TASKBAR_CLASS, None, None, None);
        assert_eq!(found, Some(first));
        let next = system.find_window(SECONDARY_TASKBAR_CLASS, None, None, Some(first));
        assert_eq!(next, Some(second));
        assert_eq!(
            system.find_window(SECONDARY_TASKBAR_CLASS, None, None, Some(second)),
            None
        );
    }

    #[test]
    fn test_primary_taskbar_has_peek_button() {
        let system = StubWindowSystem::new();
        let taskbar = system.add_primary_taskbar(MonitorId(1));
        assert!(system.peek_button(taskbar).is_some());
        assert_eq!(system.top_level_windows(), vec![taskbar]);
    }

    #[test]
    fn test_remove_window_removes_children() {
        let system = StubWindowSystem::new();
        let taskbar = system.add_primary_taskbar(MonitorId(1));
        system.remove_window(taskbar);
        assert!(system.peek_button(taskbar).is_none());
        assert!(system.top_level_windows().is_empty());
    }

    #[test]
    fn test_composition_unavailable() {
        let system = StubWindowSystem::new();
        let window = system.add_window(StubWindow::app(MonitorId(1)));
        system.set_composition_available(false);

        let policy = AccentPolicy::new(
            crate::taskbar::accent::AccentMode::Blur,
            crate::core::color::Color::TRANSPARENT,
        )
        .unwrap();
        assert!(matches!(
            system.set_accent_policy(window, &policy),
            Err(OsError::CompositionUnavailable)
        ));
        assert!(system.calls().is_empty());
    }
}
