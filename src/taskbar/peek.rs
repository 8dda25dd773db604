//! Peek button visibility

use crate::os::{WindowId, WindowSystem, WS_EX_LAYERED};

/// Notification area window class, parent of the peek button
pub const TRAY_NOTIFY_CLASS: &str = "TrayNotifyWnd";

/// Window class of the "show desktop" peek button
pub const SHOW_DESKTOP_BUTTON_CLASS: &str = "TrayShowDesktopButtonWClass";

/// What a call to [`PeekToggle::set_peek_visible`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeekOutcome {
    /// Same value on the same taskbar, nothing done
    Unchanged,
    /// The peek button could not be found under the primary taskbar
    NotFound,
    Shown,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PeekMemo {
    visible: bool,
    taskbar: WindowId,
}

/// Shows and hides the peek button on the primary taskbar
#[derive(Debug, Default)]
pub struct PeekToggle {
    last: Option<PeekMemo>,
}

impl PeekToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the peek button under `primary` visible or not.
    ///
    /// Does nothing when `desired` was already applied to the same taskbar.
    pub fn set_peek_visible(
        &mut self,
        system: &dyn WindowSystem,
        primary: WindowId,
        desired: bool,
    ) -> PeekOutcome {
        let memo = PeekMemo {
            visible: desired,
            taskbar: primary,
        };
        if self.last == Some(memo) {
            return PeekOutcome::Unchanged;
        }

        let Some(button) = find_peek_button(system, primary) else {
            tracing::debug!("Peek button not found under taskbar {:?}", primary);
            return PeekOutcome::NotFound;
        };

        let style = system.ex_style(button);
        let outcome = if desired {
            system.set_ex_style(button, style & !WS_EX_LAYERED);
            PeekOutcome::Shown
        } else {
            system.set_ex_style(button, style | WS_EX_LAYERED);
            system.set_layered_alpha(button, 0);
            PeekOutcome::Hidden
        };

        tracing::debug!("Peek button {:?}", outcome);
        self.last = Some(memo);
        outcome
    }

    /// Forget the last applied value
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

fn find_peek_button(system: &dyn WindowSystem, primary: WindowId) -> Option<WindowId> {
    let tray = system.find_window(TRAY_NOTIFY_CLASS, None, Some(primary), None)?;
    system.find_window(SHOW_DESKTOP_BUTTON_CLASS, None, Some(tray), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os::stub::NativeCall;
    use crate::os::{MonitorId, StubWindowSystem};

    #[test]
    fn test_hide_sets_layered_and_zero_alpha() {
        let system = StubWindowSystem::new();
        let taskbar = system.add_primary_taskbar(MonitorId(1));
        let button = system.peek_button(taskbar).unwrap();
        let mut toggle = PeekToggle::new();

        assert_eq!(toggle.set_peek_visible(&system, taskbar, false), PeekOutcome::Hidden);
        assert_eq!(
            system.calls(),
            vec![
                NativeCall::SetExStyle(button, WS_EX_LAYERED),
                NativeCall::SetLayeredAlpha(button, 0),
            ]
        );
        assert_ne!(system.current_ex_style(button) & WS_EX_LAYERED, 0);

        assert_eq!(toggle.set_peek_visible(&system, taskbar, true), PeekOutcome::Shown);
        assert_eq!(system.current_ex_style(button) & WS_EX_LAYERED, 0);
    }

    #[test]
    fn test_second_identical_call_is_no_op() {
        let system = StubWindowSystem::new();
        let taskbar = system.add_primary_taskbar(MonitorId(1));
        let mut toggle = PeekToggle::new();

        toggle.set_peek_visible(&system, taskbar, false);
        system.clear_calls();

        assert_eq!(toggle.set_peek_visible(&system, taskbar, false), PeekOutcome::Unchanged);
        assert!(system.calls().is_empty());
    }

    #[test]
    fn test_new_taskbar_identity_reapplies() {
        let system = StubWindowSystem::new();
        let old = system.add_primary_taskbar(MonitorId(1));
        let mut toggle = PeekToggle::new();
        toggle.set_peek_visible(&system, old, false);

        system.remove_window(old);
        let new = system.add_primary_taskbar(MonitorId(1));
        system.clear_calls();

        assert_eq!(toggle.set_peek_visible(&system, new, false), PeekOutcome::Hidden);
        assert_eq!(system.calls().len(), 2);
    }

    #[test]
    fn test_missing_button_is_tolerated() {
        let system = StubWindowSystem::new();
        let taskbar = system.add_secondary_taskbar(MonitorId(1));
        let mut toggle = PeekToggle::new();

        assert_eq!(toggle.set_peek_visible(&system, taskbar, false), PeekOutcome::NotFound);
        assert_eq!(toggle.set_peek_visible(&system, taskbar, false), PeekOutcome::NotFound);
        assert!(system.calls().is_empty());
    }

    #[test]
    fn test_invalidate_forces_reapply() {
        let system = StubWindowSystem::new();
        let taskbar = system.add_primary_taskbar(MonitorId(1));
        let mut toggle = PeekToggle::new();

        toggle.set_peek_visible(&system, taskbar, true);
        toggle.invalidate();
        assert_eq!(toggle.set_peek_visible(&system, taskbar, true), PeekOutcome::Shown);
    }

    #[test]
    fn test_button_with_caption_is_found() {
        let system = StubWindowSystem::new();
        let taskbar = system.add_primary_taskbar(MonitorId(1));
        let tray = system
            .find_window(TRAY_NOTIFY_CLASS, None, Some(taskbar), None)
            .unwrap();
        let button = system.peek_button(taskbar).unwrap();
        system.update(tray, |w| w.title = "Notification area".to_string());
        system.update(button, |w| w.title = "Show desktop".to_string());
        let mut toggle = PeekToggle::new();

        assert_eq!(toggle.set_peek_visible(&system, taskbar, false), PeekOutcome::Hidden);
        assert_ne!(system.current_ex_style(button) & WS_EX_LAYERED, 0);
    }
}
