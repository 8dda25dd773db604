//! Monitor state resolution
//!
//! One pass classifies every monitor from scratch and decides whether the
//! peek button should be shown. The window list is snapshotted first, then
//! folded over the directory.

use crate::core::config::{AppConfig, PeekMode};
use crate::exclusion::ExclusionMatcher;
use crate::os::{MonitorId, ShowState, WindowId, WindowSystem};
use crate::taskbar::classifier;
use crate::taskbar::directory::TaskbarDirectory;
use crate::taskbar::state::MonitorState;

/// Window class of the start menu surface
pub const START_MENU_CLASS: &str = "Windows.UI.Core.CoreWindow";

/// Window title of the start menu surface
pub const START_MENU_TITLE: &str = "Start";

/// Result of a resolution pass that is not stored in the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the peek button should be visible
    pub peek_visible: bool,
}

/// Classifies monitors for one configuration snapshot
pub struct MonitorStateResolver<'a> {
    system: &'a dyn WindowSystem,
    exclusions: &'a dyn ExclusionMatcher,
    config: &'a AppConfig,
}

impl<'a> MonitorStateResolver<'a> {
    pub fn new(
        system: &'a dyn WindowSystem,
        exclusions: &'a dyn ExclusionMatcher,
        config: &'a AppConfig,
    ) -> Self {
        Self {
            system,
            exclusions,
            config,
        }
    }

    /// Run a full pass over `directory`.
    ///
    /// `aero_peek_active` is the observer's flag as read at the start of the
    /// pass.
    pub fn resolve(&self, directory: &mut TaskbarDirectory, aero_peek_active: bool) -> Resolution {
        let mut peek_visible = self.config.peek == PeekMode::Enabled;
        directory.set_all(MonitorState::Normal);

        if self.config.needs_window_scan() {
            let primary_monitor = directory.primary_monitor();
            let windows = self.system.top_level_windows();
            for window in windows {
                self.fold_window(directory, primary_monitor, window, &mut peek_visible);
            }
        }

        if self.config.dynamic_start && self.system.is_start_menu_open() {
            self.mark_start_menu(directory);
        }

        if self.config.dynamic_windows.regular_on_peek && aero_peek_active {
            directory.set_all(MonitorState::Normal);
        }

        Resolution { peek_visible }
    }

    fn fold_window(
        &self,
        directory: &mut TaskbarDirectory,
        primary_monitor: Option<MonitorId>,
        window: WindowId,
        peek_visible: &mut bool,
    ) {
        if !classifier::is_candidate(self.system, self.exclusions, window) {
            return;
        }

        let show_state = self.system.show_state(window);
        if show_state == ShowState::Maximized {
            let monitor = self.system.monitor_from_window(window);

            if self.config.dynamic_windows.enabled {
                match directory.entry_mut(monitor) {
                    Some(entry) => entry.state.raise_to(MonitorState::WindowMaximized),
                    None => tracing::trace!(
                        "Maximized window {:?} is on monitor {:?} without a taskbar",
                        window,
                        monitor
                    ),
                }
            }

            if self.config.peek.is_dynamic() && Some(monitor) == primary_monitor {
                *peek_visible = true;
            }
        } else if self.config.peek == PeekMode::DynamicGenerous
            && !*peek_visible
            && show_state != ShowState::Minimized
            && classifier::is_real_window(self.system, self.exclusions, window)
        {
            *peek_visible = true;
        }
    }

    fn mark_start_menu(&self, directory: &mut TaskbarDirectory) {
        let Some(start) = self
            .system
            .find_window(START_MENU_CLASS, Some(START_MENU_TITLE), None, None)
        else {
            tracing::trace!("Start menu reported open but its window was not found");
            return;
        };

        let monitor = self.system.monitor_from_window(start);
        if let Some(entry) = directory.entry_mut(monitor) {
            entry.state.raise_to(MonitorState::StartMenuOpen);
        }
    }
}
