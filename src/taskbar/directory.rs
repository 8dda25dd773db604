//! Taskbar directory
//!
//! Maps each display to the taskbar window it hosts. Handles become invalid
//! whenever the shell recreates its taskbars or the display layout changes,
//! so the directory is always rebuilt from scratch.

use std::collections::BTreeMap;

use crate::core::error::{OsError, Result};
use crate::os::{MonitorId, WindowId, WindowSystem};
use crate::taskbar::state::MonitorState;

/// Window class of the primary taskbar
pub const PRIMARY_TASKBAR_CLASS: &str = "Shell_TrayWnd";

/// Window class of the taskbars on the other displays
pub const SECONDARY_TASKBAR_CLASS: &str = "Shell_SecondaryTrayWnd";

/// A taskbar window and its classification for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub window: WindowId,
    pub state: MonitorState,
}

/// Taskbar windows keyed by display
#[derive(Debug, Default)]
pub struct TaskbarDirectory {
    primary: Option<WindowId>,
    entries: BTreeMap<MonitorId, TaskbarEntry>,
}

impl TaskbarDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry and rediscover the taskbars.
    ///
    /// Fails when there is no primary taskbar; the directory is left empty.
    pub fn refresh(&mut self, system: &dyn WindowSystem) -> Result<()> {
        self.entries.clear();
        self.primary = None;

        let primary = system
            .find_window(PRIMARY_TASKBAR_CLASS, None, None, None)
            .ok_or(OsError::PrimaryTaskbarNotFound)?;

        self.primary = Some(primary);
        self.entries.insert(
            system.monitor_from_window(primary),
            TaskbarEntry {
                window: primary,
                state: MonitorState::Normal,
            },
        );

        let mut previous = None;
        while let Some(secondary) =
            system.find_window(SECONDARY_TASKBAR_CLASS, None, None, previous)
        {
            let monitor = system.monitor_from_window(secondary);
            if self.entries.contains_key(&monitor) {
                tracing::debug!(
                    "Ignoring secondary taskbar {:?} on the primary taskbar's monitor {:?}",
                    secondary,
                    monitor
                );
            } else {
                self.entries.insert(
                    monitor,
                    TaskbarEntry {
                        window: secondary,
                        state: MonitorState::Normal,
                    },
                );
            }
            previous = Some(secondary);
        }

        tracing::debug!("Taskbar directory refreshed, found {} taskbars", self.entries.len());
        Ok(())
    }

    /// Primary taskbar handle as of the last refresh
    pub fn primary(&self) -> Option<WindowId> {
        self.primary
    }

    /// Monitor hosting the primary taskbar
    pub fn primary_monitor(&self) -> Option<MonitorId> {
        let primary = self.primary?;
        self.entries
            .iter()
            .find(|(_, entry)| entry.window == primary)
            .map(|(monitor, _)| *monitor)
    }

    pub fn entry(&self, monitor: MonitorId) -> Option<&TaskbarEntry> {
        self.entries.get(&monitor)
    }

    pub fn entry_mut(&mut self, monitor: MonitorId) -> Option<&mut TaskbarEntry> {
        self.entries.get_mut(&monitor)
    }

    pub fn entries(&self) -> impl Iterator<Item = (MonitorId, &TaskbarEntry)> {
        self.entries.iter().map(|(monitor, entry)| (*monitor, entry))
    }

    /// Set every monitor to `state`
    pub fn set_all(&mut self, state: MonitorState) {
        for entry in self.entries.values_mut() {
            entry.state = state;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
