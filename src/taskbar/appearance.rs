//! Appearance application
//!
//! Turns a monitor's state into an accent policy and pushes it to the
//! taskbar window. The composition call itself is never memoized; only the
//! theme-changed notification for the inert mode is.

use std::collections::HashMap;

use crate::core::color::Color;
use crate::core::config::{AppConfig, AppearanceConfig};
use crate::core::error::{OsError, Result};
use crate::os::{WindowId, WindowSystem};
use crate::taskbar::accent::{AccentMode, AccentPolicy};
use crate::taskbar::state::MonitorState;

/// What a call to [`AppearanceApplier::apply`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Composition is unavailable, nothing was done
    Skipped,
    /// Entered the inert mode, the shell was told to repaint
    ThemeRefreshed,
    /// Already inert, nothing was sent
    Unchanged,
    /// The accent policy was sent
    Applied,
}

/// Appearance for a monitor state
pub fn appearance_for(state: MonitorState, config: &AppConfig) -> AppearanceConfig {
    match state {
        MonitorState::Normal => config.taskbar,
        MonitorState::WindowMaximized => config.maximized_appearance(),
        MonitorState::StartMenuOpen => AppearanceConfig {
            accent: AccentMode::Normal,
            color: Color::TRANSPARENT,
        },
    }
}

/// Applies accent policies to taskbar windows
#[derive(Debug)]
pub struct AppearanceApplier {
    available: bool,
    /// Whether each window is currently in the inert mode
    inert: HashMap<WindowId, bool>,
}

impl AppearanceApplier {
    /// Check for the composition entry point once.
    pub fn new(system: &dyn WindowSystem) -> Self {
        let available = system.composition_available();
        if !available {
            tracing::warn!(
                "SetWindowCompositionAttribute is not available, taskbar appearance will not change"
            );
        }

        Self {
            available,
            inert: HashMap::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Apply `mode` and `color` to a taskbar window.
    pub fn apply(
        &mut self,
        system: &dyn WindowSystem,
        window: WindowId,
        mode: AccentMode,
        color: Color,
    ) -> Result<ApplyOutcome> {
        if !self.available {
            return Ok(ApplyOutcome::Skipped);
        }

        let Some(policy) = AccentPolicy::new(mode, color) else {
            let was_inert = self.inert.insert(window, true).unwrap_or(false);
            if was_inert {
                return Ok(ApplyOutcome::Unchanged);
            }
            system.send_theme_changed(window);
            return Ok(ApplyOutcome::ThemeRefreshed);
        };

        self.inert.insert(window, false);
        match system.set_accent_policy(window, &policy) {
            Ok(()) => Ok(ApplyOutcome::Applied),
            Err(OsError::CompositionUnavailable) => {
                tracing::warn!("Composition became unavailable, disabling appearance changes");
                self.available = false;
                Ok(ApplyOutcome::Skipped)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply the appearance of `state` under `config`.
    pub fn apply_state(
        &mut self,
        system: &dyn WindowSystem,
        window: WindowId,
        state: MonitorState,
        config: &AppConfig,
    ) -> Result<ApplyOutcome> {
        let appearance = appearance_for(state, config);
        self.apply(system, window, appearance.accent, appearance.color)
    }

    /// Forget every window, called when the taskbar handles are refreshed.
    pub fn invalidate(&mut self) {
        self.inert.clear();
    }
}
