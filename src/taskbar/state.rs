//! Per-monitor classification

/// What a monitor's taskbar should currently look like.
///
/// Variants are ordered by priority: a later variant wins over an earlier
/// one within a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum MonitorState {
    /// Nothing special, use the regular appearance
    #[default]
    Normal,
    /// A window is maximized on this monitor and dynamic windows is on
    WindowMaximized,
    /// The start menu is open on this monitor and dynamic start is on
    StartMenuOpen,
}

impl MonitorState {
    /// Move to `other` if it has a higher priority, never downgrade.
    pub fn raise_to(&mut self, other: MonitorState) {
        if other > *self {
            *self = other;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_never_downgrades() {
        let mut state = MonitorState::StartMenuOpen;
        state.raise_to(MonitorState::WindowMaximized);
        assert_eq!(state, MonitorState::StartMenuOpen);

        let mut state = MonitorState::Normal;
        state.raise_to(MonitorState::WindowMaximized);
        assert_eq!(state, MonitorState::WindowMaximized);
        state.raise_to(MonitorState::Normal);
        assert_eq!(state, MonitorState::WindowMaximized);
    }
}
