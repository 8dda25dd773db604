//! Window predicates used by the resolver
//!
//! All functions are side-effect free apart from what the exclusion matcher
//! caches internally.

use crate::exclusion::ExclusionMatcher;
use crate::os::{WindowId, WindowSystem, WS_EX_TOOLWINDOW};

/// The window is the one its owner chain would activate.
///
/// Walks from the root owner through the last active popups until a visible
/// one is found, the same walk Alt+Tab uses.
pub fn is_popup_chain_root(system: &dyn WindowSystem, window: WindowId) -> bool {
    let mut walk = None;
    let mut next = system.root_owner(window);

    while Some(next) != walk {
        walk = Some(next);
        next = system.last_active_popup(next);
        if system.is_visible(next) {
            break;
        }
    }

    walk == Some(window)
}

pub fn is_tool_window(system: &dyn WindowSystem, window: WindowId) -> bool {
    system.ex_style(window) & WS_EX_TOOLWINDOW != 0
}

/// A window the user would see in Alt+Tab: user visible with a title bar
/// that is not hidden.
pub fn is_real_window(
    system: &dyn WindowSystem,
    exclusions: &dyn ExclusionMatcher,
    window: WindowId,
) -> bool {
    is_user_visible(system, exclusions, window) && !system.is_title_bar_invisible(window)
}

/// Shown, not cloaked, the root of its popup chain, not a tool window and
/// not excluded.
pub fn is_user_visible(
    system: &dyn WindowSystem,
    exclusions: &dyn ExclusionMatcher,
    window: WindowId,
) -> bool {
    system.is_visible(window)
        && !system.is_cloaked(window)
        && is_popup_chain_root(system, window)
        && !is_tool_window(system, window)
        && !exclusions.is_excluded(system, window)
}

/// A window the resolver takes into account at all.
///
/// The virtual desktop query is the most expensive one, so it runs last.
pub fn is_candidate(
    system: &dyn WindowSystem,
    exclusions: &dyn ExclusionMatcher,
    window: WindowId,
) -> bool {
    system.is_visible(window)
        && !system.is_cloaked(window)
        && !exclusions.is_excluded(system, window)
        && system.is_on_current_desktop(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::{ExclusionList, ExclusionRules, NoExclusions};
    use crate::os::{MonitorId, StubWindow, StubWindowSystem};

    const MONITOR: MonitorId = MonitorId(1);

    #[test]
    fn test_plain_window_is_real_and_visible() {
        let system = StubWindowSystem::new();
        let window = system.add_window(StubWindow::app(MONITOR));

        assert!(is_real_window(&system, &NoExclusions, window));
        assert!(is_user_visible(&system, &NoExclusions, window));
        assert!(is_candidate(&system, &NoExclusions, window));
    }

    #[test]
    fn test_tool_window_is_not_real() {
        let system = StubWindowSystem::new();
        let window = system.add_window(StubWindow::app(MONITOR).with_ex_style(WS_EX_TOOLWINDOW));

        assert!(!is_real_window(&system, &NoExclusions, window));
        assert!(!is_user_visible(&system, &NoExclusions, window));
        // Tool windows still count for the maximized check
        assert!(is_candidate(&system, &NoExclusions, window));
    }

    #[test]
    fn test_owned_window_is_not_chain_root() {
        let system = StubWindowSystem::new();
        let owner = system.add_window(StubWindow::app(MONITOR));
        let dialog = system.add_window(StubWindow::app(MONITOR).owned_by(owner));

        assert!(is_popup_chain_root(&system, owner));
        assert!(!is_popup_chain_root(&system, dialog));
        assert!(!is_real_window(&system, &NoExclusions, dialog));
    }

    #[test]
    fn test_visible_popup_keeps_owner_as_root() {
        let system = StubWindowSystem::new();
        let owner = system.add_window(StubWindow::app(MONITOR));
        let popup = system.add_window(StubWindow::app(MONITOR).owned_by(owner));
        system.update(owner, |w| w.popup = Some(popup));

        assert!(is_popup_chain_root(&system, owner));
        assert!(!is_popup_chain_root(&system, popup));
    }

    #[test]
    fn test_hidden_popup_moves_chain_past_owner() {
        let system = StubWindowSystem::new();
        let owner = system.add_window(StubWindow::app(MONITOR));
        let popup = system.add_window(StubWindow::app(MONITOR).owned_by(owner).hidden());
        system.update(owner, |w| w.popup = Some(popup));

        // The walk continues through the hidden popup and ends there
        assert!(!is_popup_chain_root(&system, owner));
        assert!(!is_real_window(&system, &NoExclusions, owner));
    }

    #[test]
    fn test_invisible_title_bar_is_not_real() {
        let system = StubWindowSystem::new();
        let window = system.add_window(StubWindow::app(MONITOR).with_invisible_title_bar());
        assert!(!is_real_window(&system, &NoExclusions, window));
    }

    #[test]
    fn test_cloaked_and_other_desktop_are_not_candidates() {
        let system = StubWindowSystem::new();
        let cloaked = system.add_window(StubWindow::app(MONITOR).cloaked());
        let elsewhere = system.add_window(StubWindow::app(MONITOR).on_other_desktop());
        let hidden = system.add_window(StubWindow::app(MONITOR).hidden());

        for window in [cloaked, elsewhere, hidden] {
            assert!(!is_candidate(&system, &NoExclusions, window));
        }
        assert!(!is_user_visible(&system, &NoExclusions, cloaked));
        assert!(!is_real_window(&system, &NoExclusions, cloaked));
    }

    #[test]
    fn test_excluded_window() {
        let system = StubWindowSystem::new();
        let window = system.add_window(StubWindow::app(MONITOR).with_class("Rainmeter"));
        let exclusions = ExclusionList::new(ExclusionRules {
            class_names: vec!["Rainmeter".to_string()],
            ..Default::default()
        });

        assert!(!is_candidate(&system, &exclusions, window));
        assert!(!is_user_visible(&system, &exclusions, window));
        assert!(!is_real_window(&system, &exclusions, window));
        assert!(is_real_window(&system, &NoExclusions, window));
    }
}
