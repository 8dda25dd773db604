//! Scenario and property tests for monitor state resolution
//!
//! These tests drive the resolver, applier and peek toggle together against
//! the stub window system.

use crate::core::config::{AppConfig, PeekMode};
use crate::exclusion::NoExclusions;
use crate::os::{MonitorId, StubWindow, StubWindowSystem, WS_EX_TOOLWINDOW};
use crate::taskbar::directory::TaskbarDirectory;
use crate::taskbar::resolver::{MonitorStateResolver, Resolution};
use crate::taskbar::state::MonitorState;

const PRIMARY: MonitorId = MonitorId(1);
const SECONDARY: MonitorId = MonitorId(2);

fn desktop() -> (StubWindowSystem, TaskbarDirectory) {
    let system = StubWindowSystem::new();
    system.add_primary_taskbar(PRIMARY);
    system.add_secondary_taskbar(SECONDARY);

    let mut directory = TaskbarDirectory::new();
    directory.refresh(&system).unwrap();
    (system, directory)
}

fn resolve(
    system: &StubWindowSystem,
    directory: &mut TaskbarDirectory,
    config: &AppConfig,
    aero_peek_active: bool,
) -> Resolution {
    MonitorStateResolver::new(system, &NoExclusions, config).resolve(directory, aero_peek_active)
}

fn state_of(directory: &TaskbarDirectory, monitor: MonitorId) -> MonitorState {
    directory.entry(monitor).unwrap().state
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_enabled_peek_without_dynamic_flags_is_always_visible() {
        let (system, mut directory) = desktop();
        let config = AppConfig::default();

        assert!(resolve(&system, &mut directory, &config, false).peek_visible);

        system.add_window(StubWindow::app(PRIMARY).maximized());
        system.add_window(StubWindow::app(SECONDARY).minimized());
        assert!(resolve(&system, &mut directory, &config, false).peek_visible);
        assert!(resolve(&system, &mut directory, &config, true).peek_visible);
    }

    #[test]
    fn test_disabled_peek_is_never_visible() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.peek = PeekMode::Disabled;
        config.dynamic_windows.enabled = true;
        system.add_window(StubWindow::app(PRIMARY).maximized());

        assert!(!resolve(&system, &mut directory, &config, false).peek_visible);
    }

    #[test]
    fn test_maximized_on_secondary_with_static_peek() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.dynamic_windows.enabled = true;
        config.peek = PeekMode::Disabled;
        system.add_window(StubWindow::app(SECONDARY).maximized());

        let resolution = resolve(&system, &mut directory, &config, false);
        assert_eq!(state_of(&directory, SECONDARY), MonitorState::WindowMaximized);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::Normal);
        assert!(!resolution.peek_visible);
    }

    #[test]
    fn test_dynamic_peek_follows_primary_monitor_only() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.peek = PeekMode::Dynamic;

        let secondary_window = system.add_window(StubWindow::app(SECONDARY).maximized());
        let resolution = resolve(&system, &mut directory, &config, false);
        assert!(!resolution.peek_visible);
        // Dynamic windows is off, the classification stays normal
        assert_eq!(state_of(&directory, SECONDARY), MonitorState::Normal);

        system.update(secondary_window, |w| w.monitor = PRIMARY);
        assert!(resolve(&system, &mut directory, &config, false).peek_visible);
    }

    #[test]
    fn test_generous_peek_with_any_real_window() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.peek = PeekMode::DynamicGenerous;

        // Only the taskbars exist, and they are tool windows
        assert!(!resolve(&system, &mut directory, &config, false).peek_visible);

        system.add_window(StubWindow::app(SECONDARY));
        assert!(resolve(&system, &mut directory, &config, false).peek_visible);
    }

    #[test]
    fn test_generous_peek_ignores_minimized_and_tool_windows() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.peek = PeekMode::DynamicGenerous;

        system.add_window(StubWindow::app(PRIMARY).minimized());
        system.add_window(StubWindow::app(PRIMARY).with_ex_style(WS_EX_TOOLWINDOW));
        system.add_window(StubWindow::app(PRIMARY).cloaked());
        system.add_window(StubWindow::app(PRIMARY).on_other_desktop());
        system.add_window(StubWindow::app(PRIMARY).with_invisible_title_bar());

        assert!(!resolve(&system, &mut directory, &config, false).peek_visible);
    }

    #[test]
    fn test_start_menu_wins_over_maximized_window() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.dynamic_windows.enabled = true;
        config.dynamic_start = true;

        system.add_window(StubWindow::app(SECONDARY).maximized());
        system.open_start_menu(SECONDARY);

        resolve(&system, &mut directory, &config, false);
        assert_eq!(state_of(&directory, SECONDARY), MonitorState::StartMenuOpen);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::Normal);
    }

    #[test]
    fn test_start_menu_requires_dynamic_start() {
        let (system, mut directory) = desktop();
        let config = AppConfig::default();
        system.open_start_menu(PRIMARY);

        resolve(&system, &mut directory, &config, false);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::Normal);
    }

    #[test]
    fn test_closed_start_menu_window_is_ignored() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.dynamic_start = true;
        system.open_start_menu(PRIMARY);
        system.close_start_menu();

        resolve(&system, &mut directory, &config, false);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::Normal);
    }

    #[test]
    fn test_aero_peek_override_forces_normal() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.dynamic_windows.enabled = true;
        config.dynamic_windows.regular_on_peek = true;
        config.dynamic_start = true;

        system.add_window(StubWindow::app(PRIMARY).maximized());
        system.open_start_menu(SECONDARY);

        resolve(&system, &mut directory, &config, true);
        assert!(directory
            .entries()
            .all(|(_, entry)| entry.state == MonitorState::Normal));

        resolve(&system, &mut directory, &config, false);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::WindowMaximized);
        assert_eq!(state_of(&directory, SECONDARY), MonitorState::StartMenuOpen);
    }

    #[test]
    fn test_classification_is_recomputed_each_pass() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.dynamic_windows.enabled = true;

        let window = system.add_window(StubWindow::app(PRIMARY).maximized());
        resolve(&system, &mut directory, &config, false);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::WindowMaximized);

        system.remove_window(window);
        resolve(&system, &mut directory, &config, false);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::Normal);
    }

    #[test]
    fn test_later_window_does_not_downgrade() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.dynamic_windows.enabled = true;

        system.add_window(StubWindow::app(PRIMARY).maximized());
        system.add_window(StubWindow::app(PRIMARY));
        system.add_window(StubWindow::app(PRIMARY).minimized());

        resolve(&system, &mut directory, &config, false);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::WindowMaximized);
    }

    #[test]
    fn test_window_on_monitor_without_taskbar_is_skipped() {
        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.dynamic_windows.enabled = true;
        system.add_window(StubWindow::app(MonitorId(9)).maximized());

        resolve(&system, &mut directory, &config, false);
        assert_eq!(directory.len(), 2);
        assert!(directory
            .entries()
            .all(|(_, entry)| entry.state == MonitorState::Normal));
    }

    #[test]
    fn test_excluded_maximized_window_is_ignored() {
        use crate::exclusion::{ExclusionList, ExclusionRules};

        let (system, mut directory) = desktop();
        let mut config = AppConfig::default();
        config.dynamic_windows.enabled = true;
        system.add_window(StubWindow::app(PRIMARY).maximized().with_executable("Game.EXE"));

        let exclusions = ExclusionList::new(ExclusionRules {
            executables: vec!["game.exe".to_string()],
            ..Default::default()
        });
        MonitorStateResolver::new(&system, &exclusions, &config).resolve(&mut directory, false);
        assert_eq!(state_of(&directory, PRIMARY), MonitorState::Normal);
    }
}

mod property_tests {
    use super::*;
    use crate::core::color::Color;
    use crate::os::ShowState;
    use crate::taskbar::accent::AccentMode;
    use crate::taskbar::appearance::AppearanceApplier;
    use crate::taskbar::peek::{PeekOutcome, PeekToggle};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct WindowTraits {
        monitor: usize,
        show_state: ShowState,
        visible: bool,
        cloaked: bool,
        tool: bool,
        on_current_desktop: bool,
    }

    fn window_traits() -> impl Strategy<Value = WindowTraits> {
        (
            1usize..4,
            prop_oneof![
                Just(ShowState::Normal),
                Just(ShowState::Maximized),
                Just(ShowState::Minimized)
            ],
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(
                |(monitor, show_state, visible, cloaked, tool, on_current_desktop)| WindowTraits {
                    monitor,
                    show_state,
                    visible,
                    cloaked,
                    tool,
                    on_current_desktop,
                },
            )
    }

    fn peek_mode() -> impl Strategy<Value = PeekMode> {
        prop_oneof![
            Just(PeekMode::Enabled),
            Just(PeekMode::Dynamic),
            Just(PeekMode::DynamicGenerous),
            Just(PeekMode::Disabled)
        ]
    }

    fn config_strategy() -> impl Strategy<Value = AppConfig> {
        (any::<bool>(), any::<bool>(), any::<bool>(), peek_mode()).prop_map(
            |(dynamic_windows, dynamic_start, regular_on_peek, peek)| {
                let mut config = AppConfig::default();
                config.dynamic_windows.enabled = dynamic_windows;
                config.dynamic_windows.regular_on_peek = regular_on_peek;
                config.dynamic_start = dynamic_start;
                config.peek = peek;
                config
            },
        )
    }

    fn populate(all_traits: &[WindowTraits]) -> (StubWindowSystem, TaskbarDirectory) {
        let system = StubWindowSystem::new();
        system.add_primary_taskbar(MonitorId(1));
        system.add_secondary_taskbar(MonitorId(2));
        system.add_secondary_taskbar(MonitorId(3));

        for traits in all_traits {
            let mut window = StubWindow::app(MonitorId(traits.monitor));
            window.show_state = traits.show_state;
            window.visible = traits.visible;
            window.cloaked = traits.cloaked;
            window.on_current_desktop = traits.on_current_desktop;
            if traits.tool {
                window.ex_style = WS_EX_TOOLWINDOW;
            }
            system.add_window(window);
        }

        let mut directory = TaskbarDirectory::new();
        directory.refresh(&system).unwrap();
        (system, directory)
    }

    fn counts(traits: &WindowTraits) -> bool {
        traits.visible && !traits.cloaked && traits.on_current_desktop
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: the start menu always wins on its monitor
        #[test]
        fn start_menu_beats_maximized(
            all_traits in prop::collection::vec(window_traits(), 0..12),
            start_monitor in 1usize..4,
        ) {
            let (system, mut directory) = populate(&all_traits);
            system.add_window(StubWindow::app(MonitorId(start_monitor)).maximized());
            system.open_start_menu(MonitorId(start_monitor));

            let mut config = AppConfig::default();
            config.dynamic_windows.enabled = true;
            config.dynamic_start = true;

            resolve(&system, &mut directory, &config, false);
            prop_assert_eq!(
                state_of(&directory, MonitorId(start_monitor)),
                MonitorState::StartMenuOpen
            );
        }

        /// Property: the Aero Peek override forces every monitor to normal
        #[test]
        fn aero_peek_override_is_total(
            all_traits in prop::collection::vec(window_traits(), 0..12),
            mut config in config_strategy(),
        ) {
            let (system, mut directory) = populate(&all_traits);
            system.open_start_menu(MonitorId(2));
            config.dynamic_windows.regular_on_peek = true;

            resolve(&system, &mut directory, &config, true);
            for (_, entry) in directory.entries() {
                prop_assert_eq!(entry.state, MonitorState::Normal);
            }
        }

        /// Property: a monitor is maximized exactly when a counted maximized
        /// window is on it and dynamic windows is enabled
        #[test]
        fn maximized_classification_matches_window_set(
            all_traits in prop::collection::vec(window_traits(), 0..12),
            config in config_strategy(),
        ) {
            let (system, mut directory) = populate(&all_traits);
            resolve(&system, &mut directory, &config, false);

            for monitor in 1usize..4 {
                let expected = config.dynamic_windows.enabled
                    && all_traits.iter().any(|s| {
                        s.monitor == monitor && counts(s) && s.show_state == ShowState::Maximized
                    });
                let state = state_of(&directory, MonitorId(monitor));
                prop_assert_eq!(state == MonitorState::WindowMaximized, expected);
            }
        }

        /// Property: peek visibility follows the configured mode
        #[test]
        fn peek_visibility_follows_mode(
            all_traits in prop::collection::vec(window_traits(), 0..12),
            config in config_strategy(),
            aero_peek in any::<bool>(),
        ) {
            let (system, mut directory) = populate(&all_traits);
            let resolution = resolve(&system, &mut directory, &config, aero_peek);

            let maximized_on_primary = all_traits
                .iter()
                .any(|s| s.monitor == 1 && counts(s) && s.show_state == ShowState::Maximized);
            let any_real = all_traits.iter().any(|s| {
                counts(s) && !s.tool && s.show_state == ShowState::Normal
            });

            let expected = match config.peek {
                PeekMode::Enabled => true,
                PeekMode::Disabled => false,
                PeekMode::Dynamic => maximized_on_primary,
                PeekMode::DynamicGenerous => maximized_on_primary || any_real,
            };
            prop_assert_eq!(resolution.peek_visible, expected);
        }

        /// Property: non-inert modes always reach the composition API, the
        /// inert mode notifies at most once per transition
        #[test]
        fn applier_memoizes_only_inert(
            modes in prop::collection::vec(
                prop::sample::select(AccentMode::ALL.to_vec()),
                1..20
            ),
            color in any::<u32>(),
        ) {
            let system = StubWindowSystem::new();
            let taskbar = system.add_primary_taskbar(MonitorId(1));
            let mut applier = AppearanceApplier::new(&system);

            let mut expected_notifications = 0;
            let mut inert = false;
            for mode in &modes {
                applier.apply(&system, taskbar, *mode, Color(color)).unwrap();
                if mode.is_inert() {
                    if !inert {
                        expected_notifications += 1;
                    }
                    inert = true;
                } else {
                    inert = false;
                }
            }

            let policies = modes.iter().filter(|m| !m.is_inert()).count();
            prop_assert_eq!(system.composition_calls().len(), policies);
            prop_assert_eq!(system.theme_changed_calls().len(), expected_notifications);
        }

        /// Property: repeating a peek request on the same taskbar writes nothing
        #[test]
        fn peek_toggle_dedupes(desired in prop::collection::vec(any::<bool>(), 1..20)) {
            let system = StubWindowSystem::new();
            let taskbar = system.add_primary_taskbar(MonitorId(1));
            let mut toggle = PeekToggle::new();

            let mut last = None;
            for value in desired {
                let outcome = toggle.set_peek_visible(&system, taskbar, value);
                if last == Some(value) {
                    prop_assert_eq!(outcome, PeekOutcome::Unchanged);
                } else {
                    prop_assert_ne!(outcome, PeekOutcome::Unchanged);
                }
                last = Some(value);
            }
        }
    }
}
