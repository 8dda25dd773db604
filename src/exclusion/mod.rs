//! Window exclusion rules
//!
//! Windows matching a rule are invisible to the resolver: they never make a
//! monitor maximized and never make the peek button show up.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::os::{WindowId, WindowIdentity, WindowSystem};

/// Cached verdicts are dropped wholesale past this size
const MAX_CACHED_WINDOWS: usize = 1024;

/// Decides whether a window is ignored
pub trait ExclusionMatcher {
    fn is_excluded(&self, system: &dyn WindowSystem, window: WindowId) -> bool;
}

/// Matcher that excludes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusions;

impl ExclusionMatcher for NoExclusions {
    fn is_excluded(&self, _system: &dyn WindowSystem, _window: WindowId) -> bool {
        false
    }
}

/// Contents of `exclude.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRules {
    /// Exact window class names
    #[serde(default)]
    pub class_names: Vec<String>,

    /// Substrings of window titles
    #[serde(default)]
    pub titles: Vec<String>,

    /// Process image file names, compared case-insensitively
    #[serde(default)]
    pub executables: Vec<String>,
}

impl ExclusionRules {
    pub fn is_empty(&self) -> bool {
        self.class_names.is_empty() && self.titles.is_empty() && self.executables.is_empty()
    }

    /// Whether any rule matches `identity`
    pub fn matches(&self, identity: &WindowIdentity) -> bool {
        if self.class_names.iter().any(|c| *c == identity.class_name) {
            return true;
        }

        if self
            .titles
            .iter()
            .any(|t| !t.is_empty() && identity.title.contains(t.as_str()))
        {
            return true;
        }

        match &identity.executable {
            Some(exe) => self.executables.iter().any(|e| e.eq_ignore_ascii_case(exe)),
            None => false,
        }
    }
}

/// Rule-based matcher with a per-window verdict cache
#[derive(Debug, Default)]
pub struct ExclusionList {
    rules: ExclusionRules,
    cache: Mutex<HashMap<WindowId, bool>>,
}

impl ExclusionList {
    pub fn new(rules: ExclusionRules) -> Self {
        Self {
            rules,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    /// Swap in new rules, dropping every cached verdict
    pub fn replace_rules(&mut self, rules: ExclusionRules) {
        self.rules = rules;
        self.clear_cache();
    }

    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock();
        tracing::debug!("Clearing {} cached exclusion verdicts", cache.len());
        cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl ExclusionMatcher for ExclusionList {
    fn is_excluded(&self, system: &dyn WindowSystem, window: WindowId) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        if let Some(verdict) = self.cache.lock().get(&window) {
            return *verdict;
        }

        let verdict = self.rules.matches(&system.identity(window));

        let mut cache = self.cache.lock();
        if cache.len() >= MAX_CACHED_WINDOWS {
            cache.clear();
        }
        cache.insert(window, verdict);
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os::{MonitorId, StubWindow, StubWindowSystem};

    fn identity(class_name: &str, title: &str, executable: Option<&str>) -> WindowIdentity {
        WindowIdentity {
            class_name: class_name.to_string(),
            title: title.to_string(),
            executable: executable.map(str::to_string),
        }
    }

    #[test]
    fn test_rule_kinds() {
        let rules = ExclusionRules {
            class_names: vec!["Rainmeter".to_string()],
            titles: vec!["Picture-in-Picture".to_string()],
            executables: vec!["vlc.exe".to_string()],
        };

        assert!(rules.matches(&identity("Rainmeter", "", None)));
        assert!(!rules.matches(&identity("rainmeter", "", None)));
        assert!(rules.matches(&identity("Chrome_WidgetWin_1", "Picture-in-Picture - Video", None)));
        assert!(rules.matches(&identity("Qt5QWindowIcon", "movie.mkv", Some("VLC.EXE"))));
        assert!(!rules.matches(&identity("Notepad", "notes.txt", Some("notepad.exe"))));
    }

    #[test]
    fn test_empty_title_rule_matches_nothing() {
        let rules = ExclusionRules {
            titles: vec![String::new()],
            ..Default::default()
        };
        assert!(!rules.matches(&identity("Notepad", "notes.txt", None)));
    }

    #[test]
    fn test_verdicts_are_cached_until_cleared() {
        let system = StubWindowSystem::new();
        let window = system.add_window(StubWindow::app(MonitorId(1)).with_class("Rainmeter"));
        let list = ExclusionList::new(ExclusionRules {
            class_names: vec!["Rainmeter".to_string()],
            ..Default::default()
        });

        assert!(list.is_excluded(&system, window));
        assert_eq!(list.cached_len(), 1);

        // The cache hides the class change
        system.update(window, |w| w.class_name = "Other".to_string());
        assert!(list.is_excluded(&system, window));

        list.clear_cache();
        assert!(!list.is_excluded(&system, window));
    }

    #[test]
    fn test_replace_rules_drops_cache() {
        let system = StubWindowSystem::new();
        let window = system.add_window(StubWindow::app(MonitorId(1)).with_title("Overlay"));
        let mut list = ExclusionList::new(ExclusionRules::default());
        assert!(!list.is_excluded(&system, window));

        list.replace_rules(ExclusionRules {
            titles: vec!["Overlay".to_string()],
            ..Default::default()
        });
        assert_eq!(list.cached_len(), 0);
        assert!(list.is_excluded(&system, window));
    }

    #[test]
    fn test_rules_parse_partial_file() {
        let rules: ExclusionRules = serde_json::from_str(r#"{ "executables": ["a.exe"] }"#).unwrap();
        assert_eq!(rules.executables, vec!["a.exe".to_string()]);
        assert!(rules.class_names.is_empty());
    }
}
