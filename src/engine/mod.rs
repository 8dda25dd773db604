//! Engine
//!
//! Owns every piece of run state: the taskbar directory, the applier and
//! peek memos, the configuration and exclusion rules. One engine drives one
//! polling loop on one thread.

pub mod dispatch;
pub mod tasks;


pub use dispatch::{EventSource, ExitReason, HostEvent, MessageTable};

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::core::color::Color;
use crate::core::config::AppConfig;
use crate::core::error::{ErrorRecovery, RecoveryAction, Result};
use crate::core::store::{ConfigStore, ExclusionStore, JsonStore, CONFIG_FILE, EXCLUDE_FILE};
use crate::exclusion::{ExclusionList, ExclusionRules};
use crate::logging::LogLevelHandle;
use crate::os::WindowSystem;
use crate::taskbar::accent::AccentMode;
use crate::taskbar::aero_peek::AeroPeekObserver;
use crate::taskbar::appearance::AppearanceApplier;
use crate::taskbar::directory::TaskbarDirectory;
use crate::taskbar::peek::PeekToggle;
use crate::taskbar::resolver::MonitorStateResolver;

/// Taskbar appearance engine
pub struct Engine<S: WindowSystem> {
    system: S,
    config: AppConfig,
    config_store: ConfigStore,
    /// The settings file on disk did not load; never write over it
    config_broken: bool,
    exclusions: ExclusionList,
    exclusion_store: ExclusionStore,
    directory: TaskbarDirectory,
    applier: AppearanceApplier,
    peek: PeekToggle,
    aero_peek: AeroPeekObserver,
    /// Peek visibility decided by the last resolution pass
    peek_visible: bool,
    ticks_since_resolve: u32,
    resolve_pending: bool,
    running: bool,
    exit_reason: Option<ExitReason>,
    log_level: Option<LogLevelHandle>,
    log_target: Option<PathBuf>,
    task_tx: Sender<HostEvent>,
    task_rx: Receiver<HostEvent>,
}

impl<S: WindowSystem> Engine<S> {
    /// Create an engine, loading both settings files.
    ///
    /// Missing files are created with defaults. Unreadable ones are logged
    /// and replaced by defaults in memory only; a broken settings file is
    /// left alone until it loads again or is reset.
    pub fn new(system: S, config_store: ConfigStore, exclusion_store: ExclusionStore) -> Self {
        let (config, config_loaded) = load_or_default(&config_store);
        let (rules, _) = load_or_default(&exclusion_store);
        let applier = AppearanceApplier::new(&system);
        let (task_tx, task_rx) = mpsc::channel();

        Self {
            system,
            config,
            config_store,
            config_broken: !config_loaded,
            exclusions: ExclusionList::new(rules),
            exclusion_store,
            directory: TaskbarDirectory::new(),
            applier,
            peek: PeekToggle::new(),
            aero_peek: AeroPeekObserver::new(),
            peek_visible: true,
            ticks_since_resolve: 0,
            resolve_pending: true,
            running: false,
            exit_reason: None,
            log_level: None,
            log_target: None,
            task_tx,
            task_rx,
        }
    }

    /// Create an engine backed by the files in `config_dir`
    pub fn open(system: S, config_dir: &Path) -> Self {
        Self::new(
            system,
            ConfigStore::new(config_dir.join(CONFIG_FILE)),
            ExclusionStore::new(config_dir.join(EXCLUDE_FILE)),
        )
    }

    /// Apply the `verbose` setting through this handle
    pub fn with_log_level(mut self, handle: LogLevelHandle) -> Self {
        if let Err(e) = handle.set_verbose(self.config.verbose) {
            tracing::warn!("Failed to apply log level: {}", e);
        }
        self.log_level = Some(handle);
        self
    }

    /// File or folder opened by [`HostEvent::OpenLog`]
    pub fn with_log_target(mut self, target: Option<PathBuf>) -> Self {
        self.log_target = target;
        self
    }

    /// Discover the taskbars. Fails when there is no primary taskbar.
    pub fn start(&mut self) -> Result<()> {
        self.refresh()?;
        self.running = true;
        tracing::info!("Engine started with {} taskbars", self.directory.len());
        Ok(())
    }

    /// Observer to hand to the Aero Peek event hook
    pub fn aero_peek(&self) -> AeroPeekObserver {
        self.aero_peek.clone()
    }

    /// Channel background tasks post their follow-up events to
    pub fn task_sender(&self) -> Sender<HostEvent> {
        self.task_tx.clone()
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    pub fn directory(&self) -> &TaskbarDirectory {
        &self.directory
    }

    pub fn peek_visible(&self) -> bool {
        self.peek_visible
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason
    }

    /// Whether the settings file failed to load and is kept as is
    pub fn is_config_broken(&self) -> bool {
        self.config_broken
    }

    /// Rebuild the directory and drop everything keyed by old handles
    pub fn refresh(&mut self) -> Result<()> {
        tracing::debug!("Refreshing taskbar handles");
        self.applier.invalidate();
        self.peek.invalidate();
        self.resolve_pending = true;
        self.directory.refresh(&self.system)
    }

    /// One polling tick: maybe resolve, then apply.
    pub fn tick(&mut self) -> Result<()> {
        if self.should_resolve() {
            let resolver = MonitorStateResolver::new(&self.system, &self.exclusions, &self.config);
            let resolution = resolver.resolve(&mut self.directory, self.aero_peek.is_active());
            self.peek_visible = resolution.peek_visible;
            self.ticks_since_resolve = 0;
            self.resolve_pending = false;
        }
        self.ticks_since_resolve = self.ticks_since_resolve.saturating_add(1);

        self.apply_appearance()?;

        if let Some(primary) = self.directory.primary() {
            self.peek
                .set_peek_visible(&self.system, primary, self.peek_visible);
        }
        Ok(())
    }

    fn should_resolve(&self) -> bool {
        let interval = self.config.scan_interval_ticks.max(1);
        self.resolve_pending || self.ticks_since_resolve >= interval
    }

    fn apply_appearance(&mut self) -> Result<()> {
        for (monitor, entry) in self.directory.entries() {
            let outcome =
                self.applier
                    .apply_state(&self.system, entry.window, entry.state, &self.config);
            if let Err(e) = outcome {
                tracing::debug!("Appearance not applied on monitor {:?}", monitor);
                recover(e)?;
            }
        }
        Ok(())
    }

    /// React to a host event
    pub fn handle(&mut self, event: HostEvent) -> Result<()> {
        tracing::debug!("Handling {:?}", event);
        match event {
            HostEvent::DisplayChanged => {
                tracing::info!("Display configuration changed");
                self.refresh()
            }
            HostEvent::ShellRestarted => {
                tracing::info!("Shell restarted, taskbars were recreated");
                self.refresh()
            }
            HostEvent::Exit(reason) => {
                self.stop(reason);
                Ok(())
            }
            HostEvent::ReloadConfig => {
                let config = match self.config_store.load() {
                    Ok(config) => config,
                    Err(e) => {
                        self.config_broken = true;
                        return Err(e.into());
                    }
                };
                self.config_broken = false;
                self.set_config(config);
                tracing::info!("Reloaded settings");
                Ok(())
            }
            HostEvent::ResetConfig => {
                let config = self.config_store.reset()?;
                self.config_broken = false;
                self.set_config(config);
                Ok(())
            }
            HostEvent::EditConfig => {
                if self.config_broken {
                    tracing::info!("Opening the settings file as is so it can be fixed");
                } else {
                    self.config_store.save(&self.config)?;
                }
                tasks::spawn_editor(
                    self.config_store.path().to_path_buf(),
                    Some(HostEvent::ReloadConfig),
                    self.task_sender(),
                )?;
                Ok(())
            }
            HostEvent::ReloadExclusions => {
                let rules = self.exclusion_store.load()?;
                self.set_exclusions(rules);
                tracing::info!("Reloaded exclusion rules");
                Ok(())
            }
            HostEvent::ResetExclusions => {
                let rules = self.exclusion_store.reset()?;
                self.set_exclusions(rules);
                Ok(())
            }
            HostEvent::EditExclusions => {
                tasks::spawn_editor(
                    self.exclusion_store.path().to_path_buf(),
                    Some(HostEvent::ReloadExclusions),
                    self.task_sender(),
                )?;
                Ok(())
            }
            HostEvent::ClearExclusionCache => {
                self.exclusions.clear_cache();
                Ok(())
            }
            HostEvent::OpenLog => {
                match &self.log_target {
                    Some(target) => {
                        tasks::spawn_open(target.clone())?;
                    }
                    None => tracing::warn!("Logs are not written to a file"),
                }
                Ok(())
            }
        }
    }

    /// Replace the configuration; takes effect on the next tick
    pub fn set_config(&mut self, config: AppConfig) {
        if config.verbose != self.config.verbose {
            if let Some(handle) = &self.log_level {
                if let Err(e) = handle.set_verbose(config.verbose) {
                    tracing::warn!("Failed to apply log level: {}", e);
                }
            }
        }
        self.config = config;
        self.resolve_pending = true;
    }

    pub fn set_exclusions(&mut self, rules: ExclusionRules) {
        self.exclusions.replace_rules(rules);
        self.resolve_pending = true;
    }

    /// Ask the loop to stop at the next tick boundary
    pub fn stop(&mut self, reason: ExitReason) {
        tracing::info!("Exiting: {:?}", reason);
        self.running = false;
        self.exit_reason = Some(reason);
    }

    /// Put the taskbars back the way the shell draws them and save
    /// the settings, as the exit reason dictates.
    pub fn shutdown(&mut self) -> Result<()> {
        let reason = self.exit_reason.unwrap_or(ExitReason::UserAction);

        if reason.saves_config() && self.config_broken {
            tracing::warn!(
                "Not saving settings, {:?} did not load and is kept as is",
                self.config_store.path()
            );
        } else if reason.saves_config() {
            if let Err(e) = self.config_store.save(&self.config) {
                tracing::warn!("Failed to save settings on exit: {}", e);
            }
        }

        if !reason.restores_taskbars() {
            return Ok(());
        }

        if let Some(primary) = self.directory.primary() {
            self.peek.set_peek_visible(&self.system, primary, true);
        }
        for (_, entry) in self.directory.entries() {
            if let Err(e) =
                self.applier
                    .apply(&self.system, entry.window, AccentMode::Normal, Color::TRANSPARENT)
            {
                recover(e)?;
            }
        }
        Ok(())
    }

    /// Poll events and tick until an exit is requested, then shut down.
    pub fn run(&mut self, source: &mut dyn EventSource) -> Result<ExitReason> {
        self.running = true;

        while self.running {
            let mut events = source.drain();
            events.extend(self.task_rx.drain());

            for event in events {
                if let Err(e) = self.handle(event) {
                    tracing::warn!("Failed to handle {:?}: {}", event, e);
                    recover(e)?;
                }
                if !self.running {
                    break;
                }
            }

            if !self.running {
                break;
            }

            self.tick()?;
            thread::sleep(Duration::from_millis(self.config.sleep_time_ms));
        }

        self.shutdown()?;
        Ok(self.exit_reason.unwrap_or(ExitReason::UserAction))
    }
}

/// Swallow everything but fatal errors
fn recover(err: crate::core::error::TaskbarError) -> Result<()> {
    match err.recovery_action() {
        RecoveryAction::Abort => Err(err),
        RecoveryAction::Disable => {
            tracing::warn!("Disabling feature: {}", err);
            Ok(())
        }
        RecoveryAction::Skip => {
            tracing::debug!("Skipping: {}", err);
            Ok(())
        }
    }
}

/// The stored value, or the defaults and `false` when the file did not load
fn load_or_default<T>(store: &JsonStore<T>) -> (T, bool)
where
    T: serde::Serialize + serde::de::DeserializeOwned + Default,
{
    match store.load() {
        Ok(value) => (value, true),
        Err(e) => {
            tracing::warn!("Failed to load {:?}, using defaults: {}", store.path(), e);
            (T::default(), false)
        }
    }
}
