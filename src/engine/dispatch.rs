//! Host events and native message dispatch
//!
//! Native notifications are translated into [`HostEvent`]s through an
//! explicit [`MessageTable`], and the engine drains them from an
//! [`EventSource`] on its own thread once per tick.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, TryRecvError};

/// `WM_CLOSE`
pub const WM_CLOSE: u32 = 0x0010;

/// `WM_DISPLAYCHANGE`
pub const WM_DISPLAYCHANGE: u32 = 0x007E;

/// Why the engine stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitReason {
    /// Another instance took over; leave the taskbars alone
    NewInstance,
    /// The user asked to exit
    UserAction,
    /// The user asked to exit and discard unsaved settings
    UserActionNoSave,
}

impl ExitReason {
    pub fn restores_taskbars(self) -> bool {
        self != ExitReason::NewInstance
    }

    pub fn saves_config(self) -> bool {
        self == ExitReason::UserAction
    }
}

/// Everything the engine reacts to besides the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// The display configuration changed
    DisplayChanged,
    /// Explorer recreated its taskbars
    ShellRestarted,
    Exit(ExitReason),
    ReloadConfig,
    ResetConfig,
    EditConfig,
    ReloadExclusions,
    ResetExclusions,
    EditExclusions,
    ClearExclusionCache,
    OpenLog,
}

/// Native message code to event
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    entries: HashMap<u32, HostEvent>,
}

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The messages the message window understands.
    ///
    /// `taskbar_created` and `new_instance` are registered window messages,
    /// so their codes are only known at runtime.
    pub fn standard(taskbar_created: u32, new_instance: u32) -> Self {
        let mut table = Self::new();
        table.register(WM_DISPLAYCHANGE, HostEvent::DisplayChanged);
        table.register(WM_CLOSE, HostEvent::Exit(ExitReason::UserAction));
        table.register(taskbar_created, HostEvent::ShellRestarted);
        table.register(new_instance, HostEvent::Exit(ExitReason::NewInstance));
        table
    }

    /// Map `code` to `event`, replacing any previous mapping
    pub fn register(&mut self, code: u32, event: HostEvent) {
        if code == 0 {
            tracing::warn!("Ignoring mapping for message code 0 to {:?}", event);
            return;
        }
        self.entries.insert(code, event);
    }

    pub fn lookup(&self, code: u32) -> Option<HostEvent> {
        self.entries.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the engine polls its events from
pub trait EventSource {
    /// Everything that arrived since the last call, in arrival order
    fn drain(&mut self) -> Vec<HostEvent>;
}

impl EventSource for Receiver<HostEvent> {
    fn drain(&mut self) -> Vec<HostEvent> {
        let mut events = Vec::new();
        loop {
            match self.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::trace!("Event channel disconnected");
                    break;
                }
            }
        }
        events
    }
}
