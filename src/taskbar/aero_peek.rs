//! Aero Peek activity flag
//!
//! Written from the event hook callback, read by the resolver. A single
//! atomic flag is all the state there is; a stale read is corrected on the
//! next tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Undocumented event raised when Aero Peek starts
pub const EVENT_AERO_PEEK_START: u32 = 0x21;

/// Undocumented event raised when Aero Peek ends
pub const EVENT_AERO_PEEK_END: u32 = 0x22;

#[derive(Debug, Clone, Default)]
pub struct AeroPeekObserver {
    active: Arc<AtomicBool>,
}

impl AeroPeekObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event in the hooked range; the last event wins.
    pub fn on_event(&self, event: u32) {
        self.active
            .store(event == EVENT_AERO_PEEK_START, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Whether both handles write the same flag
    pub fn shares_flag_with(&self, other: &AeroPeekObserver) -> bool {
        Arc::ptr_eq(&self.active, &other.active)
    }
}
