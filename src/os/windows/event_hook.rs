//! Aero Peek event hook
//!
//! Out-of-context hooks are delivered on the installing thread while it
//! pumps messages. The callback only touches the observer's atomic flag.

use std::sync::OnceLock;

use windows::Win32::Foundation::{HMODULE, HWND};
use windows::Win32::UI::Accessibility::{SetWinEventHook, UnhookWinEvent, HWINEVENTHOOK};

use crate::core::error::OsError;
use crate::taskbar::aero_peek::{AeroPeekObserver, EVENT_AERO_PEEK_END, EVENT_AERO_PEEK_START};

/// `WINEVENT_OUTOFCONTEXT`
const WINEVENT_OUTOFCONTEXT: u32 = 0;

/// Set by the first install and kept for the life of the process
static OBSERVER: OnceLock<AeroPeekObserver> = OnceLock::new();

/// Installed hook; unhooked on drop
pub struct AeroPeekHook {
    hook: HWINEVENTHOOK,
}

impl AeroPeekHook {
    /// Hook Aero Peek events into `observer`.
    ///
    /// Every install in a process must pass a clone of the same observer.
    pub fn install(observer: AeroPeekObserver) -> Result<Self, OsError> {
        let installed = OBSERVER.get_or_init(|| observer.clone());
        if !installed.shares_flag_with(&observer) {
            return Err(OsError::EventHookFailed {
                reason: "hook already feeds another observer".to_string(),
            });
        }

        let hook = unsafe {
            SetWinEventHook(
                EVENT_AERO_PEEK_START,
                EVENT_AERO_PEEK_END,
                HMODULE(0),
                Some(win_event_proc),
                0,
                0,
                WINEVENT_OUTOFCONTEXT,
            )
        };

        if hook.0 == 0 {
            return Err(OsError::EventHookFailed {
                reason: format!("{:?}", windows::core::Error::from_win32()),
            });
        }

        tracing::debug!("Aero Peek hook installed");
        Ok(Self { hook })
    }
}

impl Drop for AeroPeekHook {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWinEvent(self.hook);
        }
        if let Some(observer) = OBSERVER.get() {
            observer.on_event(EVENT_AERO_PEEK_END);
        }
        tracing::debug!("Aero Peek hook removed");
    }
}

unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    _hwnd: HWND,
    _id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    if let Some(observer) = OBSERVER.get() {
        observer.on_event(event);
    }
}
