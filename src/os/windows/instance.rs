//! Single instance
//!
//! A named mutex marks the running instance. A newcomer asks the old one to
//! exit through its message window and then takes over.

use windows::core::PCWSTR;
use windows::Win32::Foundation::{
    CloseHandle, GetLastError, BOOL, ERROR_ALREADY_EXISTS, HANDLE, LPARAM, WPARAM,
};
use windows::Win32::System::Threading::CreateMutexW;
use windows::Win32::UI::WindowsAndMessaging::{FindWindowW, SendMessageW};

use super::message_window::{new_instance_message, wide, WINDOW_CLASS, WINDOW_TITLE};
use crate::core::error::OsError;

const MUTEX_NAME: &str = "Local\\TranslucentTaskbar";

/// Held for the lifetime of the process
pub struct InstanceGuard {
    mutex: HANDLE,
    replaced_existing: bool,
}

impl InstanceGuard {
    /// Claim the instance mutex, asking a running instance to exit first
    pub fn acquire() -> Result<Self, OsError> {
        let name = wide(MUTEX_NAME);
        let mutex =
            unsafe { CreateMutexW(None, BOOL::from(false), PCWSTR::from_raw(name.as_ptr())) }
                .map_err(|e| OsError::InstanceCheckFailed {
                    reason: format!("CreateMutexW failed: {:?}", e),
                })?;

        let replaced_existing = unsafe { GetLastError() } == ERROR_ALREADY_EXISTS;
        if replaced_existing {
            tracing::info!("Another instance is running, asking it to exit");
            notify_running_instance();
        }

        Ok(Self {
            mutex,
            replaced_existing,
        })
    }

    /// Whether another instance was told to step aside
    pub fn replaced_existing(&self) -> bool {
        self.replaced_existing
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.mutex);
        }
    }
}

/// Send the new-instance message to a running instance, if there is one
pub fn notify_running_instance() -> bool {
    let class_name = wide(WINDOW_CLASS);
    let title = wide(WINDOW_TITLE);
    unsafe {
        let hwnd = FindWindowW(
            PCWSTR::from_raw(class_name.as_ptr()),
            PCWSTR::from_raw(title.as_ptr()),
        );
        if hwnd.0 == 0 {
            return false;
        }
        // Synchronous: the old instance has stopped reacting once this returns
        SendMessageW(hwnd, new_instance_message(), WPARAM(0), LPARAM(0));
    }
    true
}
