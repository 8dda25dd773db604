//! Hidden message window
//!
//! A plain top-level window that is never shown. Message-only windows do not
//! receive broadcasts, and both `WM_DISPLAYCHANGE` and `TaskbarCreated` are
//! broadcast. The window procedure runs on the polling thread while
//! [`MessageWindow::drain`] pumps, and only queues mapped events.

use lazy_static::lazy_static;
use parking_lot::Mutex;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, PeekMessageW,
    RegisterClassW, RegisterWindowMessageW, TranslateMessage, UnregisterClassW, CW_USEDEFAULT,
    MSG, PM_REMOVE, WNDCLASSW, WS_OVERLAPPEDWINDOW,
};

use crate::core::error::OsError;
use crate::engine::dispatch::{EventSource, HostEvent, MessageTable};

/// Window class of the message window
pub const WINDOW_CLASS: &str = "TranslucentTaskbar";

/// Title of the message window
pub const WINDOW_TITLE: &str = "TrayWindow";

/// Registered message a second instance sends to the first
pub const NEW_INSTANCE_MESSAGE: &str = "TranslucentTaskbar.NewInstance";

lazy_static! {
    static ref TABLE: Mutex<MessageTable> = Mutex::new(MessageTable::new());
    static ref PENDING: Mutex<Vec<HostEvent>> = Mutex::new(Vec::new());
}

pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Code of the registered new-instance message
pub fn new_instance_message() -> u32 {
    let name = wide(NEW_INSTANCE_MESSAGE);
    unsafe { RegisterWindowMessageW(PCWSTR::from_raw(name.as_ptr())) }
}

/// Hidden window feeding native notifications to the engine
pub struct MessageWindow {
    hwnd: HWND,
    class_name: Vec<u16>,
}

impl MessageWindow {
    pub fn create() -> Result<Self, OsError> {
        let taskbar_created = unsafe { RegisterWindowMessageW(w!("TaskbarCreated")) };
        *TABLE.lock() = MessageTable::standard(taskbar_created, new_instance_message());

        let class_name = wide(WINDOW_CLASS);
        let title = wide(WINDOW_TITLE);

        unsafe {
            let hinstance = GetModuleHandleW(None).map_err(|e| OsError::MessageWindowFailed {
                reason: format!("GetModuleHandleW failed: {:?}", e),
            })?;

            let wc = WNDCLASSW {
                lpfnWndProc: Some(window_proc),
                hInstance: hinstance.into(),
                lpszClassName: PCWSTR::from_raw(class_name.as_ptr()),
                ..Default::default()
            };

            if RegisterClassW(&wc) == 0 {
                return Err(OsError::MessageWindowFailed {
                    reason: format!(
                        "RegisterClassW failed: {:?}",
                        windows::core::Error::from_win32()
                    ),
                });
            }

            let hwnd = CreateWindowExW(
                Default::default(),
                PCWSTR::from_raw(class_name.as_ptr()),
                PCWSTR::from_raw(title.as_ptr()),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                None,
                None,
                hinstance,
                None,
            );

            if hwnd.0 == 0 {
                let _ = UnregisterClassW(PCWSTR::from_raw(class_name.as_ptr()), hinstance);
                return Err(OsError::MessageWindowFailed {
                    reason: format!(
                        "CreateWindowExW failed: {:?}",
                        windows::core::Error::from_win32()
                    ),
                });
            }

            tracing::debug!("Message window created: {:?}", hwnd);
            Ok(Self { hwnd, class_name })
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl EventSource for MessageWindow {
    fn drain(&mut self) -> Vec<HostEvent> {
        let mut msg = MSG::default();
        unsafe {
            // Pumps every window on this thread, the Aero Peek hook included
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        std::mem::take(&mut *PENDING.lock())
    }
}

impl Drop for MessageWindow {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
            if let Ok(hinstance) = GetModuleHandleW(None) {
                let _ = UnregisterClassW(PCWSTR::from_raw(self.class_name.as_ptr()), hinstance);
            }
        }
        PENDING.lock().clear();
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let event = TABLE.lock().lookup(msg);
    match event {
        Some(event) => {
            PENDING.lock().push(event);
            // WM_CLOSE must not reach DefWindowProc, the engine decides
            LRESULT(0)
        }
        None => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
