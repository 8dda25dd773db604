//! `SetWindowCompositionAttribute`
//!
//! Undocumented, exported by user32 on Windows 10 and later. Looked up once
//! at start-up; when missing, appearance changes are disabled for good.

use std::ffi::c_void;

use windows::core::{s, w};
use windows::Win32::Foundation::{BOOL, HWND};
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};

use crate::core::error::OsError;
use crate::taskbar::accent::{AccentPolicy, WCA_ACCENT_POLICY};

/// `WINDOWCOMPOSITIONATTRIBDATA`
#[repr(C)]
struct WindowCompositionAttribData {
    attribute: u32,
    data: *mut c_void,
    size_of_data: usize,
}

type SetWindowCompositionAttributeFn =
    unsafe extern "system" fn(HWND, *mut WindowCompositionAttribData) -> BOOL;

/// Resolved composition entry point
pub struct CompositionApi {
    set_attribute: SetWindowCompositionAttributeFn,
}

impl CompositionApi {
    /// Look up the entry point, `None` when this Windows build lacks it
    pub fn load() -> Option<Self> {
        unsafe {
            let user32 = GetModuleHandleW(w!("user32.dll")).ok()?;
            let proc = GetProcAddress(user32, s!("SetWindowCompositionAttribute"))?;
            Some(Self {
                set_attribute: std::mem::transmute::<
                    unsafe extern "system" fn() -> isize,
                    SetWindowCompositionAttributeFn,
                >(proc),
            })
        }
    }

    pub fn set_accent_policy(&self, hwnd: HWND, policy: &AccentPolicy) -> Result<(), OsError> {
        let mut policy = *policy;
        let mut data = WindowCompositionAttribData {
            attribute: WCA_ACCENT_POLICY,
            data: &mut policy as *mut AccentPolicy as *mut c_void,
            size_of_data: std::mem::size_of::<AccentPolicy>(),
        };

        let ok = unsafe { (self.set_attribute)(hwnd, &mut data) };
        if ok.as_bool() {
            Ok(())
        } else {
            Err(OsError::CompositionCallFailed {
                reason: format!("{:?}", windows::core::Error::from_win32()),
            })
        }
    }
}

impl std::fmt::Debug for CompositionApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionApi").finish_non_exhaustive()
    }
}
