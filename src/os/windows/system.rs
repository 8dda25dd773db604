//! Win32 window system
//!
//! The live implementation of [`WindowSystem`]. Window enumeration fills an
//! owned `Vec` from the `EnumWindows` callback; nothing else re-enters.

use std::ffi::c_void;
use std::path::Path;

use windows::core::PCWSTR;
use windows::core::PWSTR;
use windows::Win32::Foundation::{CloseHandle, BOOL, COLORREF, HWND, LPARAM, WPARAM};
use windows::Win32::Graphics::Dwm::{DwmGetWindowAttribute, DWMWA_CLOAKED};
use windows::Win32::Graphics::Gdi::{MonitorFromWindow, MONITOR_DEFAULTTOPRIMARY};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED,
};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::Shell::{AppVisibility, IAppVisibility, IVirtualDesktopManager, VirtualDesktopManager};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, FindWindowExW, GetAncestor, GetClassNameW, GetLastActivePopup, GetTitleBarInfo,
    GetWindowLongW, GetWindowTextW, GetWindowThreadProcessId, IsIconic, IsWindowVisible, IsZoomed,
    SendMessageW, SetLayeredWindowAttributes, SetWindowLongW, GA_ROOTOWNER, GWL_EXSTYLE,
    LWA_ALPHA, TITLEBARINFO, WM_THEMECHANGED,
};

use super::composition::CompositionApi;
use crate::core::error::OsError;
use crate::os::{MonitorId, ShowState, WindowId, WindowIdentity, WindowSystem};
use crate::taskbar::accent::AccentPolicy;

/// `STATE_SYSTEM_INVISIBLE`
const STATE_SYSTEM_INVISIBLE: u32 = 0x0000_8000;

fn hwnd(window: WindowId) -> HWND {
    HWND(window.0 as isize)
}

fn window_id(hwnd: HWND) -> Option<WindowId> {
    if hwnd.0 == 0 {
        None
    } else {
        Some(WindowId(hwnd.0 as usize))
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Window system backed by user32, DWM and the shell COM objects
pub struct Win32WindowSystem {
    composition: Option<CompositionApi>,
    desktops: Option<IVirtualDesktopManager>,
    app_visibility: Option<IAppVisibility>,
    com_initialized: bool,
}

impl Win32WindowSystem {
    /// Look up every optional capability.
    ///
    /// Missing capabilities are logged and answered with the harmless
    /// default from then on.
    pub fn new() -> Self {
        let com_initialized = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }.is_ok();
        if !com_initialized {
            let err = OsError::ComInitFailed {
                reason: "CoInitializeEx failed".to_string(),
            };
            tracing::warn!("{}", err);
        }

        let desktops: Option<IVirtualDesktopManager> =
            match unsafe { CoCreateInstance(&VirtualDesktopManager, None, CLSCTX_ALL) } {
                Ok(manager) => Some(manager),
                Err(e) => {
                    tracing::warn!("Virtual desktop manager unavailable: {:?}", e);
                    None
                }
            };

        let app_visibility: Option<IAppVisibility> =
            match unsafe { CoCreateInstance(&AppVisibility, None, CLSCTX_ALL) } {
                Ok(visibility) => Some(visibility),
                Err(e) => {
                    tracing::warn!("App visibility service unavailable: {:?}", e);
                    None
                }
            };

        let composition = CompositionApi::load();
        tracing::info!(
            "Win32 window system ready (composition: {}, virtual desktops: {})",
            composition.is_some(),
            desktops.is_some()
        );

        Self {
            composition,
            desktops,
            app_visibility,
            com_initialized,
        }
    }

    unsafe extern "system" fn enum_windows_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let windows = &mut *(lparam.0 as *mut Vec<WindowId>);
        if let Some(id) = window_id(hwnd) {
            windows.push(id);
        }
        BOOL(1)
    }

    fn read_text(hwnd: HWND, class: bool) -> String {
        let mut buffer = [0u16; 256];
        let len = unsafe {
            if class {
                GetClassNameW(hwnd, &mut buffer)
            } else {
                GetWindowTextW(hwnd, &mut buffer)
            }
        };
        let len = usize::try_from(len).unwrap_or(0).min(buffer.len());
        String::from_utf16_lossy(&buffer[..len])
    }

    fn executable(hwnd: HWND) -> Option<String> {
        let mut pid = 0u32;
        unsafe {
            GetWindowThreadProcessId(hwnd, Some(&mut pid as *mut u32));
        }
        if pid == 0 {
            return None;
        }

        unsafe {
            let process =
                OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, BOOL::from(false), pid).ok()?;
            let mut buffer = [0u16; 1024];
            let mut size = buffer.len() as u32;
            let result = QueryFullProcessImageNameW(
                process,
                PROCESS_NAME_WIN32,
                PWSTR::from_raw(buffer.as_mut_ptr()),
                &mut size,
            );
            let _ = CloseHandle(process);
            result.ok()?;

            let path = String::from_utf16_lossy(&buffer[..size as usize]);
            Path::new(&path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        }
    }
}

impl Default for Win32WindowSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Win32WindowSystem {
    fn drop(&mut self) {
        // COM objects must be released before uninitializing
        self.desktops = None;
        self.app_visibility = None;
        if self.com_initialized {
            unsafe { CoUninitialize() };
        }
    }
}

impl WindowSystem for Win32WindowSystem {
    fn find_window(
        &self,
        class_name: &str,
        title: Option<&str>,
        parent: Option<WindowId>,
        after: Option<WindowId>,
    ) -> Option<WindowId> {
        let class_name = wide(class_name);
        let title = title.map(wide);
        let title_ptr = match &title {
            Some(t) => PCWSTR::from_raw(t.as_ptr()),
            None => PCWSTR::null(),
        };

        let found = unsafe {
            FindWindowExW(
                parent.map(hwnd).unwrap_or_default(),
                after.map(hwnd).unwrap_or_default(),
                PCWSTR::from_raw(class_name.as_ptr()),
                title_ptr,
            )
        };
        window_id(found)
    }

    fn monitor_from_window(&self, window: WindowId) -> MonitorId {
        let monitor = unsafe { MonitorFromWindow(hwnd(window), MONITOR_DEFAULTTOPRIMARY) };
        MonitorId(monitor.0 as usize)
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = Vec::new();
        let result = unsafe {
            EnumWindows(
                Some(Self::enum_windows_callback),
                LPARAM(&mut windows as *mut Vec<WindowId> as isize),
            )
        };
        if let Err(e) = result {
            tracing::debug!("EnumWindows stopped early: {:?}", e);
        }
        windows
    }

    fn is_visible(&self, window: WindowId) -> bool {
        unsafe { IsWindowVisible(hwnd(window)) }.as_bool()
    }

    fn is_cloaked(&self, window: WindowId) -> bool {
        let mut cloaked = 0u32;
        let result = unsafe {
            DwmGetWindowAttribute(
                hwnd(window),
                DWMWA_CLOAKED,
                &mut cloaked as *mut u32 as *mut c_void,
                std::mem::size_of::<u32>() as u32,
            )
        };
        result.is_ok() && cloaked != 0
    }

    fn show_state(&self, window: WindowId) -> ShowState {
        let hwnd = hwnd(window);
        unsafe {
            if IsZoomed(hwnd).as_bool() {
                ShowState::Maximized
            } else if IsIconic(hwnd).as_bool() {
                ShowState::Minimized
            } else {
                ShowState::Normal
            }
        }
    }

    fn is_on_current_desktop(&self, window: WindowId) -> bool {
        match &self.desktops {
            Some(manager) => unsafe { manager.IsWindowOnCurrentVirtualDesktop(hwnd(window)) }
                .map(|on| on.as_bool())
                .unwrap_or(true),
            None => true,
        }
    }

    fn root_owner(&self, window: WindowId) -> WindowId {
        window_id(unsafe { GetAncestor(hwnd(window), GA_ROOTOWNER) }).unwrap_or(window)
    }

    fn last_active_popup(&self, window: WindowId) -> WindowId {
        window_id(unsafe { GetLastActivePopup(hwnd(window)) }).unwrap_or(window)
    }

    fn is_title_bar_invisible(&self, window: WindowId) -> bool {
        let mut info = TITLEBARINFO {
            cbSize: std::mem::size_of::<TITLEBARINFO>() as u32,
            ..Default::default()
        };
        match unsafe { GetTitleBarInfo(hwnd(window), &mut info) } {
            Ok(()) => info.rgstate[0] & STATE_SYSTEM_INVISIBLE != 0,
            Err(_) => false,
        }
    }

    fn ex_style(&self, window: WindowId) -> u32 {
        unsafe { GetWindowLongW(hwnd(window), GWL_EXSTYLE) as u32 }
    }

    fn set_ex_style(&self, window: WindowId, style: u32) {
        unsafe {
            SetWindowLongW(hwnd(window), GWL_EXSTYLE, style as i32);
        }
    }

    fn set_layered_alpha(&self, window: WindowId, alpha: u8) {
        if let Err(e) =
            unsafe { SetLayeredWindowAttributes(hwnd(window), COLORREF(0), alpha, LWA_ALPHA) }
        {
            tracing::debug!("SetLayeredWindowAttributes failed: {:?}", e);
        }
    }

    fn identity(&self, window: WindowId) -> WindowIdentity {
        let hwnd = hwnd(window);
        WindowIdentity {
            class_name: Self::read_text(hwnd, true),
            title: Self::read_text(hwnd, false),
            executable: Self::executable(hwnd),
        }
    }

    fn is_start_menu_open(&self) -> bool {
        match &self.app_visibility {
            Some(visibility) => unsafe { visibility.IsLauncherVisible() }
                .map(|visible| visible.as_bool())
                .unwrap_or(false),
            None => false,
        }
    }

    fn send_theme_changed(&self, window: WindowId) {
        unsafe {
            SendMessageW(hwnd(window), WM_THEMECHANGED, WPARAM(0), LPARAM(0));
        }
    }

    fn composition_available(&self) -> bool {
        self.composition.is_some()
    }

    fn set_accent_policy(&self, window: WindowId, policy: &AccentPolicy) -> Result<(), OsError> {
        match &self.composition {
            Some(api) => api.set_accent_policy(hwnd(window), policy),
            None => Err(OsError::CompositionUnavailable),
        }
    }
}
