//! Accent modes and the policy struct understood by
//! `SetWindowCompositionAttribute`.

use serde::{Deserialize, Serialize};

use crate::core::color::Color;

/// `WCA_ACCENT_POLICY` attribute index
pub const WCA_ACCENT_POLICY: u32 = 19;

/// Flag value that makes the accent cover the whole window and honor the color
pub const ACCENT_FLAGS_DRAW_ALL: u32 = 2;

/// Visual treatment of a taskbar's backing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccentMode {
    /// The stock shell appearance. Never sent to the composition API.
    Normal,
    /// Solid custom color (`ACCENT_ENABLE_GRADIENT`)
    Opaque,
    /// Transparent custom color (`ACCENT_ENABLE_TRANSPARENTGRADIENT`)
    Clear,
    /// Blur behind (`ACCENT_ENABLE_BLURBEHIND`)
    #[default]
    Blur,
    /// Acrylic (`ACCENT_ENABLE_ACRYLICBLURBEHIND`)
    Fluent,
}

impl AccentMode {
    pub const ALL: [AccentMode; 5] = [
        AccentMode::Normal,
        AccentMode::Opaque,
        AccentMode::Clear,
        AccentMode::Blur,
        AccentMode::Fluent,
    ];

    /// Native `ACCENT_STATE` value, `None` for the inert mode
    pub fn native_state(self) -> Option<u32> {
        match self {
            AccentMode::Normal => None,
            AccentMode::Opaque => Some(1),
            AccentMode::Clear => Some(2),
            AccentMode::Blur => Some(3),
            AccentMode::Fluent => Some(4),
        }
    }

    pub fn is_inert(self) -> bool {
        self.native_state().is_none()
    }
}

impl std::fmt::Display for AccentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AccentMode::Normal => "normal",
            AccentMode::Opaque => "opaque",
            AccentMode::Clear => "clear",
            AccentMode::Blur => "blur",
            AccentMode::Fluent => "fluent",
        };
        f.write_str(name)
    }
}

/// `ACCENT_POLICY`, laid out for the native call
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentPolicy {
    pub accent_state: u32,
    pub accent_flags: u32,
    /// Color in native `0xAABBGGRR` order
    pub gradient_color: u32,
    pub animation_id: u32,
}

impl AccentPolicy {
    /// Build the native policy for an accent mode, `None` for the inert mode.
    pub fn new(mode: AccentMode, color: Color) -> Option<Self> {
        let accent_state = mode.native_state()?;
        let mut gradient_color = to_native_color(color);

        // Acrylic renders wrong at exactly zero alpha
        if mode == AccentMode::Fluent && gradient_color >> 24 == 0 {
            gradient_color |= 0x01 << 24;
        }

        Some(Self {
            accent_state,
            accent_flags: ACCENT_FLAGS_DRAW_ALL,
            gradient_color,
            animation_id: 0,
        })
    }
}

/// Swap red and blue: `0xAARRGGBB` to `0xAABBGGRR`.
pub fn to_native_color(color: Color) -> u32 {
    let argb = color.argb();
    (argb & 0xFF00_FF00) | ((argb & 0x00FF_0000) >> 16) | ((argb & 0x0000_00FF) << 16)
}
