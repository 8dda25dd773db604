//! ARGB color value used by the appearance settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::error::ConfigError;

/// A 32-bit color laid out as `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Color = Color(0x0000_0000);

    pub fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(u32::from_be_bytes([a, r, g, b]))
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn argb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    /// Accepts `#AARRGGBB` or `#RRGGBB` (opaque). The leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || ConfigError::Invalid(format!("invalid color: {:?}", s));

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            8 => u32::from_str_radix(hex, 16).map(Color).map_err(|_| invalid()),
            6 => u32::from_str_radix(hex, 16)
                .map(|rgb| Color(0xFF00_0000 | rgb))
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_argb() {
        let color: Color = "#80FF0010".parse().unwrap();
        assert_eq!(color, Color(0x80FF_0010));
        assert_eq!(color.alpha(), 0x80);
    }

    #[test]
    fn test_parse_rgb_is_opaque() {
        let color: Color = "00FF00".parse().unwrap();
        assert_eq!(color, Color(0xFF00_FF00));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GG000000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_uppercase_hex() {
        assert_eq!(Color::from_argb(0x01, 0xAB, 0xCD, 0xEF).to_string(), "#01ABCDEF");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color(0x1122_3344)).unwrap();
        assert_eq!(json, "\"#11223344\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color(0x1122_3344));
    }
}
