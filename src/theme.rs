//! Accent color theming.
//!
//! The accent is process-wide presentation state. [`AccentHandle`] is its
//! single source of truth: the sidebar writes it, renderers hold clones and
//! read it when drawing.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crossterm::style::Color;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SidebarError;

/// Accent used when nothing valid is stored.
pub const DEFAULT_ACCENT: &str = "#3b82f6";

/// Preset accents offered in the settings dialog.
pub const ACCENT_PALETTE: [&str; 5] = ["#3b82f6", "#10b981", "#f43f5e", "#f59e0b", "#8b5cf6"];

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// A `#rrggbb` color, stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccentColor(String);

impl AccentColor {
    /// Validate and normalise a hex color.
    pub fn parse(value: &str) -> Result<Self, SidebarError> {
        let trimmed = value.trim();
        if HEX_COLOR.is_match(trimmed) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(SidebarError::InvalidAccent {
                value: value.to_string(),
            })
        }
    }

    /// Hex string, e.g. `#3b82f6`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }

    /// Terminal color for this accent.
    pub fn terminal_color(&self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb { r, g, b }
    }

    /// Whether this is one of the preset accents.
    pub fn is_preset(&self) -> bool {
        ACCENT_PALETTE.contains(&self.as_str())
    }

    /// The preset accents.
    pub fn palette() -> Vec<Self> {
        ACCENT_PALETTE.iter().map(|c| Self((*c).to_string())).collect()
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self(DEFAULT_ACCENT.to_string())
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccentColor {
    type Err = SidebarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccentColor {
    type Error = SidebarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccentColor> for String {
    fn from(color: AccentColor) -> Self {
        color.0
    }
}

/// Shared handle to the current accent.
#[derive(Debug, Clone, Default)]
pub struct AccentHandle {
    inner: Arc<RwLock<AccentColor>>,
}

impl AccentHandle {
    /// Create a handle holding `color`.
    pub fn new(color: AccentColor) -> Self {
        Self {
            inner: Arc::new(RwLock::new(color)),
        }
    }

    /// Current accent.
    pub fn get(&self) -> AccentColor {
        self.inner.read().clone()
    }

    /// Replace the accent; visible to every clone of this handle.
    pub fn set(&self, color: AccentColor) {
        *self.inner.write() = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let color = AccentColor::parse("#10B981").unwrap();
        assert_eq!(color.as_str(), "#10b981");
        assert!(color.is_preset());
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "red", "#fff", "10b981", "#10b98z", "#10b9811"] {
            let err = AccentColor::parse(bad).unwrap_err();
            assert!(err.is_validation(), "{bad} should be a validation error");
        }
    }

    #[test]
    fn test_rgb() {
        let color = AccentColor::parse("#3b82f6").unwrap();
        assert_eq!(color.rgb(), (0x3b, 0x82, 0xf6));
        assert_eq!(
            color.terminal_color(),
            Color::Rgb {
                r: 0x3b,
                g: 0x82,
                b: 0xf6
            }
        );
    }

    #[test]
    fn test_default_is_first_preset() {
        assert_eq!(AccentColor::default(), AccentColor::palette()[0]);
    }

    #[test]
    fn test_handle_shared_between_clones() {
        let handle = AccentHandle::default();
        let renderer = handle.clone();
        handle.set(AccentColor::parse("#f43f5e").unwrap());
        assert_eq!(renderer.get().as_str(), "#f43f5e");
    }

    #[test]
    fn test_serde_validates() {
        let ok: AccentColor = serde_json::from_str("\"#8b5cf6\"").unwrap();
        assert_eq!(ok.as_str(), "#8b5cf6");
        assert!(serde_json::from_str::<AccentColor>("\"purple\"").is_err());
    }
}
