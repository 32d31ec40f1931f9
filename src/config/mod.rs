//! Configuration management for chat-sidebar.
//!
//! Handles:
//! - Storage location for chats, preferences and feedback
//! - Default accent color
//! - Export defaults
//! - Display options

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SidebarError};
use crate::export::ExportFormat;
use crate::theme::{AccentColor, DEFAULT_ACCENT};
use crate::util::atomic_write;

/// Application directory name under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "chat-sidebar";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Appearance settings.
    #[serde(default)]
    pub appearance: AppearanceConfig,
    /// Export defaults.
    #[serde(default)]
    pub export: ExportConfig,
    /// Display options.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SidebarError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| SidebarError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Save configuration to a specific path atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SidebarError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())
    }

    /// Data directory, resolving the platform default when unset.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Configured default accent.
    ///
    /// An invalid value is a configuration error rather than a silent fallback,
    /// since the user wrote it by hand.
    pub fn default_accent(&self) -> Result<AccentColor> {
        AccentColor::parse(&self.appearance.default_accent).map_err(|_| SidebarError::InvalidConfig {
            message: format!(
                "appearance.default_accent '{}' is not a #rrggbb color",
                self.appearance.default_accent
            ),
        })
    }

    /// Configured export format.
    pub fn export_format(&self) -> Result<ExportFormat> {
        ExportFormat::from_name(&self.export.format).ok_or_else(|| SidebarError::InvalidConfig {
            message: format!(
                "export.format '{}' is not one of: json, markdown",
                self.export.format
            ),
        })
    }

    /// Look up a value by dotted key, e.g. `display.full_ids`.
    pub fn get(&self, key: &str) -> Option<String> {
        let table: toml::Table = toml::to_string(self).ok()?.parse().ok()?;
        let mut parts = key.split('.');
        let mut current = table.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(match current {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for chats, preferences and feedback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Appearance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Accent used until the user picks one.
    #[serde(default = "default_accent")]
    pub default_accent: String,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            default_accent: default_accent(),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default format for the export command.
    #[serde(default = "default_format")]
    pub format: String,
    /// Pretty-print JSON.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            pretty: true,
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show full chat ids.
    #[serde(default)]
    pub full_ids: bool,
    /// Truncate previews at this many characters.
    #[serde(default = "default_preview_width")]
    pub preview_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            full_ids: false,
            preview_width: default_preview_width(),
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_accent() -> String {
    DEFAULT_ACCENT.to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_preview_width() -> usize {
    60
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| SidebarError::Unsupported {
        feature: "config directory discovery".to_string(),
    })?;

    Ok(config_dir.join(APP_DIR_NAME).join("config.toml"))
}

/// Get the default data directory.
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| SidebarError::Unsupported {
        feature: "data directory discovery".to_string(),
    })?;

    Ok(data_dir.join(APP_DIR_NAME))
}
