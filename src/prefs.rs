//! Per-user preference storage.
//!
//! [`PreferenceStore`] is an opaque string key/value store. The sidebar
//! reads and writes it through [`UserPreferences`], which prefixes every
//! key with the user's id so several users can share one medium.
//!
//! Stored values are never trusted: anything that fails to parse is
//! treated as absent and the caller falls back to its default.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{Result, SidebarError};
use crate::identity::Role;
use crate::theme::AccentColor;
use crate::util::atomic_write;

/// Preference file name inside the data directory.
pub const PREFS_FILENAME: &str = "preferences.json";

/// Key for the accent color.
pub const ACCENT_KEY: &str = "accent_color";

/// Key for the role override.
pub const ROLE_KEY: &str = "role";

/// Key for the serialized pin set.
pub const PINS_KEY: &str = "pinned_chats";

/// String-keyed persistent key/value store.
pub trait PreferenceStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, persisting immediately.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value if present.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for &mut P {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Box<P> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Process-local store, lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: IndexMap<String, String>,
}

impl MemoryPreferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.shift_remove(key);
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk.
///
/// Every mutation rewrites the file atomically. A file that cannot be
/// parsed is ignored and replaced on the next write.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: IndexMap<String, String>,
}

impl FilePreferenceStore {
    /// Open the store at `path`, starting empty if the file is missing or malformed.
    ///
    /// Entries whose value is not a string are dropped one by one; the rest
    /// of the file survives.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    values: IndexMap::new(),
                })
            }
            Err(e) => {
                return Err(SidebarError::io(
                    format!("Failed to read preferences: {}", path.display()),
                    e,
                ))
            }
        };
        let values = parse_values(&path, &bytes);
        Ok(Self { path, values })
    }

    /// Open the store in a data directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(data_dir.as_ref().join(PREFS_FILENAME))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.values).map_err(|e| {
            SidebarError::SerializationError {
                context: "Failed to serialize preferences".to_string(),
                source: e,
            }
        })?;
        atomic_write(&self.path, content.as_bytes())
    }
}

/// Decode a preference file, keeping only string entries.
fn parse_values(path: &Path, bytes: &[u8]) -> IndexMap<String, String> {
    let raw = match serde_json::from_slice::<IndexMap<String, serde_json::Value>>(bytes) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed preference file");
            return IndexMap::new();
        }
    };
    raw.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(value) => Some((key, value)),
            other => {
                warn!(%key, kind = value_kind(&other), "dropping non-string preference");
                None
            }
        })
        .collect()
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.shift_remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Namespaced view of a [`PreferenceStore`] for one user.
#[derive(Debug)]
pub struct UserPreferences<P> {
    store: P,
    user_id: String,
}

impl<P: PreferenceStore> UserPreferences<P> {
    /// Wrap a store for `user_id`.
    pub fn new(store: P, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }

    /// The namespace this view writes under.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Namespaced key for `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}:{}", self.user_id, name)
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> P {
        self.store
    }

    fn read(&self, name: &str) -> Option<String> {
        self.store.get(&self.key(name))
    }

    fn write(&mut self, name: &str, value: &str) -> Result<()> {
        let key = self.key(name);
        debug!(%key, "writing preference");
        self.store.set(&key, value)
    }

    /// Stored accent color, if present and well-formed.
    pub fn accent(&self) -> Option<AccentColor> {
        let raw = self.read(ACCENT_KEY)?;
        match AccentColor::parse(&raw) {
            Ok(color) => Some(color),
            Err(_) => {
                warn!(user = %self.user_id, value = %raw, "ignoring malformed stored accent");
                None
            }
        }
    }

    /// Persist the accent color.
    pub fn set_accent(&mut self, color: &AccentColor) -> Result<()> {
        self.write(ACCENT_KEY, color.as_str())
    }

    /// Stored role override, if present and recognised.
    pub fn role(&self) -> Option<Role> {
        let raw = self.read(ROLE_KEY)?;
        let role = Role::from_name(&raw);
        if role.is_none() {
            warn!(user = %self.user_id, value = %raw, "ignoring unknown stored role");
        }
        role
    }

    /// Persist a role override.
    pub fn set_role(&mut self, role: Role) -> Result<()> {
        self.write(ROLE_KEY, role.as_str())
    }

    /// Drop the role override.
    pub fn clear_role(&mut self) -> Result<()> {
        let key = self.key(ROLE_KEY);
        self.store.remove(&key)
    }

    /// Stored pin set; empty when absent or malformed.
    ///
    /// Duplicate ids are collapsed, keeping the first occurrence.
    pub fn pins(&self) -> Vec<String> {
        let Some(raw) = self.read(PINS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                let mut seen = std::collections::HashSet::new();
                ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
            }
            Err(e) => {
                warn!(user = %self.user_id, error = %e, "ignoring malformed stored pin list");
                Vec::new()
            }
        }
    }

    /// Persist the pin set.
    pub fn set_pins(&mut self, pins: &[String]) -> Result<()> {
        let value = serde_json::to_string(pins)?;
        self.write(PINS_KEY, &value)
    }
}
