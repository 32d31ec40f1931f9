//! Chat records as supplied by the chat store.
//!
//! The sidebar never mutates a [`Chat`]; it only reads titles for search
//! and previews for display, and asks the store to delete by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of a missing last-message preview.
pub const PREVIEW_PLACEHOLDER: &str = "No preview available...";

/// A single conversation in the user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Opaque unique identifier.
    pub id: String,
    /// Display title, also the only searchable field.
    pub title: String,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Preview of the most recent message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
}

impl Chat {
    /// Create a chat with no preview, updated now.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            updated_at: Utc::now(),
            last_message: None,
        }
    }

    /// Builder: set the last-message preview.
    pub fn with_last_message(mut self, message: impl Into<String>) -> Self {
        self.last_message = Some(message.into());
        self
    }

    /// Builder: set the update time.
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Preview text, falling back to [`PREVIEW_PLACEHOLDER`].
    pub fn preview(&self) -> &str {
        self.last_message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(PREVIEW_PLACEHOLDER)
    }

    /// Route the presentation layer links this chat to.
    pub fn route(&self) -> String {
        format!("/chat/{}", self.id)
    }
}
