//! Feedback form.
//!
//! A draft becomes a [`Feedback`] record only when it has text; empty
//! submissions are rejected locally. Records are appended to a JSON Lines
//! file by [`FeedbackLog`].

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, SidebarError};

/// Feedback file name inside the data directory.
pub const FEEDBACK_FILENAME: &str = "feedback.jsonl";

/// Kind of feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    /// Something is broken.
    Bug,
    /// Feature request.
    Idea,
    /// Anything else.
    #[default]
    Other,
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bug => "bug",
            Self::Idea => "idea",
            Self::Other => "other",
        })
    }
}

/// Unsubmitted form contents.
#[derive(Debug, Clone, Default)]
pub struct FeedbackDraft {
    /// Free text.
    pub text: String,
    /// Selected category.
    pub category: FeedbackCategory,
}

impl FeedbackDraft {
    /// Draft with `text` in the default category.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: FeedbackCategory::default(),
        }
    }

    /// Builder: set the category.
    pub fn with_category(mut self, category: FeedbackCategory) -> Self {
        self.category = category;
        self
    }

    /// Validate the draft for `user_id`.
    pub fn submit(&self, user_id: &str) -> Result<Feedback> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(SidebarError::EmptyFeedback);
        }
        Ok(Feedback {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            category: self.category,
            text: text.to_string(),
            submitted_at: Utc::now(),
        })
    }
}

/// A submitted feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Record id.
    pub id: Uuid,
    /// Submitting user.
    pub user_id: String,
    /// Category.
    pub category: FeedbackCategory,
    /// Trimmed text.
    pub text: String,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
}

/// Append-only feedback file.
#[derive(Debug, Clone)]
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    /// Log in a data directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(FEEDBACK_FILENAME),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    pub fn append(&self, feedback: &Feedback) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SidebarError::io(format!("Failed to create directory: {}", parent.display()), e)
            })?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SidebarError::io(format!("Failed to open {}", self.path.display()), e))?;
        let line = serde_json::to_string(feedback)?;
        writeln!(file, "{line}")?;
        info!(id = %feedback.id, category = %feedback.category, "recorded feedback");
        Ok(())
    }

    /// Read every record, skipping lines that do not parse.
    pub fn read_all(&self) -> Result<Vec<Feedback>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SidebarError::io(
                    format!("Failed to read {}", self.path.display()),
                    e,
                ))
            }
        };
        Ok(content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect())
    }
}
