//! Chat history export.
//!
//! Export always covers the user's complete chat collection. The search
//! query and pin set only shape the sidebar view and never reach here.
//!
//! Two formats are supported:
//! - JSON: an envelope with the chats, parseable with [`parse_export`]
//! - Markdown: a readable transcript index
//!
//! [`export_history`] renders a named [`ExportDocument`];
//! [`write_export`] saves one atomically.

mod json;
mod markdown;

pub use json::*;
pub use markdown::*;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chat::Chat;
use crate::error::{Result, SidebarError};
use crate::util::{atomic_write, sanitize_filename};

/// Prefix of every export filename.
pub const EXPORT_FILE_PREFIX: &str = "chat-history";

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// JSON envelope.
    #[default]
    Json,
    /// Markdown document.
    Markdown,
}

impl ExportFormat {
    /// File extension without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }

    /// Parse a format name as used in configuration.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Markdown => "markdown",
        })
    }
}

/// Options shared by all exporters.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Pretty-print JSON.
    pub pretty: bool,
    /// Timestamp written into the document and filename.
    pub exported_at: DateTime<Utc>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            pretty: true,
            exported_at: Utc::now(),
        }
    }
}

impl ExportOptions {
    /// Options for `format`, stamped now.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Builder: pretty-print JSON.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Builder: fix the export timestamp.
    pub fn exported_at(mut self, at: DateTime<Utc>) -> Self {
        self.exported_at = at;
        self
    }
}

/// Trait for history exporters.
pub trait Exporter {
    /// Write every chat in `chats` for `user_id` to the writer.
    fn export_chats<W: Write>(
        &self,
        user_id: &str,
        chats: &[Chat],
        writer: &mut W,
        options: &ExportOptions,
    ) -> Result<()>;
}

/// A rendered export, ready to offer as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// Suggested file name.
    pub filename: String,
    /// UTF-8 contents.
    pub contents: String,
    /// Format of `contents`.
    pub format: ExportFormat,
    /// Number of chats included.
    pub chat_count: usize,
}

/// Download name: `chat-history-{user}-{YYYY-MM-DD}.{ext}`.
pub fn export_filename(user_id: &str, at: DateTime<Utc>, format: ExportFormat) -> String {
    format!(
        "{}-{}-{}.{}",
        EXPORT_FILE_PREFIX,
        sanitize_filename(user_id),
        at.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Render the full history of `user_id`.
pub fn export_history(user_id: &str, chats: &[Chat], options: &ExportOptions) -> Result<ExportDocument> {
    let mut buffer = Vec::new();
    match options.format {
        ExportFormat::Json => {
            JsonExporter::new()
                .pretty(options.pretty)
                .export_chats(user_id, chats, &mut buffer, options)?;
        }
        ExportFormat::Markdown => {
            MarkdownExporter::new().export_chats(user_id, chats, &mut buffer, options)?;
        }
    }

    let contents = String::from_utf8(buffer)
        .map_err(|e| SidebarError::export("Export produced invalid UTF-8", e))?;

    Ok(ExportDocument {
        filename: export_filename(user_id, options.exported_at, options.format),
        contents,
        format: options.format,
        chat_count: chats.len(),
    })
}

/// Save an export into `dir` under its suggested name.
pub fn write_export(document: &ExportDocument, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(&document.filename);
    atomic_write(&path, document.contents.as_bytes())?;
    info!(path = %path.display(), chats = document.chat_count, "wrote history export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("alice@example.com", fixed_time(), ExportFormat::Json),
            "chat-history-alice_example_com-2025-03-14.json"
        );
        assert_eq!(
            export_filename("bob", fixed_time(), ExportFormat::Markdown),
            "chat-history-bob-2025-03-14.md"
        );
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ExportFormat::from_name("MD"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::from_name("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_name("csv"), None);
        assert_eq!(ExportFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_export_history_json_parses_back() {
        let chats = vec![Chat::new("1", "Trip to Paris"), Chat::new("2", "Budget plan")];
        let options = ExportOptions::new(ExportFormat::Json).exported_at(fixed_time());
        let doc = export_history("alice", &chats, &options).unwrap();

        assert_eq!(doc.chat_count, 2);
        let parsed = parse_export(&doc.contents).unwrap();
        assert_eq!(parsed.user_id, "alice");
        assert_eq!(parsed.chats, chats);
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions::new(ExportFormat::Markdown).exported_at(fixed_time());
        let doc = export_history("bob", &[Chat::new("1", "Notes")], &options).unwrap();

        let path = write_export(&doc, dir.path()).unwrap();
        assert!(path.ends_with("chat-history-bob-2025-03-14.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), doc.contents);
    }
}
