//! JSON export.
//!
//! The envelope carries a format version and the exporting user so the
//! file can be recognised later; [`parse_export`] reads it back.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::Chat;
use crate::error::{Result, SidebarError};

use super::{ExportOptions, Exporter};

/// Current envelope version.
pub const EXPORT_VERSION: u32 = 1;

/// Serialized history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    /// Envelope version.
    pub version: u32,
    /// When the export was produced.
    pub exported_at: DateTime<Utc>,
    /// Owner of the chats.
    pub user_id: String,
    /// Number of chats, for quick inspection.
    pub chat_count: usize,
    /// Every chat, in store order.
    pub chats: Vec<Chat>,
}

/// JSON exporter.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    /// Create a compact JSON exporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty-printing.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Exporter for JsonExporter {
    fn export_chats<W: Write>(
        &self,
        user_id: &str,
        chats: &[Chat],
        writer: &mut W,
        options: &ExportOptions,
    ) -> Result<()> {
        let export = HistoryExport {
            version: EXPORT_VERSION,
            exported_at: options.exported_at,
            user_id: user_id.to_string(),
            chat_count: chats.len(),
            chats: chats.to_vec(),
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &export)?;
        } else {
            serde_json::to_writer(&mut *writer, &export)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

/// Parse a JSON history export.
pub fn parse_export(contents: &str) -> Result<HistoryExport> {
    let export: HistoryExport = serde_json::from_str(contents)
        .map_err(|e| SidebarError::export("Not a chat history export", e))?;
    if export.version > EXPORT_VERSION {
        return Err(SidebarError::unsupported(format!(
            "export version {} (newest supported is {EXPORT_VERSION})",
            export.version
        )));
    }
    Ok(export)
}
