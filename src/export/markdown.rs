//! Markdown export of the chat index.

use std::io::Write;

use crate::chat::Chat;
use crate::error::Result;

use super::{ExportOptions, Exporter};

/// Markdown exporter.
#[derive(Debug, Clone)]
pub struct MarkdownExporter {
    include_previews: bool,
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownExporter {
    /// Create a Markdown exporter that includes previews.
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_previews: true,
        }
    }

    /// Include last-message previews as block quotes.
    #[must_use]
    pub fn with_previews(mut self, include: bool) -> Self {
        self.include_previews = include;
        self
    }
}

impl Exporter for MarkdownExporter {
    fn export_chats<W: Write>(
        &self,
        user_id: &str,
        chats: &[Chat],
        writer: &mut W,
        options: &ExportOptions,
    ) -> Result<()> {
        writeln!(writer, "# Chat history")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "_{} chat{} for `{}`, exported {}_",
            chats.len(),
            crate::util::plural(chats.len()),
            user_id,
            options.exported_at.format("%Y-%m-%d %H:%M UTC")
        )?;

        for chat in chats {
            writeln!(writer)?;
            writeln!(writer, "## {}", escape_heading(&chat.title))?;
            writeln!(writer)?;
            writeln!(writer, "- id: `{}`", chat.id)?;
            writeln!(writer, "- updated: {}", chat.updated_at.to_rfc3339())?;
            if self.include_previews {
                writeln!(writer)?;
                for line in chat.preview().lines() {
                    writeln!(writer, "> {line}")?;
                }
            }
        }
        Ok(())
    }
}

/// Keep a title on one heading line.
fn escape_heading(title: &str) -> String {
    let flat = title.replace(['\r', '\n'], " ");
    if flat.trim().is_empty() {
        "(untitled)".to_string()
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::PREVIEW_PLACEHOLDER;

    fn render(exporter: &MarkdownExporter, chats: &[Chat]) -> String {
        let mut out = Vec::new();
        exporter
            .export_chats("alice", chats, &mut out, &ExportOptions::default())
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_sections_per_chat() {
        let chats = vec![
            Chat::new("1", "Trip to Paris").with_last_message("Book flights"),
            Chat::new("2", "Budget plan"),
        ];
        let text = render(&MarkdownExporter::new(), &chats);

        assert!(text.starts_with("# Chat history"));
        assert!(text.contains("## Trip to Paris"));
        assert!(text.contains("- id: `2`"));
        assert!(text.contains("> Book flights"));
        assert!(text.contains(&format!("> {PREVIEW_PLACEHOLDER}")));
        assert!(text.contains("_2 chats for `alice`"));
    }

    #[test]
    fn test_without_previews() {
        let chats = vec![Chat::new("1", "a").with_last_message("secret")];
        let text = render(&MarkdownExporter::new().with_previews(false), &chats);
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_multiline_title_flattened() {
        assert_eq!(escape_heading("a\nb"), "a b");
        assert_eq!(escape_heading("  "), "(untitled)");
    }
}
