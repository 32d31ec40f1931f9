//! Utility functions for common operations.
//!
//! - Atomic file writes for preference, chat and export files
//! - Short ids and text truncation for display
//! - Filename sanitising

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, SidebarError};

/// Atomically write content to a file.
///
/// Content goes to a temporary file in the target's directory, is flushed,
/// then renamed over the target. If any step fails the original file (if
/// any) is left unchanged. Missing parent directories are created.
///
/// # Example
///
/// ```rust,no_run
/// use chat_sidebar::util::atomic_write;
///
/// atomic_write("prefs.json", b"{}").unwrap();
/// ```
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => {
            return Err(SidebarError::IoError {
                context: format!("Cannot determine parent directory for: {}", path.display()),
                source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
            })
        }
    };

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            SidebarError::io(format!("Failed to create directory: {}", parent.display()), e)
        })?;
    }

    // Same directory keeps the rename on one filesystem
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        SidebarError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        SidebarError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        SidebarError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        SidebarError::io(
            format!("Failed to atomically write file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

/// First 8 characters of an id.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Truncate text to `max` characters, appending an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Reduce a string to characters safe in a filename.
///
/// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `_`.
/// An empty result becomes `"anonymous"`.
pub fn sanitize_filename(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "anonymous".to_string()
    } else {
        cleaned
    }
}

/// Plural suffix helper.
pub const fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
