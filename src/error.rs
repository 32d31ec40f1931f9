//! Error types for chat-sidebar.
//!
//! Errors fall into four groups: validation errors that block an action
//! locally, failures of external collaborators (chat store, preference
//! store), configuration problems, and I/O. Malformed preference values
//! are not errors; readers fall back to defaults instead.

use std::path::PathBuf;

use thiserror::Error;

/// Exact text the user must type before history is cleared.
pub const CLEAR_CONFIRMATION: &str = "DELETE";

/// Primary error type for chat-sidebar operations.
#[derive(Error, Debug)]
pub enum SidebarError {
    /// Bulk clear confirmation text did not match.
    #[error("Confirmation text does not match: type {expected} to confirm")]
    ConfirmationMismatch {
        /// The text the user must enter.
        expected: &'static str,
    },

    /// Feedback form submitted without any text.
    #[error("Feedback text cannot be empty")]
    EmptyFeedback,

    /// Accent color is not a `#rrggbb` hex string.
    #[error("Invalid accent color '{value}': expected #rrggbb")]
    InvalidAccent {
        /// The rejected value.
        value: String,
    },

    /// Chat not found in the store.
    #[error("Chat not found: {chat_id}")]
    ChatNotFound {
        /// Chat ID that was not found.
        chat_id: String,
    },

    /// A delete request against the chat store failed.
    #[error("Failed to delete chat {chat_id}: {message}")]
    DeleteFailed {
        /// Chat ID whose deletion failed.
        chat_id: String,
        /// Human-readable error message.
        message: String,
    },

    /// No signed-in user.
    #[error("No current user: pass --user or set SIDEBAR_USER")]
    NoUser,

    /// Export error.
    #[error("Export failed: {message}")]
    ExportError {
        /// Human-readable error message.
        message: String,
        /// Underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Data file is corrupt beyond recovery.
    #[error("Corrupted data file: {path}: {reason}")]
    CorruptedFile {
        /// Path to the corrupted file.
        path: PathBuf,
        /// Reason why the file is invalid.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// Unsupported operation or feature.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// Name of the unsupported feature.
        feature: String,
    },
}

impl SidebarError {
    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new export error caused by `source`.
    #[must_use]
    pub fn export(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ExportError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new delete failure.
    #[must_use]
    pub fn delete_failed(chat_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DeleteFailed {
            chat_id: chat_id.into(),
            message: message.into(),
        }
    }

    /// Create a new unsupported error.
    #[must_use]
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfirmationMismatch { .. }
            | Self::EmptyFeedback
            | Self::InvalidAccent { .. }
            | Self::InvalidArgument { .. }
            | Self::NoUser => exit_codes::EXIT_USAGE_ERROR,
            Self::ChatNotFound { .. } => exit_codes::EXIT_NOT_FOUND,
            Self::DeleteFailed { .. } => exit_codes::EXIT_STORE_ERROR,
            Self::ConfigError { .. } | Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::ExportError { .. } => exit_codes::EXIT_EXPORT_ERROR,
            Self::CorruptedFile { .. } | Self::SerializationError { .. } => {
                exit_codes::EXIT_DATA_ERROR
            }
            Self::IoError { .. } => exit_codes::EXIT_IO_ERROR,
            Self::Unsupported { .. } => exit_codes::EXIT_GENERAL_ERROR,
        }
    }

    /// Whether the error only blocked a local action and made no external call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ConfirmationMismatch { .. } | Self::EmptyFeedback | Self::InvalidAccent { .. }
        )
    }

    /// Check if this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.is_validation() || matches!(self, Self::DeleteFailed { .. } | Self::ChatNotFound { .. })
    }
}

/// Result type alias for chat-sidebar operations.
pub type Result<T> = std::result::Result<T, SidebarError>;

impl From<std::io::Error> for SidebarError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SidebarError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// Chat not found.
    pub const EXIT_NOT_FOUND: i32 = 3;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Export operation failed.
    pub const EXIT_EXPORT_ERROR: i32 = 6;
    /// One or more chat store calls failed.
    pub const EXIT_STORE_ERROR: i32 = 8;
    /// Invalid command-line usage or rejected input (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// Input data format error (BSD standard).
    pub const EXIT_DATA_ERROR: i32 = 65;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}
