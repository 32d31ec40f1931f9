//! chat-sidebar: the state and behavior behind a chat application's history sidebar.
//!
//! The sidebar lists a user's past conversations, split into pinned and
//! general groups and filtered by a title search. It persists per-user
//! preferences (pins, accent color, role badge), deletes single chats or
//! the whole history behind a typed confirmation, exports the full history,
//! and collects feedback.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chat_sidebar::prelude::*;
//!
//! fn main() -> chat_sidebar::Result<()> {
//!     let identity = StaticIdentity::new(UserIdentity::new("alice"));
//!     let mut sidebar = Sidebar::new(&identity, MemoryPreferenceStore::new(), AccentColor::default());
//!
//!     let chats = vec![
//!         Chat::new("c1", "Trip to Paris"),
//!         Chat::new("c2", "Rust lifetimes"),
//!     ];
//!     sidebar.toggle_pin("c2")?;
//!     sidebar.set_query("rust");
//!
//!     let view = sidebar.view(&chats);
//!     for (label, group) in view.iter() {
//!         println!("{label}: {}", group.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`chat`]: the chat summary record
//! - [`projection`]: search filter, pinned/general grouping and pin toggling
//! - [`prefs`]: per-user preference storage
//! - [`theme`]: accent color validation and the shared accent handle
//! - [`identity`]: signed-in user, role badge and initials
//! - [`store`]: the chat store seam plus memory and JSON file stores
//! - [`export`]: JSON and Markdown history export
//! - [`feedback`]: feedback drafts and the feedback log
//! - [`shortcuts`]: keyboard shortcut recognition
//! - [`sidebar`]: the controller tying it together
//! - [`cli`]: command-line interface
//! - [`config`]: configuration management
//! - [`error`]: error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod feedback;
pub mod identity;
pub mod prefs;
pub mod projection;
pub mod shortcuts;
pub mod sidebar;
pub mod store;
pub mod theme;
pub mod util;

// Re-export commonly used types at the crate root
pub use chat::Chat;
pub use error::{Result, SidebarError};
pub use projection::{ChatGroups, GroupLabel};
pub use sidebar::{Sidebar, HEADLINE};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::chat::Chat;
    pub use crate::error::{Result, SidebarError, CLEAR_CONFIRMATION};
    pub use crate::export::{export_history, ExportDocument, ExportFormat, ExportOptions};
    pub use crate::feedback::{Feedback, FeedbackCategory, FeedbackDraft, FeedbackLog};
    pub use crate::identity::{IdentityProvider, Role, StaticIdentity, UserIdentity};
    pub use crate::prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
    pub use crate::projection::{project, ChatGroups, GroupLabel, PinToggle, PinnedOrder};
    pub use crate::shortcuts::Shortcut;
    pub use crate::sidebar::{ClearReport, Dialog, Sidebar, SidebarEvent};
    pub use crate::store::{ChatStore, JsonChatStore, MemoryChatStore};
    pub use crate::theme::{AccentColor, AccentHandle};
}
