//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic. Commands share a [`Context`] holding
//! the loaded configuration, the stores and the sidebar for the user.

pub mod accent;
pub mod clear;
pub mod config;
pub mod delete;
pub mod export;
pub mod feedback;
pub mod list;
pub mod new;
pub mod pin;
pub mod role;

use std::io::IsTerminal;
use std::path::PathBuf;

use crossterm::style::{style, Stylize};
use tokio::runtime::Runtime;

use crate::chat::Chat;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Result, SidebarError};
use crate::identity::{StaticIdentity, UserIdentity};
use crate::prefs::FilePreferenceStore;
use crate::sidebar::Sidebar;
use crate::store::{ChatStore, JsonChatStore};
use crate::theme::AccentColor;

/// Load configuration from `--config` or the default location.
///
/// An explicit file that exists must parse; a broken default file only warns.
pub fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) if path.exists() => Config::load_from(path),
        Some(_) => Ok(Config::default()),
        None => Ok(Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            Config::default()
        })),
    }
}

/// Identity derived from `--user` / `--user-name`.
pub fn identity(cli: &Cli) -> StaticIdentity {
    match cli.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(id) => {
            let mut user = UserIdentity::new(id);
            user.name = cli.user_name.clone();
            StaticIdentity::new(user)
        }
        None => StaticIdentity::anonymous(),
    }
}

/// Everything a command needs.
pub struct Context {
    /// Loaded configuration.
    pub config: Config,
    /// Resolved data directory.
    pub data_dir: PathBuf,
    /// Chat store in the data directory.
    pub store: JsonChatStore,
    /// Sidebar for the current user.
    pub sidebar: Sidebar<FilePreferenceStore>,
    /// Runtime for store calls.
    pub runtime: Runtime,
}

impl Context {
    /// Build the context from CLI flags and configuration.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = load_config(cli)?;
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => config.data_dir()?,
        };
        let prefs = FilePreferenceStore::in_dir(&data_dir)?;
        let sidebar = Sidebar::new(&identity(cli), prefs, config.default_accent()?);
        let store = JsonChatStore::in_dir(&data_dir);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SidebarError::io("Failed to start async runtime", e))?;

        Ok(Self {
            config,
            data_dir,
            store,
            sidebar,
            runtime,
        })
    }

    /// Current user id, or [`SidebarError::NoUser`].
    pub fn user_id(&self) -> Result<String> {
        self.sidebar
            .user()
            .map(|u| u.id.clone())
            .ok_or(SidebarError::NoUser)
    }

    /// The user's chats; empty when nobody is signed in.
    pub fn chats(&self) -> Result<Vec<Chat>> {
        match self.sidebar.user() {
            Some(user) => self.runtime.block_on(self.store.list_chats(&user.id)),
            None => Ok(Vec::new()),
        }
    }

    /// Whether to paint output with the accent color.
    pub fn color_enabled(&self) -> bool {
        std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
    }

    /// `text` in the current accent when color is enabled.
    pub fn paint(&self, text: &str) -> String {
        if self.color_enabled() {
            paint(text, &self.sidebar.accent().get())
        } else {
            text.to_string()
        }
    }
}

/// `text` styled bold in `accent`.
pub fn paint(text: &str, accent: &AccentColor) -> String {
    style(text).with(accent.terminal_color()).bold().to_string()
}

/// Find a chat by exact id or unique id prefix.
pub fn resolve_chat<'a>(chats: &'a [Chat], id: &str) -> Result<&'a Chat> {
    if let Some(chat) = chats.iter().find(|c| c.id == id) {
        return Ok(chat);
    }
    let mut matches = chats.iter().filter(|c| c.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(chat), None) if !id.is_empty() => Ok(chat),
        (Some(_), Some(_)) => Err(SidebarError::InvalidArgument {
            name: "chat".to_string(),
            reason: format!("'{id}' matches more than one chat"),
        }),
        _ => Err(SidebarError::ChatNotFound {
            chat_id: id.to_string(),
        }),
    }
}
