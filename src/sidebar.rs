//! Sidebar controller.
//!
//! [`Sidebar`] owns the process-local UI state (search query, pin set,
//! dialog flags, focus) for the signed-in user and routes every action to
//! the right collaborator: preferences for pins, accent and role, the chat
//! store for deletions, the exporter for downloads.
//!
//! With no user signed in the sidebar shows nothing and rejects mutations
//! with [`SidebarError::NoUser`].

use crossterm::event::KeyEvent;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chat::Chat;
use crate::error::{Result, SidebarError, CLEAR_CONFIRMATION};
use crate::export::{export_history, ExportDocument, ExportOptions};
use crate::identity::{IdentityProvider, Role, UserIdentity};
use crate::prefs::{PreferenceStore, UserPreferences};
use crate::projection::{project_with, toggle_pin_with_outcome, ChatGroups, PinToggle, PinnedOrder};
use crate::shortcuts::Shortcut;
use crate::store::ChatStore;
use crate::theme::{AccentColor, AccentHandle};

/// Route for a fresh chat.
pub const NEW_CHAT_ROUTE: &str = "/";

/// Greeting shown when there is nothing to list.
pub const HEADLINE: &str = "What can I help with?";

/// Dialogs the sidebar can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialog {
    /// Workspace settings (accent, role).
    Settings,
    /// Clear-all-history confirmation.
    ClearHistory,
    /// Export download.
    Export,
    /// Feedback form.
    Feedback,
    /// Server manager.
    Servers,
}

impl Dialog {
    /// Every dialog.
    pub const ALL: [Dialog; 5] = [
        Dialog::Settings,
        Dialog::ClearHistory,
        Dialog::Export,
        Dialog::Feedback,
        Dialog::Servers,
    ];
}

/// Open/closed flags, one per dialog, all closed by default.
///
/// Flags are independent: opening one dialog leaves the others as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogState {
    settings: bool,
    clear_history: bool,
    export: bool,
    feedback: bool,
    servers: bool,
}

impl DialogState {
    fn flag(&mut self, dialog: Dialog) -> &mut bool {
        match dialog {
            Dialog::Settings => &mut self.settings,
            Dialog::ClearHistory => &mut self.clear_history,
            Dialog::Export => &mut self.export,
            Dialog::Feedback => &mut self.feedback,
            Dialog::Servers => &mut self.servers,
        }
    }

    /// Whether `dialog` is open.
    pub fn is_open(&self, dialog: Dialog) -> bool {
        match dialog {
            Dialog::Settings => self.settings,
            Dialog::ClearHistory => self.clear_history,
            Dialog::Export => self.export,
            Dialog::Feedback => self.feedback,
            Dialog::Servers => self.servers,
        }
    }

    /// Open `dialog`.
    pub fn open(&mut self, dialog: Dialog) {
        *self.flag(dialog) = true;
    }

    /// Close `dialog`.
    pub fn close(&mut self, dialog: Dialog) {
        *self.flag(dialog) = false;
    }

    /// Set `dialog` to `open`.
    pub fn set(&mut self, dialog: Dialog, open: bool) {
        *self.flag(dialog) = open;
    }

    /// Currently open dialogs.
    pub fn open_dialogs(&self) -> Vec<Dialog> {
        Dialog::ALL.into_iter().filter(|d| self.is_open(*d)).collect()
    }
}

/// What the host should do after a dispatched shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    /// Search field should take focus.
    FocusSearch,
    /// Navigate to a route.
    Navigate(String),
}

/// One delete that failed during a bulk clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDelete {
    /// Chat that was not deleted.
    pub chat_id: String,
    /// Why.
    pub message: String,
}

/// Outcome of a bulk clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    /// Deletes issued.
    pub attempted: usize,
    /// Deletes that succeeded.
    pub succeeded: usize,
    /// Deletes that failed.
    pub failed: Vec<FailedDelete>,
}

impl ClearReport {
    /// Whether every delete succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// User-facing summary.
    pub fn summary(&self) -> String {
        if self.is_complete() {
            format!(
                "Deleted {} chat{}",
                self.succeeded,
                crate::util::plural(self.succeeded)
            )
        } else {
            format!(
                "Deleted {} of {} chats; {} failed",
                self.succeeded,
                self.attempted,
                self.failed.len()
            )
        }
    }
}

/// Sidebar state for one user over a preference store.
#[derive(Debug)]
pub struct Sidebar<P> {
    user: Option<UserIdentity>,
    store: P,
    query: String,
    pins: Vec<String>,
    role_override: Option<Role>,
    accent: AccentHandle,
    dialogs: DialogState,
    search_focused: bool,
    pinned_order: PinnedOrder,
}

impl<P: PreferenceStore> Sidebar<P> {
    /// Load the sidebar for whoever `identity` reports.
    ///
    /// Stored pins, accent and role are read from the user's namespace;
    /// missing or malformed values fall back to empty, `default_accent`
    /// and the provider's role respectively.
    pub fn new(identity: &impl IdentityProvider, mut store: P, default_accent: AccentColor) -> Self {
        let user = identity.current_user().filter(|u| !u.id.trim().is_empty());

        let (pins, accent, role_override) = match &user {
            Some(user) => {
                let prefs = UserPreferences::new(&mut store, user.id.clone());
                (
                    prefs.pins(),
                    prefs.accent().unwrap_or(default_accent),
                    prefs.role(),
                )
            }
            None => (Vec::new(), default_accent, None),
        };

        debug!(
            user = user.as_ref().map(|u| u.id.as_str()).unwrap_or(""),
            pins = pins.len(),
            accent = %accent,
            "loaded sidebar"
        );

        Self {
            user,
            store,
            query: String::new(),
            pins,
            role_override,
            accent: AccentHandle::new(accent),
            dialogs: DialogState::default(),
            search_focused: false,
            pinned_order: PinnedOrder::default(),
        }
    }

    /// Builder: choose the pinned-group ordering.
    pub fn with_pinned_order(mut self, order: PinnedOrder) -> Self {
        self.pinned_order = order;
        self
    }

    /// Change the pinned-group ordering.
    pub fn set_pinned_order(&mut self, order: PinnedOrder) {
        self.pinned_order = order;
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    fn require_user(&self) -> Result<String> {
        self.user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or(SidebarError::NoUser)
    }

    fn prefs(&mut self) -> Result<UserPreferences<&mut P>> {
        let user_id = self.require_user()?;
        Ok(UserPreferences::new(&mut self.store, user_id))
    }

    /// Effective role: stored override, else provider role, else Member.
    pub fn role(&self) -> Role {
        self.role_override
            .or_else(|| self.user.as_ref().and_then(|u| u.role))
            .unwrap_or_default()
    }

    /// Persist a role override.
    pub fn set_role(&mut self, role: Role) -> Result<()> {
        self.prefs()?.set_role(role)?;
        self.role_override = Some(role);
        info!(%role, "role override set");
        Ok(())
    }

    /// Drop the role override so the provider's role applies again.
    pub fn clear_role(&mut self) -> Result<()> {
        self.prefs()?.clear_role()?;
        self.role_override = None;
        Ok(())
    }

    /// Whether a stored role override is active.
    pub fn has_role_override(&self) -> bool {
        self.role_override.is_some()
    }

    /// Current search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Clear the search text.
    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Pin set, most recently pinned first.
    pub fn pins(&self) -> &[String] {
        &self.pins
    }

    /// Whether `chat_id` is pinned.
    pub fn is_pinned(&self, chat_id: &str) -> bool {
        self.pins.iter().any(|p| p == chat_id)
    }

    /// Grouped view of `chats` under the current query and pins.
    ///
    /// Empty when nobody is signed in.
    pub fn view(&self, chats: &[Chat]) -> ChatGroups {
        if self.user.is_none() {
            return ChatGroups::default();
        }
        project_with(chats, &self.query, &self.pins, self.pinned_order)
    }

    /// Pin or unpin a chat, persisting the new set.
    pub fn toggle_pin(&mut self, chat_id: &str) -> Result<PinToggle> {
        let (next, outcome) = toggle_pin_with_outcome(&self.pins, chat_id);
        self.prefs()?.set_pins(&next)?;
        self.pins = next;
        info!(chat = chat_id, outcome = outcome.message(), "pin toggled");
        Ok(outcome)
    }

    /// Shared accent handle for renderers.
    pub fn accent(&self) -> AccentHandle {
        self.accent.clone()
    }

    /// Validate, apply and persist an accent color.
    pub fn set_accent(&mut self, color: &str) -> Result<AccentColor> {
        let color = AccentColor::parse(color)?;
        self.prefs()?.set_accent(&color)?;
        self.accent.set(color.clone());
        info!(accent = %color, "accent updated");
        Ok(color)
    }

    /// Dialog flags.
    pub fn dialogs(&self) -> &DialogState {
        &self.dialogs
    }

    /// Mutable dialog flags.
    pub fn dialogs_mut(&mut self) -> &mut DialogState {
        &mut self.dialogs
    }

    /// Whether the search field has focus.
    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    /// Set search focus, e.g. when the field is clicked or blurred.
    pub fn set_search_focused(&mut self, focused: bool) {
        self.search_focused = focused;
    }

    /// Apply a key event; `Some` means the event was consumed.
    pub fn dispatch(&mut self, key: &KeyEvent) -> Option<SidebarEvent> {
        let shortcut = Shortcut::from_key(key)?;
        debug!(?shortcut, "shortcut");
        match shortcut {
            Shortcut::FocusSearch => {
                self.search_focused = true;
                Some(SidebarEvent::FocusSearch)
            }
            Shortcut::NewChat => Some(SidebarEvent::Navigate(NEW_CHAT_ROUTE.to_string())),
        }
    }

    /// Drop pins for chats that no longer exist.
    fn forget_pins(&mut self, deleted: &[&str]) -> Result<()> {
        if !self.pins.iter().any(|p| deleted.contains(&p.as_str())) {
            return Ok(());
        }
        let next: Vec<String> = self
            .pins
            .iter()
            .filter(|p| !deleted.contains(&p.as_str()))
            .cloned()
            .collect();
        self.prefs()?.set_pins(&next)?;
        self.pins = next;
        Ok(())
    }

    /// Delete one chat and forget its pin.
    pub async fn delete_chat<S: ChatStore>(&mut self, store: &S, chat_id: &str) -> Result<()> {
        self.require_user()?;
        store.delete_chat(chat_id).await.map_err(|e| match e {
            e @ (SidebarError::DeleteFailed { .. } | SidebarError::ChatNotFound { .. }) => e,
            other => SidebarError::delete_failed(chat_id, other.to_string()),
        })?;
        self.forget_pins(&[chat_id])?;
        info!(chat = chat_id, "chat deleted");
        Ok(())
    }

    /// Delete every chat in `chats` after an exact `DELETE` confirmation.
    ///
    /// All deletes are issued and awaited; individual failures are logged
    /// and reported rather than stopping the rest.
    pub async fn clear_all<S: ChatStore>(
        &mut self,
        store: &S,
        chats: &[Chat],
        confirmation: &str,
    ) -> Result<ClearReport> {
        if confirmation != CLEAR_CONFIRMATION {
            return Err(SidebarError::ConfirmationMismatch {
                expected: CLEAR_CONFIRMATION,
            });
        }
        self.require_user()?;

        let results = join_all(chats.iter().map(|chat| async move {
            (chat.id.as_str(), store.delete_chat(&chat.id).await)
        }))
        .await;

        let mut report = ClearReport {
            attempted: chats.len(),
            ..ClearReport::default()
        };
        let mut deleted = Vec::new();
        for (chat_id, result) in results {
            match result {
                Ok(()) => {
                    report.succeeded += 1;
                    deleted.push(chat_id);
                }
                Err(e) => {
                    warn!(chat = chat_id, error = %e, "delete failed during clear");
                    report.failed.push(FailedDelete {
                        chat_id: chat_id.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        self.forget_pins(&deleted)?;
        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            "history cleared"
        );
        Ok(report)
    }

    /// Export the full collection, ignoring query and pins.
    pub fn export(&self, chats: &[Chat], options: &ExportOptions) -> Result<ExportDocument> {
        let user_id = self.require_user()?;
        export_history(&user_id, chats, options)
    }

    /// Release the preference store.
    pub fn into_store(self) -> P {
        self.store
    }
}
