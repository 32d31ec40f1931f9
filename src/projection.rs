//! Chat list projection: search filter, pinned/general grouping and pin toggling.
//!
//! [`project`] is a pure function of the chat collection, the search query
//! and the pin set. The pinned group follows pin order (most recently pinned
//! first); [`project_with`] accepts [`PinnedOrder::SourceOrder`] for callers
//! that want the collection's order instead.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::chat::Chat;

/// The two sidebar groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupLabel {
    /// Chats whose id is in the pin set.
    Pinned,
    /// Everything else.
    General,
}

impl GroupLabel {
    /// Display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pinned => "Pinned",
            Self::General => "General",
        }
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering policy for the pinned group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinnedOrder {
    /// Follow the pin set, most recently pinned first.
    #[default]
    PinOrder,
    /// Keep the chat collection's order.
    SourceOrder,
}

/// Grouped, filtered view of the chat list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChatGroups {
    /// Pinned chats that match the query.
    pub pinned: Vec<Chat>,
    /// Unpinned chats that match the query, in source order.
    pub general: Vec<Chat>,
}

impl ChatGroups {
    /// Chats in a group.
    pub fn group(&self, label: GroupLabel) -> &[Chat] {
        match label {
            GroupLabel::Pinned => &self.pinned,
            GroupLabel::General => &self.general,
        }
    }

    /// Both groups in display order, labelled.
    pub fn iter(&self) -> impl Iterator<Item = (GroupLabel, &[Chat])> {
        [GroupLabel::Pinned, GroupLabel::General]
            .into_iter()
            .map(move |label| (label, self.group(label)))
    }

    /// Total number of visible chats.
    pub fn len(&self) -> usize {
        self.pinned.len() + self.general.len()
    }

    /// Whether nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.general.is_empty()
    }
}

/// Case-insensitive substring match against the chat title.
///
/// An empty query matches every chat. `last_message` is never searched.
pub fn matches_query(chat: &Chat, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    chat.title.to_lowercase().contains(&query.to_lowercase())
}

/// Project the chat list using the default pinned order.
pub fn project(chats: &[Chat], query: &str, pins: &[String]) -> ChatGroups {
    project_with(chats, query, pins, PinnedOrder::default())
}

/// Project the chat list with an explicit pinned-order policy.
pub fn project_with(chats: &[Chat], query: &str, pins: &[String], order: PinnedOrder) -> ChatGroups {
    let query = query.to_lowercase();
    // Rank of each pinned id; the first occurrence wins if the set has duplicates.
    let mut rank: HashMap<&str, usize> = HashMap::with_capacity(pins.len());
    for (i, id) in pins.iter().enumerate() {
        rank.entry(id.as_str()).or_insert(i);
    }

    let mut pinned: Vec<(usize, &Chat)> = Vec::new();
    let mut general = Vec::new();

    for chat in chats {
        if !query.is_empty() && !chat.title.to_lowercase().contains(&query) {
            continue;
        }
        match rank.get(chat.id.as_str()) {
            Some(&r) => pinned.push((r, chat)),
            None => general.push(chat.clone()),
        }
    }

    if order == PinnedOrder::PinOrder {
        // Stable, so chats sharing an id keep source order.
        pinned.sort_by_key(|(r, _)| *r);
    }

    let groups = ChatGroups {
        pinned: pinned.into_iter().map(|(_, c)| c.clone()).collect(),
        general,
    };
    tracing::debug!(
        total = chats.len(),
        pinned = groups.pinned.len(),
        general = groups.general.len(),
        "projected chat list"
    );
    groups
}

/// Outcome of toggling a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinToggle {
    /// The chat is now pinned.
    Pinned,
    /// The chat is no longer pinned.
    Unpinned,
}

impl PinToggle {
    /// User-facing confirmation message.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Pinned => "Chat pinned",
            Self::Unpinned => "Chat unpinned",
        }
    }
}

/// Toggle `id` in the pin set, returning the new set.
///
/// Present ids are removed with the remainder's order kept; absent ids are
/// prepended. The input is left untouched.
pub fn toggle_pin(pins: &[String], id: &str) -> Vec<String> {
    toggle_pin_with_outcome(pins, id).0
}

/// Like [`toggle_pin`], also reporting which way the toggle went.
pub fn toggle_pin_with_outcome(pins: &[String], id: &str) -> (Vec<String>, PinToggle) {
    if pins.iter().any(|p| p == id) {
        let rest = pins.iter().filter(|p| *p != id).cloned().collect();
        (rest, PinToggle::Unpinned)
    } else {
        let mut next = Vec::with_capacity(pins.len() + 1);
        next.push(id.to_string());
        next.extend_from_slice(pins);
        (next, PinToggle::Pinned)
    }
}
