//! Keyboard shortcuts active while the sidebar is shown.
//!
//! | Keys                              | Action          |
//! |-----------------------------------|-----------------|
//! | Ctrl+K / Super+K                  | Focus search    |
//! | Ctrl+Shift+O / Super+Shift+O      | New chat        |
//!
//! A matched shortcut consumes the key event; the host must not run its
//! own default action for it.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Sidebar shortcut actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Move focus to the search field.
    FocusSearch,
    /// Navigate to a fresh chat.
    NewChat,
}

impl Shortcut {
    /// Match a key event.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let command = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
        if !command {
            return None;
        }
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'k') && !shift => Some(Self::FocusSearch),
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'o') && shift => Some(Self::NewChat),
            _ => None,
        }
    }

    /// Whether the host's default handling must be suppressed.
    pub const fn prevents_default(self) -> bool {
        true
    }

    /// Hint shown next to the control.
    pub const fn hint(self) -> &'static str {
        match self {
            Self::FocusSearch => "Ctrl+K",
            Self::NewChat => "Ctrl+Shift+O",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[rstest]
    #[case(KeyCode::Char('k'), KeyModifiers::CONTROL, Some(Shortcut::FocusSearch))]
    #[case(KeyCode::Char('k'), KeyModifiers::SUPER, Some(Shortcut::FocusSearch))]
    #[case(KeyCode::Char('O'), KeyModifiers::CONTROL | KeyModifiers::SHIFT, Some(Shortcut::NewChat))]
    #[case(KeyCode::Char('o'), KeyModifiers::SUPER | KeyModifiers::SHIFT, Some(Shortcut::NewChat))]
    #[case(KeyCode::Char('k'), KeyModifiers::NONE, None)]
    #[case(KeyCode::Char('o'), KeyModifiers::CONTROL, None)]
    #[case(KeyCode::Char('k'), KeyModifiers::CONTROL | KeyModifiers::SHIFT, None)]
    #[case(KeyCode::Enter, KeyModifiers::CONTROL, None)]
    fn test_from_key(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] expected: Option<Shortcut>,
    ) {
        assert_eq!(Shortcut::from_key(&key(code, modifiers)), expected);
    }

    #[test]
    fn test_release_ignored() {
        let mut event = key(KeyCode::Char('k'), KeyModifiers::CONTROL);
        event.kind = KeyEventKind::Release;
        assert_eq!(Shortcut::from_key(&event), None);
    }

    #[test]
    fn test_all_prevent_default() {
        assert!(Shortcut::FocusSearch.prevents_default());
        assert!(Shortcut::NewChat.prevents_default());
    }
}
