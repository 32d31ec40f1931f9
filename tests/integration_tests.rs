//! Integration tests for chat-sidebar.
//!
//! These tests drive the sidebar against real preference and chat stores
//! in temporary directories, covering persistence across sessions,
//! deletion, bulk clear and export.

use chat_sidebar::export::{parse_export, write_export};
use chat_sidebar::prelude::*;
use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Chats with strictly decreasing timestamps so store order is deterministic.
fn sample_chats() -> Vec<Chat> {
    let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    vec![
        Chat::new("c1", "Trip to Paris")
            .with_last_message("Book the Louvre")
            .with_updated_at(base),
        Chat::new("c2", "Rust lifetimes").with_updated_at(base - Duration::hours(1)),
        Chat::new("c3", "Paris restaurants")
            .with_last_message("Try the bistro")
            .with_updated_at(base - Duration::hours(2)),
        Chat::new("c4", "Groceries").with_updated_at(base - Duration::hours(3)),
    ]
}

fn ids(chats: &[Chat]) -> Vec<&str> {
    chats.iter().map(|c| c.id.as_str()).collect()
}

fn alice() -> StaticIdentity {
    StaticIdentity::new(UserIdentity::new("alice").with_name("Alice Liddell"))
}

fn open_sidebar(dir: &TempDir, identity: &StaticIdentity) -> Sidebar<FilePreferenceStore> {
    let prefs = FilePreferenceStore::in_dir(dir.path()).unwrap();
    Sidebar::new(identity, prefs, AccentColor::default())
}

mod persistence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preferences_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let identity = alice();

        {
            let mut sidebar = open_sidebar(&dir, &identity);
            sidebar.toggle_pin("c3").unwrap();
            sidebar.toggle_pin("c1").unwrap();
            sidebar.set_accent("#10B981").unwrap();
            sidebar.set_role(Role::Owner).unwrap();
        }

        let sidebar = open_sidebar(&dir, &identity);
        assert_eq!(sidebar.pins(), ["c1".to_string(), "c3".to_string()]);
        assert_eq!(sidebar.accent().get().as_str(), "#10b981");
        assert_eq!(sidebar.role(), Role::Owner);
    }

    #[test]
    fn test_users_do_not_share_preferences() {
        let dir = TempDir::new().unwrap();

        {
            let mut sidebar = open_sidebar(&dir, &alice());
            sidebar.toggle_pin("c1").unwrap();
            sidebar.set_accent("#ef4444").unwrap();
        }

        let bob = StaticIdentity::new(UserIdentity::new("bob"));
        let sidebar = open_sidebar(&dir, &bob);
        assert!(sidebar.pins().is_empty());
        assert_eq!(sidebar.accent().get(), AccentColor::default());
    }

    #[test]
    fn test_malformed_preference_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("preferences.json"), "{ not json").unwrap();

        let mut sidebar = open_sidebar(&dir, &alice());
        assert!(sidebar.pins().is_empty());
        assert_eq!(sidebar.role(), Role::Member);

        // The next write replaces the broken file.
        sidebar.toggle_pin("c2").unwrap();
        let reopened = open_sidebar(&dir, &alice());
        assert_eq!(reopened.pins(), ["c2".to_string()]);
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("preferences.json"),
            r#"{"alice:pinned_chats":"not an array","alice:accent_color":"teal","alice:role":"Janitor"}"#,
        )
        .unwrap();

        let identity = StaticIdentity::new(UserIdentity::new("alice").with_role(Role::Admin));
        let sidebar = open_sidebar(&dir, &identity);
        assert!(sidebar.pins().is_empty());
        assert_eq!(sidebar.accent().get(), AccentColor::default());
        assert_eq!(sidebar.role(), Role::Admin);
    }
}

mod view {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_pinned_first_then_store_order() {
        let dir = TempDir::new().unwrap();
        let store = MemoryChatStore::with_chats("alice", sample_chats());
        let mut sidebar = open_sidebar(&dir, &alice());

        sidebar.toggle_pin("c4").unwrap();
        sidebar.toggle_pin("c2").unwrap();

        let chats = store.list_chats("alice").await.unwrap();
        let view = sidebar.view(&chats);
        assert_eq!(ids(&view.pinned), ["c2", "c4"]);
        assert_eq!(ids(&view.general), ["c1", "c3"]);

        sidebar.set_query("PARIS");
        let view = sidebar.view(&chats);
        assert!(view.pinned.is_empty());
        assert_eq!(ids(&view.general), ["c1", "c3"]);
    }

    #[test]
    fn test_source_order_policy() {
        let dir = TempDir::new().unwrap();
        let mut sidebar = open_sidebar(&dir, &alice()).with_pinned_order(PinnedOrder::SourceOrder);
        sidebar.toggle_pin("c1").unwrap();
        sidebar.toggle_pin("c4").unwrap();

        let view = sidebar.view(&sample_chats());
        assert_eq!(ids(&view.pinned), ["c1", "c4"]);
    }

    #[test]
    fn test_anonymous_sidebar_is_empty_and_read_only() {
        let dir = TempDir::new().unwrap();
        let mut sidebar = open_sidebar(&dir, &StaticIdentity::anonymous());

        assert!(sidebar.view(&sample_chats()).is_empty());
        assert!(matches!(sidebar.toggle_pin("c1"), Err(SidebarError::NoUser)));
        assert!(matches!(sidebar.set_accent("#ef4444"), Err(SidebarError::NoUser)));
        assert!(!dir.path().join("preferences.json").exists());
    }
}

mod deletion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_delete_through_json_store_unpins() {
        let dir = TempDir::new().unwrap();
        let store = JsonChatStore::in_dir(dir.path());
        for chat in sample_chats().into_iter().rev() {
            store.insert("alice", chat).await.unwrap();
        }

        let mut sidebar = open_sidebar(&dir, &alice());
        sidebar.toggle_pin("c3").unwrap();

        sidebar.delete_chat(&store, "c3").await.unwrap();

        let remaining = store.list_chats("alice").await.unwrap();
        assert_eq!(ids(&remaining), ["c1", "c2", "c4"]);
        assert!(!sidebar.is_pinned("c3"));
        assert!(open_sidebar(&dir, &alice()).pins().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_chat() {
        let dir = TempDir::new().unwrap();
        let store = JsonChatStore::in_dir(dir.path());
        let mut sidebar = open_sidebar(&dir, &alice());

        let err = sidebar.delete_chat(&store, "missing").await.unwrap_err();
        assert!(matches!(err, SidebarError::ChatNotFound { .. }));
    }

    #[tokio::test]
    async fn test_clear_requires_exact_confirmation() {
        let dir = TempDir::new().unwrap();
        let store = MemoryChatStore::with_chats("alice", sample_chats());
        let mut sidebar = open_sidebar(&dir, &alice());
        let chats = store.list_chats("alice").await.unwrap();

        for attempt in ["", "delete", "DELETE ", " DELETE", "DELET"] {
            let err = sidebar.clear_all(&store, &chats, attempt).await.unwrap_err();
            assert!(matches!(err, SidebarError::ConfirmationMismatch { .. }));
        }
        assert_eq!(store.list_chats("alice").await.unwrap().len(), 4);

        let report = sidebar
            .clear_all(&store, &chats, CLEAR_CONFIRMATION)
            .await
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(report.summary(), "Deleted 4 chats");
        assert!(store.list_chats("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_reports_partial_failure() {
        let dir = TempDir::new().unwrap();
        let store = MemoryChatStore::with_chats("alice", sample_chats());
        store.fail_deletes_for("c2");

        let mut sidebar = open_sidebar(&dir, &alice());
        sidebar.toggle_pin("c2").unwrap();
        sidebar.toggle_pin("c3").unwrap();

        let chats = store.list_chats("alice").await.unwrap();
        let report = sidebar.clear_all(&store, &chats, "DELETE").await.unwrap();

        assert_eq!(report.attempted, 4);
        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].chat_id, "c2");
        assert_eq!(report.summary(), "Deleted 3 of 4 chats; 1 failed");

        // Only the surviving chat keeps its pin.
        assert_eq!(sidebar.pins(), ["c2".to_string()]);
        assert_eq!(ids(&store.list_chats("alice").await.unwrap()), ["c2"]);
    }
}

mod export {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_ignores_query_and_pins() {
        let dir = TempDir::new().unwrap();
        let mut sidebar = open_sidebar(&dir, &alice());
        sidebar.toggle_pin("c4").unwrap();
        sidebar.set_query("paris");

        let chats = sample_chats();
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        let document = sidebar
            .export(&chats, &ExportOptions::new(ExportFormat::Json).exported_at(at))
            .unwrap();

        assert_eq!(document.filename, "chat-history-alice-2025-06-02.json");
        assert_eq!(document.chat_count, 4);

        let parsed = parse_export(&document.contents).unwrap();
        assert_eq!(parsed.user_id, "alice");
        assert_eq!(parsed.chats, chats);
    }

    #[test]
    fn test_write_markdown_export() {
        let dir = TempDir::new().unwrap();
        let sidebar = open_sidebar(&dir, &alice());
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();

        let document = sidebar
            .export(&sample_chats(), &ExportOptions::new(ExportFormat::Markdown).exported_at(at))
            .unwrap();
        let path = write_export(&document, dir.path().join("exports")).unwrap();

        assert!(path.ends_with("chat-history-alice-2025-06-02.md"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("# Chat history"));
        assert!(text.contains("## Trip to Paris"));
        assert!(text.contains("> Book the Louvre"));
    }

    #[test]
    fn test_export_without_user_fails() {
        let dir = TempDir::new().unwrap();
        let sidebar = open_sidebar(&dir, &StaticIdentity::anonymous());
        assert!(matches!(
            sidebar.export(&sample_chats(), &ExportOptions::default()),
            Err(SidebarError::NoUser)
        ));
    }
}

mod feedback {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_feedback_log_round_trip() {
        let dir = TempDir::new().unwrap();
        let log = FeedbackLog::in_dir(dir.path());

        let first = FeedbackDraft::new("  Love the pins  ").submit("alice").unwrap();
        let second = FeedbackDraft::new("Search misses previews")
            .with_category(FeedbackCategory::Bug)
            .submit("alice")
            .unwrap();
        log.append(&first).unwrap();
        log.append(&second).unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries, vec![first.clone(), second]);
        assert_eq!(entries[0].text, "Love the pins");
    }

    #[test]
    fn test_blank_feedback_is_rejected() {
        let err = FeedbackDraft::new(" \n\t ").submit("alice").unwrap_err();
        assert!(matches!(err, SidebarError::EmptyFeedback));
        assert!(err.is_validation());
    }
}
