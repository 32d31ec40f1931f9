//! Chat store collaborators.
//!
//! The sidebar reads a user's chats and asks for deletions by id; it owns
//! neither. [`ChatStore`] is the seam, with a JSON-file store for the CLI
//! and an in-memory store for tests and embedding.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tokio::fs;
use tracing::{debug, info};

use crate::chat::Chat;
use crate::error::{Result, SidebarError};
use crate::util::atomic_write;

/// Chat file name inside the data directory.
pub const CHATS_FILENAME: &str = "chats.json";

/// Source of chats and sink for deletions.
pub trait ChatStore {
    /// All chats owned by `user_id`, most recently updated first.
    fn list_chats(&self, user_id: &str) -> impl Future<Output = Result<Vec<Chat>>> + Send;

    /// Delete one chat.
    fn delete_chat(&self, chat_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Store kept in memory.
///
/// Ids listed via [`MemoryChatStore::fail_deletes_for`] reject deletion,
/// which lets tests exercise partial failures.
#[derive(Debug, Default)]
pub struct MemoryChatStore {
    chats: Mutex<IndexMap<String, Vec<Chat>>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryChatStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `chats` for `user_id`.
    pub fn with_chats(user_id: impl Into<String>, chats: Vec<Chat>) -> Self {
        let store = Self::new();
        store.chats.lock().insert(user_id.into(), chats);
        store
    }

    /// Make deletes of `chat_id` fail.
    pub fn fail_deletes_for(&self, chat_id: impl Into<String>) {
        self.failing.lock().insert(chat_id.into());
    }

    /// Add a chat for `user_id`, newest first.
    pub fn insert(&self, user_id: impl Into<String>, chat: Chat) {
        self.chats.lock().entry(user_id.into()).or_default().insert(0, chat);
    }
}

impl ChatStore for MemoryChatStore {
    async fn list_chats(&self, user_id: &str) -> Result<Vec<Chat>> {
        let mut chats = self.chats.lock().get(user_id).cloned().unwrap_or_default();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(chats)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<()> {
        if self.failing.lock().contains(chat_id) {
            return Err(SidebarError::delete_failed(chat_id, "store rejected delete"));
        }
        let mut all = self.chats.lock();
        let mut found = false;
        for chats in all.values_mut() {
            let before = chats.len();
            chats.retain(|c| c.id != chat_id);
            found |= chats.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(SidebarError::ChatNotFound {
                chat_id: chat_id.to_string(),
            })
        }
    }
}

/// Store backed by a JSON file mapping user id to chats.
///
/// The file is read on every call so several processes see each other's
/// deletes; writes go through [`atomic_write`]. The mutex serialises
/// read-modify-write cycles within this process.
#[derive(Debug)]
pub struct JsonChatStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonChatStore {
    /// Store at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Store in a data directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(CHATS_FILENAME))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<IndexMap<String, Vec<Chat>>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => {
                return Err(SidebarError::io(
                    format!("Failed to read chats: {}", self.path.display()),
                    e,
                ))
            }
        };
        serde_json::from_str(&content).map_err(|e| SidebarError::CorruptedFile {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, chats: &IndexMap<String, Vec<Chat>>) -> Result<()> {
        let content = serde_json::to_vec_pretty(chats)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, &content))
            .await
            .map_err(|e| SidebarError::io("Chat store write task failed", std::io::Error::other(e)))?
    }

    /// Add a chat for `user_id`.
    pub async fn insert(&self, user_id: &str, chat: Chat) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.load().await?;
        info!(user = user_id, chat = %chat.id, "adding chat");
        all.entry(user_id.to_string()).or_default().insert(0, chat);
        self.save(&all).await
    }
}

impl ChatStore for JsonChatStore {
    async fn list_chats(&self, user_id: &str) -> Result<Vec<Chat>> {
        let mut chats = self.load().await?.shift_remove(user_id).unwrap_or_default();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        debug!(user = user_id, count = chats.len(), "listed chats");
        Ok(chats)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.load().await?;
        let mut found = false;
        for chats in all.values_mut() {
            let before = chats.len();
            chats.retain(|c| c.id != chat_id);
            found |= chats.len() != before;
        }
        if !found {
            return Err(SidebarError::ChatNotFound {
                chat_id: chat_id.to_string(),
            });
        }
        self.save(&all).await?;
        debug!(chat = chat_id, "deleted chat");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_memory_store_lists_newest_first() {
        let now = Utc::now();
        let store = MemoryChatStore::with_chats(
            "u",
            vec![
                Chat::new("old", "Old").with_updated_at(now - Duration::hours(2)),
                Chat::new("new", "New").with_updated_at(now),
            ],
        );
        let chats = store.list_chats("u").await.unwrap();
        assert_eq!(chats[0].id, "new");
        assert!(store.list_chats("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemoryChatStore::with_chats("u", vec![Chat::new("1", "a")]);
        store.delete_chat("1").await.unwrap();
        assert!(store.list_chats("u").await.unwrap().is_empty());
        assert!(matches!(
            store.delete_chat("1").await,
            Err(SidebarError::ChatNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_store_failing_delete() {
        let store = MemoryChatStore::with_chats("u", vec![Chat::new("1", "a")]);
        store.fail_deletes_for("1");
        assert!(matches!(
            store.delete_chat("1").await,
            Err(SidebarError::DeleteFailed { .. })
        ));
        assert_eq!(store.list_chats("u").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonChatStore::in_dir(dir.path());
        assert!(store.list_chats("u").await.unwrap().is_empty());

        store.insert("u", Chat::new("1", "Trip to Paris")).await.unwrap();
        store.insert("u", Chat::new("2", "Budget plan")).await.unwrap();
        assert_eq!(store.list_chats("u").await.unwrap().len(), 2);

        store.delete_chat("1").await.unwrap();
        let chats = JsonChatStore::in_dir(dir.path()).list_chats("u").await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, "2");
    }

    #[tokio::test]
    async fn test_json_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CHATS_FILENAME), "not json").unwrap();
        let store = JsonChatStore::in_dir(dir.path());
        assert!(matches!(
            store.list_chats("u").await,
            Err(SidebarError::CorruptedFile { .. })
        ));
    }
}
