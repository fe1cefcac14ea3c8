use std::sync::Mutex;

use async_trait::async_trait;

use crate::Result;
use webchat_models::{NewMessage, StoredMessage};

/// Remote message store - unified interface for all persistence backends
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// All messages for a session, ordered by timestamp ascending
    async fn list(&self, session_id: &str) -> Result<Vec<StoredMessage>>;

    /// Insert a message and return the stored row (with its assigned id)
    async fn insert(&self, message: NewMessage) -> Result<StoredMessage>;

    /// Replace the content of an existing row
    async fn update_content(&self, row_id: i64, content: &str) -> Result<()>;

    /// Delete every message belonging to a session
    async fn delete_session(&self, session_id: &str) -> Result<()>;
}

/// In-memory message store used by tests and offline runs
#[derive(Default)]
pub struct MemoryMessageStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rows: Vec<StoredMessage>,
    next_id: i64,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held, across all sessions
    pub fn row_count(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn list(&self, session_id: &str) -> Result<Vec<StoredMessage>> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<StoredMessage> = inner
            .rows
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn insert(&self, message: NewMessage) -> Result<StoredMessage> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let row = StoredMessage {
            id: inner.next_id,
            session_id: message.session_id,
            sender: message.sender,
            content: message.content,
            timestamp: message.timestamp,
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn update_content(&self, row_id: i64, content: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner.rows.iter_mut().find(|r| r.id == row_id) {
            row.content = content.to_string();
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.rows.retain(|r| r.session_id != session_id);
        Ok(())
    }
}
