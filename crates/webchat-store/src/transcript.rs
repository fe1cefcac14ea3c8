use std::sync::Arc;

use crate::local::LocalStore;
use crate::session::transcript_key;
use crate::Result;
use webchat_models::ChatMessage;

/// Local transcript cache keyed by session id
///
/// Standalone persistence hook: the main conversation view reads from the
/// remote store, but the cached copy is what session expiry clears and what
/// an offline front-end can fall back to.
pub struct TranscriptCache {
    local: Arc<dyn LocalStore>,
    session_id: String,
}

impl TranscriptCache {
    pub fn new(local: Arc<dyn LocalStore>, session_id: impl Into<String>) -> Self {
        Self {
            local,
            session_id: session_id.into(),
        }
    }

    /// Load the cached transcript, empty when nothing was saved yet
    pub fn load(&self) -> Result<Vec<ChatMessage>> {
        match self.local.get(&transcript_key(&self.session_id))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Persist the full transcript, replacing any previous copy
    pub fn save(&self, messages: &[ChatMessage]) -> Result<()> {
        let raw = serde_json::to_string(messages)?;
        self.local.set(&transcript_key(&self.session_id), &raw)
    }

    pub fn clear(&self) -> Result<()> {
        self.local.remove(&transcript_key(&self.session_id))
    }
}
