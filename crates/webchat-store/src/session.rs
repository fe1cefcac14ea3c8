use std::sync::Arc;

use chrono::{DateTime, Utc};
use colored::Colorize;
use uuid::Uuid;

use crate::local::LocalStore;
use crate::message_store::MessageStore;
use crate::Result;
use webchat_models::SESSION_TIMEOUT_MS;

/// Key under which the durable session identifier lives
const SESSION_ID_KEY: &str = "session_id";

/// Result of a session load: the active id and whether the idle timeout fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCheck {
    pub session_id: String,
    pub expired: bool,
}

/// Owns the client-side session identity and its idle-timeout policy
pub struct SessionManager {
    local: Arc<dyn LocalStore>,
}

/// Whether a session is past its idle timeout at `now_ms`
///
/// A session with no recorded last-touch counts as expired.
pub fn is_expired(last_touch_ms: Option<i64>, now_ms: i64) -> bool {
    match last_touch_ms {
        Some(touched) => now_ms - touched > SESSION_TIMEOUT_MS,
        None => true,
    }
}

impl SessionManager {
    pub fn new(local: Arc<dyn LocalStore>) -> Self {
        Self { local }
    }

    pub fn local(&self) -> Arc<dyn LocalStore> {
        self.local.clone()
    }

    /// Read the persisted session id, generating and persisting a fresh one
    /// if none exists yet
    pub fn get_or_create_session_id(&self) -> Result<String> {
        if let Some(id) = self.local.get(SESSION_ID_KEY)? {
            let id = id.trim().to_string();
            if !id.is_empty() {
                return Ok(id);
            }
        }

        let id = Uuid::new_v4().to_string();
        self.local.set(SESSION_ID_KEY, &id)?;
        Ok(id)
    }

    /// Run the expiry check for the active session and refresh its last-touch
    ///
    /// On expiry the cached transcript is cleared and the session's rows are
    /// bulk-deleted from the message store. The last-touch time is re-recorded
    /// unconditionally, expired or not.
    pub async fn load_session(&self, store: &dyn MessageStore) -> Result<SessionCheck> {
        self.load_session_at(store, Utc::now()).await
    }

    /// Same as `load_session`, with an explicit clock for tests
    pub async fn load_session_at(
        &self,
        store: &dyn MessageStore,
        now: DateTime<Utc>,
    ) -> Result<SessionCheck> {
        let session_id = self.get_or_create_session_id()?;
        let now_ms = now.timestamp_millis();

        let last_touch_ms = self
            .local
            .get(&touch_key(&session_id))?
            .and_then(|v| v.trim().parse::<i64>().ok());

        let expired = is_expired(last_touch_ms, now_ms);
        if expired {
            self.local.remove(&transcript_key(&session_id))?;
            // Store and local state are not transactionally linked; a failed
            // bulk delete must not block the session from loading
            if let Err(e) = store.delete_session(&session_id).await {
                eprintln!(
                    "{} Failed to clear expired session {}: {}",
                    "⚠️".yellow(),
                    session_id,
                    e
                );
            }
        }

        self.local.set(&touch_key(&session_id), &now_ms.to_string())?;

        Ok(SessionCheck {
            session_id,
            expired,
        })
    }
}

/// Local-store key recording the session's last-touch epoch millis
pub fn touch_key(session_id: &str) -> String {
    format!("chat_{}_time", session_id)
}

/// Local-store key holding the cached transcript for a session
pub fn transcript_key(session_id: &str) -> String {
    format!("chat_{}", session_id)
}
