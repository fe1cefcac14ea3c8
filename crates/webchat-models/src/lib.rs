//! Core types and structures for webchat
//!
//! This crate provides the foundational types used across all webchat crates:
//! the in-memory message model, the remote store row shapes, and the wire
//! types for the agent backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of attempts for a backend call (including the first)
pub const MAX_RETRIES: u32 = 3;

/// Session idle timeout in milliseconds (20 minutes)
pub const SESSION_TIMEOUT_MS: i64 = 20 * 60 * 1000;

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    Contact,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
            Sender::Contact => "contact",
        }
    }

    /// Role used for this sender in the backend conversation history
    pub fn history_role(&self) -> &'static str {
        match self {
            Sender::Ai => "model",
            _ => "user",
        }
    }
}

/// A message as held in memory by a conversation view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sender_name: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender,
            sender_name: None,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A message row as returned by the remote store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub session_id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredMessage {
    /// Convert a store row into the in-memory representation
    pub fn into_chat_message(self) -> ChatMessage {
        ChatMessage {
            id: self.id.to_string(),
            sender: self.sender,
            sender_name: None,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

/// A message to be inserted into the remote store (no row id yet)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub session_id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Contacts (mock mode)
// ============================================================================

/// Presence state of a mock contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Online,
    Offline,
    Away,
}

/// A contact in the mock conversation list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub status: ContactStatus,
    pub last_message: String,
    pub unread_count: u32,
    pub timestamp: String,
}

// ============================================================================
// Backend Wire Types
// ============================================================================

/// One text fragment of a history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPart {
    pub text: String,
}

/// One turn of the conversation as the backend expects it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    pub role: String,
    pub parts: Vec<HistoryPart>,
}

impl HistoryItem {
    pub fn from_message(message: &ChatMessage) -> Self {
        Self {
            role: message.sender.history_role().to_string(),
            parts: vec![HistoryPart {
                text: message.content.clone(),
            }],
        }
    }
}

/// Derive the backend conversation history from an ordered message list
pub fn history_from_messages(messages: &[ChatMessage]) -> Vec<HistoryItem> {
    messages.iter().map(HistoryItem::from_message).collect()
}

/// Request body for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    pub prompt: String,
    pub session_id: String,
    pub history: Vec<HistoryItem>,
}

/// Response body from `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub response: String,
    #[serde(default)]
    pub history: Vec<serde_json::Value>,
}
