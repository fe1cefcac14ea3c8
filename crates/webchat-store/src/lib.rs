//! Storage layer for webchat
//!
//! This crate provides the client-local key-value store (the stand-in for
//! browser localStorage), the session manager built on top of it, the
//! transcript cache, and the remote message store client.

pub mod local;
pub mod message_store;
pub mod rest;
pub mod session;
pub mod transcript;

pub use local::{FileLocalStore, LocalStore, MemoryLocalStore};
pub use message_store::{MemoryMessageStore, MessageStore};
pub use rest::RestMessageStore;
pub use session::{SessionCheck, SessionManager};
pub use transcript::TranscriptCache;

use thiserror::Error;

/// Errors from the local and remote storage layers
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("local storage unavailable: {0}")]
    LocalUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("insert returned no row")]
    EmptyInsert,
}

pub type Result<T> = std::result::Result<T, StoreError>;
