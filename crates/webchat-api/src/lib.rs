//! Agent backend client for webchat
//!
//! One HTTP endpoint: `POST {BACKEND_URL}/chat` with the full conversation
//! history plus the new prompt, returning the complete response text. There
//! is no transport-level streaming and no retry at this layer; the
//! conversation orchestrator owns the retry policy.

pub mod client;
pub mod config;

pub use client::AgentClient;
pub use config::BackendConfig;

use thiserror::Error;

/// Errors from the agent backend client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
}
