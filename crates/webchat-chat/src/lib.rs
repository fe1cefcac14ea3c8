//! Conversation orchestration for webchat
//!
//! This crate provides the AI conversation controller (session lifecycle,
//! optimistic sends, retry policy), the reveal scheduler that simulates
//! token-by-token streaming over a non-streaming transport, and the mock
//! contacts conversation.

pub mod contacts;
pub mod controller;
pub mod reveal;

pub use contacts::ContactsConversation;
pub use controller::{ChatController, ChatState, SendOutcome, WELCOME_MESSAGE};
pub use reveal::{prefixes, reveal, NullSink, RevealOutcome, RevealSink, REVEAL_DELAY};
