use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::reveal::{reveal, RevealOutcome, RevealSink, REVEAL_DELAY};
use webchat_api::AgentClient;
use webchat_models::{
    history_from_messages, ChatMessage, NewMessage, Sender, MAX_RETRIES,
};
use webchat_store::{MessageStore, SessionManager, TranscriptCache};

/// Canned greeting seeded into an empty conversation
pub const WELCOME_MESSAGE: &str = "Olá! Sou o Agente SDR da Elite Dev, um assistente de \
pré-vendas dedicado a entender suas necessidades e ajudar você a encontrar a melhor \
solução para sua empresa!";

/// Lifecycle of one conversation view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// No session id yet; nothing may be rendered
    Uninitialized,
    Ready,
    Sending,
    Streaming,
}

/// What happened to a submitted prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Guard rejected the send: empty content, send in flight, or no session
    Rejected,
    /// All attempts failed; the user message is retained, no AI turn appended
    Failed,
    Completed,
    Cancelled,
}

/// Orchestrates one AI conversation: session lifecycle, message list state,
/// retry policy and the streaming reveal
pub struct ChatController {
    session: SessionManager,
    store: Arc<dyn MessageStore>,
    client: AgentClient,
    session_id: Option<String>,
    messages: Vec<ChatMessage>,
    state: ChatState,
    reveal_delay: Duration,
    cancel: CancellationToken,
}

impl ChatController {
    pub fn new(session: SessionManager, store: Arc<dyn MessageStore>, client: AgentClient) -> Self {
        Self {
            session,
            store,
            client,
            session_id: None,
            messages: Vec::new(),
            state: ChatState::Uninitialized,
            reveal_delay: REVEAL_DELAY,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.state, ChatState::Sending | ChatState::Streaming)
    }

    /// Token that aborts an in-flight reveal when the view goes away
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Establish the session, run the expiry check, and load or seed the
    /// message list
    ///
    /// Fails only when no session id can be established (local storage
    /// unavailable); the caller must not render the view in that case.
    pub async fn initialize(&mut self) -> Result<()> {
        let check = self.session.load_session(self.store.as_ref()).await?;
        let session_id = check.session_id.clone();

        // A failed load reads as an empty conversation and the welcome
        // path below takes over
        let rows = match self.store.list(&session_id).await {
            Ok(rows) => rows,
            Err(e) => {
                eprintln!("{} Failed to load messages: {}", "⚠️".yellow(), e);
                Vec::new()
            }
        };

        if rows.is_empty() {
            let welcome = ChatMessage::new("ai-welcome", Sender::Ai, WELCOME_MESSAGE);
            if let Err(e) = self
                .store
                .insert(NewMessage {
                    session_id: session_id.clone(),
                    sender: Sender::Ai,
                    content: welcome.content.clone(),
                    timestamp: welcome.timestamp,
                })
                .await
            {
                eprintln!("{} Failed to persist welcome message: {}", "⚠️".yellow(), e);
            }
            self.messages = vec![welcome];
        } else {
            self.messages = rows.into_iter().map(|r| r.into_chat_message()).collect();
        }

        self.session_id = Some(session_id);
        self.state = ChatState::Ready;
        self.save_transcript();
        Ok(())
    }

    /// Mirror the current message list into the local transcript cache
    ///
    /// This is the copy the session expiry check clears; losing a write only
    /// costs the offline fallback.
    fn save_transcript(&self) {
        if let Some(session_id) = &self.session_id {
            let cache = TranscriptCache::new(self.session.local(), session_id);
            if let Err(e) = cache.save(&self.messages) {
                eprintln!("{} Failed to cache transcript: {}", "⚠️".yellow(), e);
            }
        }
    }

    /// Submit a prompt: optimistic append, persist, call the backend with up
    /// to `MAX_RETRIES` attempts, then reveal the reply through `sink`
    ///
    /// Failures are logged, never surfaced as an error turn; after
    /// exhaustion the user's message stays with no AI reply.
    pub async fn send(&mut self, content: &str, sink: &mut dyn RevealSink) -> SendOutcome {
        if content.trim().is_empty() || self.state != ChatState::Ready || self.session_id.is_none()
        {
            return SendOutcome::Rejected;
        }
        let session_id = match self.session_id.clone() {
            Some(id) => id,
            None => return SendOutcome::Rejected,
        };

        let user = ChatMessage::new(Uuid::new_v4().to_string(), Sender::User, content);
        self.messages.push(user.clone());
        self.state = ChatState::Sending;

        if let Err(e) = self
            .store
            .insert(NewMessage {
                session_id: session_id.clone(),
                sender: Sender::User,
                content: user.content.clone(),
                timestamp: user.timestamp,
            })
            .await
        {
            eprintln!("{} Failed to persist user message: {}", "⚠️".yellow(), e);
        }

        // History includes the just-appended user message
        let history = history_from_messages(&self.messages);

        let mut attempts = 0;
        while attempts < MAX_RETRIES {
            attempts += 1;
            match self
                .client
                .send(content, &session_id, history.clone())
                .await
            {
                Ok(reply) => {
                    let outcome = self.stream_reply(&session_id, &reply.response, sink).await;
                    self.state = ChatState::Ready;
                    self.save_transcript();
                    return match outcome {
                        RevealOutcome::Completed => SendOutcome::Completed,
                        RevealOutcome::Cancelled => SendOutcome::Cancelled,
                    };
                }
                Err(e) => {
                    eprintln!(
                        "{} Backend call failed (attempt {}/{}): {}",
                        "⚠️".yellow(),
                        attempts,
                        MAX_RETRIES,
                        e
                    );
                }
            }
        }

        self.state = ChatState::Ready;
        self.save_transcript();
        SendOutcome::Failed
    }

    /// Create the AI placeholder (memory and store) and reveal the response
    /// into it
    ///
    /// Only called for the attempt that succeeded, so a retried send can
    /// never create more than one placeholder.
    async fn stream_reply(
        &mut self,
        session_id: &str,
        response: &str,
        out: &mut dyn RevealSink,
    ) -> RevealOutcome {
        let placeholder = ChatMessage {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Ai,
            sender_name: None,
            content: String::new(),
            timestamp: Utc::now(),
        };
        let message_id = placeholder.id.clone();
        self.messages.push(placeholder);

        // Row id captured from the insert keys every streaming update
        let row_id = match self
            .store
            .insert(NewMessage {
                session_id: session_id.to_string(),
                sender: Sender::Ai,
                content: String::new(),
                timestamp: Utc::now(),
            })
            .await
        {
            Ok(row) => Some(row.id),
            Err(e) => {
                eprintln!("{} Failed to persist AI placeholder: {}", "⚠️".yellow(), e);
                None
            }
        };

        self.state = ChatState::Streaming;

        let delay = self.reveal_delay;
        let cancel = self.cancel.clone();
        let mut sink = ControllerSink {
            message_id,
            messages: &mut self.messages,
            store: self.store.clone(),
            row_id,
            out,
        };

        reveal(response, &mut sink, delay, &cancel).await
    }
}

/// Reveal sink that mirrors each prefix into the in-memory message list and
/// the remote store before forwarding it to the front-end sink
struct ControllerSink<'a> {
    message_id: String,
    messages: &'a mut Vec<ChatMessage>,
    store: Arc<dyn MessageStore>,
    row_id: Option<i64>,
    out: &'a mut dyn RevealSink,
}

#[async_trait]
impl RevealSink for ControllerSink<'_> {
    async fn apply_prefix(&mut self, prefix: &str) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == self.message_id) {
            message.content = prefix.to_string();
        }

        if let Some(row_id) = self.row_id {
            // Awaited before the next prefix is produced, so store updates
            // for this row can never arrive out of order
            if let Err(e) = self.store.update_content(row_id, prefix).await {
                eprintln!("{} Streaming store update failed: {}", "⚠️".yellow(), e);
            }
        }

        self.out.apply_prefix(prefix).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::NullSink;
    use pretty_assertions::assert_eq;
    use webchat_api::BackendConfig;
    use webchat_store::{MemoryLocalStore, MemoryMessageStore};

    fn controller() -> ChatController {
        let session = SessionManager::new(Arc::new(MemoryLocalStore::new()));
        let store = Arc::new(MemoryMessageStore::new());
        // Guard tests never reach the network
        let client = AgentClient::new(BackendConfig::new("http://127.0.0.1:1"));
        ChatController::new(session, store, client).with_reveal_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn send_before_initialize_is_rejected() {
        let mut controller = controller();
        let outcome = controller.send("hello", &mut NullSink).await;
        assert_eq!(outcome, SendOutcome::Rejected);
        assert!(controller.messages().is_empty());
    }

    #[tokio::test]
    async fn empty_and_whitespace_sends_are_rejected() {
        let mut controller = controller();
        controller.initialize().await.unwrap();
        let before = controller.messages().len();

        assert_eq!(controller.send("", &mut NullSink).await, SendOutcome::Rejected);
        assert_eq!(
            controller.send("   \t\n", &mut NullSink).await,
            SendOutcome::Rejected
        );
        assert_eq!(controller.messages().len(), before);
    }

    #[tokio::test]
    async fn send_while_in_flight_is_a_no_op() {
        let mut controller = controller();
        controller.initialize().await.unwrap();
        controller.state = ChatState::Sending;

        let before = controller.messages().len();
        assert_eq!(
            controller.send("hello", &mut NullSink).await,
            SendOutcome::Rejected
        );
        assert_eq!(controller.messages().len(), before);
    }

    #[tokio::test]
    async fn initialize_moves_the_view_to_ready() {
        let mut controller = controller();
        assert_eq!(controller.state(), ChatState::Uninitialized);
        controller.initialize().await.unwrap();
        assert_eq!(controller.state(), ChatState::Ready);
        assert!(controller.session_id().is_some());
    }
}
