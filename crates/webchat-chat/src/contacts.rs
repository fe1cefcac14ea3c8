use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use uuid::Uuid;

use webchat_models::{ChatMessage, Contact, ContactStatus, Sender};

/// Fixed delay before the canned reply arrives
pub const CONTACT_REPLY_DELAY: Duration = Duration::from_millis(1500);

/// The one reply the mock mode ever produces
pub const CONTACT_REPLY: &str = "Entendi! Vou processar sua solicitação e retornar com uma \
resposta detalhada em instantes.";

/// Mock multi-contact conversation: static contact list, locally simulated
/// replies, no persistence and no backend
pub struct ContactsConversation {
    contacts: Vec<Contact>,
    active: usize,
    messages: Vec<ChatMessage>,
    reply_delay: Duration,
}

impl Default for ContactsConversation {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactsConversation {
    pub fn new() -> Self {
        Self {
            contacts: seed_contacts(),
            active: 0,
            messages: seed_messages(),
            reply_delay: CONTACT_REPLY_DELAY,
        }
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn active_contact(&self) -> &Contact {
        &self.contacts[self.active]
    }

    /// Switch the active contact; out-of-range indexes are ignored
    pub fn select_contact(&mut self, index: usize) {
        if index < self.contacts.len() {
            self.active = index;
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append the user's message and, after the fixed delay, the canned reply
    ///
    /// Returns the reply, or `None` when the content was empty.
    pub async fn send(&mut self, content: &str) -> Option<&ChatMessage> {
        if content.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::new(
            Uuid::new_v4().to_string(),
            Sender::User,
            content,
        ));

        tokio::time::sleep(self.reply_delay).await;

        self.messages.push(ChatMessage::new(
            Uuid::new_v4().to_string(),
            Sender::Ai,
            CONTACT_REPLY,
        ));
        self.messages.last()
    }
}

fn seed_contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: "1".to_string(),
            name: "Maria Silva".to_string(),
            avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Maria".to_string(),
            status: ContactStatus::Online,
            last_message: "Obrigada pela ajuda!".to_string(),
            unread_count: 2,
            timestamp: "10:30".to_string(),
        },
        Contact {
            id: "2".to_string(),
            name: "João Santos".to_string(),
            avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Joao".to_string(),
            status: ContactStatus::Online,
            last_message: "Quando podemos conversar?".to_string(),
            unread_count: 0,
            timestamp: "09:15".to_string(),
        },
    ]
}

fn seed_messages() -> Vec<ChatMessage> {
    let now = Utc::now();
    vec![
        ChatMessage {
            id: "1".to_string(),
            sender: Sender::Contact,
            sender_name: Some("Maria Silva".to_string()),
            content: "Oi! Tudo bem? Preciso de ajuda com um projeto".to_string(),
            timestamp: now - ChronoDuration::milliseconds(7_200_000),
        },
        ChatMessage {
            id: "2".to_string(),
            sender: Sender::User,
            sender_name: None,
            content: "Olá Maria! Claro, estou aqui para ajudar. Pode me contar mais sobre o \
projeto?"
                .to_string(),
            timestamp: now - ChronoDuration::milliseconds(7_000_000),
        },
    ]
}
