use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cli::Cli;
use webchat_api::{AgentClient, BackendConfig};
use webchat_chat::{ChatController, ContactsConversation, RevealSink, SendOutcome};
use webchat_models::{ChatMessage, Sender};
use webchat_store::{
    FileLocalStore, MemoryMessageStore, MessageStore, RestMessageStore, SessionManager,
};

/// Reveal sink that types the reply into the terminal character by character
struct TerminalSink {
    printed: usize,
}

impl TerminalSink {
    fn new() -> Self {
        Self { printed: 0 }
    }
}

#[async_trait]
impl RevealSink for TerminalSink {
    async fn apply_prefix(&mut self, prefix: &str) {
        if self.printed == 0 {
            print!("{} ", "🤖".green());
        }
        let delta: String = prefix.chars().skip(self.printed).collect();
        print!("{}", delta);
        let _ = std::io::stdout().flush();
        self.printed = prefix.chars().count();
    }
}

fn render_message(message: &ChatMessage) {
    match message.sender {
        Sender::User => println!("{} {}", "🧑".cyan(), message.content),
        Sender::Ai => println!("{} {}", "🤖".green(), message.content),
        Sender::Contact => {
            let name = message.sender_name.as_deref().unwrap_or("contato");
            println!("{} {}", format!("👤 {}:", name).magenta(), message.content);
        }
    }
}

/// Run the AI assistant conversation
pub async fn run_ai_mode(cli: &Cli) -> Result<()> {
    println!("{}", "💬 WebChat - Assistente IA".bright_cyan().bold());

    // The view must not start without a session id; a missing local store is
    // the one fatal startup error
    let local = FileLocalStore::open_default()
        .context("Client-local storage unavailable; cannot establish a session")?;
    let session = SessionManager::new(Arc::new(local));

    let store: Arc<dyn MessageStore> = if cli.memory_store {
        Arc::new(MemoryMessageStore::new())
    } else {
        match RestMessageStore::from_env() {
            Some(rest) => Arc::new(rest),
            None => {
                println!(
                    "{}",
                    "STORE_URL not set; messages will not be persisted remotely".yellow()
                );
                Arc::new(MemoryMessageStore::new())
            }
        }
    };

    let config = match &cli.backend_url {
        Some(url) => BackendConfig::new(url),
        None => BackendConfig::from_env(),
    };
    println!(
        "{}",
        format!("Backend: {}", config.base_url()).bright_black()
    );
    let client = AgentClient::new(config).with_verbose(cli.verbose);

    let mut controller = ChatController::new(session, store, client);
    controller.initialize().await?;

    // Abort an in-flight reveal when the process is asked to stop
    let cancel = controller.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    for message in controller.messages() {
        render_message(message);
    }
    println!(
        "{}",
        "Digite sua pergunta, ou 'exit' para sair\n".bright_black()
    );

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("💬 > ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line == "exit" || line == "quit" {
                    break;
                }
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(&line)?;

                let mut sink = TerminalSink::new();
                match controller.send(&line, &mut sink).await {
                    SendOutcome::Completed => println!(),
                    SendOutcome::Cancelled => {
                        println!();
                        break;
                    }
                    // Failures are logged by the controller; the user's
                    // message stays with no assistant turn
                    SendOutcome::Failed | SendOutcome::Rejected => {}
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Até logo! 👋".bright_cyan());
    Ok(())
}

/// Run the mock contacts conversation
pub async fn run_contacts_mode() -> Result<()> {
    println!("{}", "💬 WebChat - Conversas".bright_cyan().bold());

    let mut conversation = ContactsConversation::new();

    println!("{}", "Contatos:".bright_yellow());
    for (index, contact) in conversation.contacts().iter().enumerate() {
        let unread = if contact.unread_count > 0 {
            format!(" ({} não lidas)", contact.unread_count)
        } else {
            String::new()
        };
        println!(
            "  [{}] {} - {}{}",
            index,
            contact.name.bold(),
            contact.last_message.bright_black(),
            unread.yellow()
        );
    }
    println!(
        "{}",
        "\n'/contato N' troca de conversa, 'exit' sai\n".bright_black()
    );

    for message in conversation.messages() {
        render_message(message);
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        let prompt = format!("{} > ", conversation.active_contact().name);
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line == "exit" || line == "quit" {
                    break;
                }
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(&line)?;

                if let Some(index) = line.strip_prefix("/contato ") {
                    if let Ok(index) = index.trim().parse::<usize>() {
                        conversation.select_contact(index);
                        println!(
                            "{}",
                            format!("Conversando com {}", conversation.active_contact().name)
                                .bright_black()
                        );
                    }
                    continue;
                }

                if let Some(reply) = conversation.send(&line).await {
                    render_message(reply);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Até logo! 👋".bright_cyan());
    Ok(())
}
