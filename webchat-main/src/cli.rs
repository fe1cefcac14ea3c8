use clap::Parser;

/// CLI arguments for webchat
#[derive(Parser, Debug)]
#[command(name = "webchat")]
#[command(about = "Terminal chat client with a mock contacts mode and an AI assistant mode")]
#[command(version)]
pub struct Cli {
    /// Start in the mock contacts mode instead of the AI assistant
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub contacts: bool,

    /// Keep messages in memory instead of the remote store
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub memory_store: bool,

    /// Backend base URL (otherwise resolved from BACKEND_URL)
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Dump HTTP requests and responses
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}
