use anyhow::Result;
use clap::Parser;

mod cli;
mod repl;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.contacts {
        repl::run_contacts_mode().await
    } else {
        repl::run_ai_mode(&cli).await
    }
}
