// Logging module - console and file request logging
pub mod request_logger;

use anyhow::{Context, Result};
use std::path::PathBuf;

// Re-export request logging functions
pub use request_logger::{log_request, log_request_to_file, log_response};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = if max_chars >= 3 { max_chars - 3 } else { 0 };
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Get or create the base webchat directory (~/.webchat)
/// This is shared between logging and the local key-value store
pub fn get_webchat_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let webchat_dir = PathBuf::from(home_dir).join(".webchat");

    if !webchat_dir.exists() {
        std::fs::create_dir_all(&webchat_dir).context("Failed to create webchat directory")?;
    }

    Ok(webchat_dir)
}

/// Get or create the logs directory (~/.webchat/logs)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_webchat_dir()?.join("logs");

    if !logs_dir.exists() {
        std::fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;
    }

    Ok(logs_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_truncate_keeps_short_strings_intact() {
        assert_eq!(safe_truncate("hello", 10), "hello");
    }

    #[test]
    fn safe_truncate_respects_char_boundaries() {
        // Multibyte characters must not be split mid-byte
        let s = "olá, tudo bem por aí?";
        let truncated = safe_truncate(s, 6);
        assert_eq!(truncated, "olá...");
    }

    #[test]
    fn safe_truncate_handles_tiny_limits() {
        assert_eq!(safe_truncate("hello", 2), "...");
    }
}
