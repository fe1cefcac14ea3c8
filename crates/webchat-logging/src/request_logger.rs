use anyhow::Result;
use colored::Colorize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{get_logs_dir, safe_truncate};
use webchat_models::AgentRequest;

/// Log HTTP request details for debugging (console output)
pub fn log_request(url: &str, request: &AgentRequest, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        println!("{}: {}", "URL".bright_yellow(), url);
        println!(
            "{}: {}",
            "Host".bright_yellow(),
            parsed_url.host_str().unwrap_or("unknown")
        );
        println!("{}: {}", "Scheme".bright_yellow(), parsed_url.scheme());
    } else {
        println!("{}: {}", "URL".bright_yellow(), url);
    }

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(&request) {
        Ok(json) => {
            // Truncate very long requests for readability
            if json.chars().count() > 5000 {
                println!("{}", safe_truncate(&json, 5000));
                println!(
                    "\n{}",
                    format!("... (truncated, total {} bytes)", json.len()).bright_black()
                );
            } else {
                println!("{}", json);
            }
        }
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log HTTP request to file for persistent debugging
pub fn log_request_to_file(url: &str, request: &AgentRequest) -> Result<()> {
    let logs_dir = get_logs_dir()?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let filename = format!("req-{}.txt", timestamp);
    let file_path = logs_dir.join(filename);

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("URL: {}\n", url));
    log_content.push_str(&format!("Session: {}\n\n", request.session_id));

    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(&request) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => {
            log_content.push_str(&format!("Error serializing request: {}\n", e));
        }
    }

    std::fs::write(&file_path, log_content)?;

    Ok(())
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: &reqwest::StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "─".repeat(80).bright_magenta());
    println!("{}", "HTTP RESPONSE DEBUG".bright_magenta().bold());
    println!("{}", "─".repeat(80).bright_magenta());
    println!("{}: {}", "Status".bright_yellow(), status);
    println!("\n{}", "Response Body:".bright_yellow());
    println!("{}", safe_truncate(body, 5000));
    println!("{}", "─".repeat(80).bright_magenta());
    println!();
}
