use crate::config::BackendConfig;
use crate::ApiError;
use webchat_logging::{log_request, log_request_to_file, log_response};
use webchat_models::{AgentRequest, AgentResponse, HistoryItem};

/// HTTP client for the agent backend's `/chat` endpoint
pub struct AgentClient {
    client: reqwest::Client,
    config: BackendConfig,
    verbose: bool,
}

impl AgentClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Send the prompt plus conversation history, returning the complete
    /// response text
    ///
    /// Single request/response; a non-2xx status is a hard failure and the
    /// caller decides whether to retry.
    pub async fn send(
        &self,
        prompt: &str,
        session_id: &str,
        history: Vec<HistoryItem>,
    ) -> Result<AgentResponse, ApiError> {
        let url = self.config.chat_url();
        let request = AgentRequest {
            prompt: prompt.to_string(),
            session_id: session_id.to_string(),
            history,
        };

        log_request(&url, &request, self.verbose);
        // Best effort; a missing log directory must not fail the call
        let _ = log_request_to_file(&url, &request);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            log_response(&status, &body, self.verbose);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        log_response(&status, &body, self.verbose);

        let parsed: AgentResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Status {
                status: status.as_u16(),
                body: format!("invalid response body: {} ({})", e, body),
            })?;

        Ok(parsed)
    }
}
