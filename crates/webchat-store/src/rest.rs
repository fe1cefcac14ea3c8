use async_trait::async_trait;
use serde_json::json;

use crate::message_store::MessageStore;
use crate::{Result, StoreError};
use webchat_models::{NewMessage, StoredMessage};

/// HTTP message store speaking the PostgREST dialect of the hosted Postgres
/// API (`/rest/v1/messages` with `column=eq.value` filters)
pub struct RestMessageStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestMessageStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Build a store from `STORE_URL` / `STORE_API_KEY`, with the hosted
    /// provider's variable names accepted as fallbacks
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("STORE_URL")
            .or_else(|_| std::env::var("SUPABASE_URL"))
            .ok()?;
        let key = std::env::var("STORE_API_KEY")
            .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
            .unwrap_or_default();
        Some(Self::new(url, key))
    }

    fn messages_url(&self) -> String {
        format!("{}/rest/v1/messages", self.base_url)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", &self.api_key))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MessageStore for RestMessageStore {
    async fn list(&self, session_id: &str) -> Result<Vec<StoredMessage>> {
        let session_filter = format!("eq.{}", session_id);
        let response = self
            .request(reqwest::Method::GET, &self.messages_url())
            .query(&[
                ("select", "*"),
                ("session_id", session_filter.as_str()),
                ("order", "timestamp.asc"),
            ])
            .send()
            .await?;

        let rows = Self::check(response).await?.json().await?;
        Ok(rows)
    }

    async fn insert(&self, message: NewMessage) -> Result<StoredMessage> {
        let response = self
            .request(reqwest::Method::POST, &self.messages_url())
            .header("Prefer", "return=representation")
            .json(&json!([message]))
            .send()
            .await?;

        let mut rows: Vec<StoredMessage> = Self::check(response).await?.json().await?;
        rows.pop().ok_or(StoreError::EmptyInsert)
    }

    async fn update_content(&self, row_id: i64, content: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::PATCH, &self.messages_url())
            .query(&[("id", format!("eq.{}", row_id))])
            .json(&json!({ "content": content }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, &self.messages_url())
            .query(&[("session_id", format!("eq.{}", session_id))])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
