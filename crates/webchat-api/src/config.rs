/// Default backend when nothing is configured (local development server)
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Legacy variable names still honored, in lookup order after `BACKEND_URL`
const LEGACY_URL_VARS: [&str; 2] = ["NEXT_PUBLIC_BACKEND_URL", "NEXT_PUBLIC_API_URL"];

/// Backend endpoint configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    base_url: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Resolve the backend base URL from the environment
    ///
    /// `BACKEND_URL` is the standardized name; the two legacy names from
    /// earlier deployments are accepted as fallbacks.
    pub fn from_env() -> Self {
        let url = std::env::var("BACKEND_URL")
            .ok()
            .or_else(|| {
                LEGACY_URL_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok())
            })
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Self::new(url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the chat endpoint
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}
