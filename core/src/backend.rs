// HTTP client for the remote conversation backend
use crate::{Result, VoisError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Configuration for [`BackendClient`] loaded from environment variables
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String, // e.g., https://vois-nine.vercel.app
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("VOIS_BACKEND_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            request_timeout_ms: std::env::var("VOIS_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30_000),
        }
    }
}

/// The backend's HTTP JSON contract: one initialization prompt and one
/// message round-trip. No auth, no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Fetch the conversation-opening prompt
    async fn initialize(&self) -> Result<String>;

    /// Send one user message, returning the bot's reply text
    async fn send_message(&self, text: &str) -> Result<String>;
}

#[derive(Serialize)]
struct UserMessageRequest<'a> {
    user_message: &'a str,
}

#[derive(Deserialize)]
struct UserMessageResponse {
    bot_response: String,
}

#[derive(Deserialize)]
struct InitializeResponse {
    initial_question: String,
}

pub struct BackendClient {
    http: Client,
    cfg: BackendConfig,
}

impl BackendClient {
    pub fn new(cfg: BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| VoisError::BackendError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, cfg })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(BackendConfig::default())
    }

    fn endpoint(&self, path: &str) -> String {
        endpoint_url(&self.cfg.base_url, path)
    }
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}/", base_url.trim_end_matches('/'), path.trim_matches('/'))
}

#[async_trait]
impl ConversationBackend for BackendClient {
    async fn initialize(&self) -> Result<String> {
        let url = self.endpoint("initialize");
        debug!(target = "backend", "GET {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| VoisError::BackendError(format!("Initialize request failed: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(target = "backend", %status, body = %body, "Initialize returned error status");
            return Err(VoisError::BackendError(format!(
                "Initialize returned status {status}"
            )));
        }

        let body: InitializeResponse = resp
            .json()
            .await
            .map_err(|e| VoisError::BackendError(format!("Failed to parse initialize JSON: {e}")))?;
        Ok(body.initial_question)
    }

    async fn send_message(&self, text: &str) -> Result<String> {
        let url = self.endpoint("user_message");
        debug!(target = "backend", "POST {}", url);

        let resp = self
            .http
            .post(&url)
            .json(&UserMessageRequest { user_message: text })
            .send()
            .await
            .map_err(|e| VoisError::BackendError(format!("Message request failed: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(target = "backend", %status, body = %body, "Message returned error status");
            return Err(VoisError::BackendError(format!(
                "Message returned status {status}"
            )));
        }

        let body: UserMessageResponse = resp
            .json()
            .await
            .map_err(|e| VoisError::BackendError(format!("Failed to parse message JSON: {e}")))?;
        Ok(body.bot_response)
    }
}
