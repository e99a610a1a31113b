use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::explain::prompts;
use crate::explain::provider::{ExplainContext, ExplainError, Explainer, ModelInfo};
use crate::explain::retry::with_retry;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 512;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct ClaudeExplainer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ClaudeExplainer {
    pub fn new(api_key: String) -> Self {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: CLAUDE_API_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Point at a different messages endpoint (proxies, tests).
    pub fn with_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    async fn send_request(&self, prompt: &str) -> Result<String, ExplainError> {
        if self.api_key.is_empty() {
            return Err(ExplainError::MissingApiKey);
        }

        let request_body = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        with_retry("Claude", || self.send_once(&request_body)).await
    }

    async fn send_once(&self, request_body: &ClaudeRequest) -> Result<String, ExplainError> {
        let resp = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", CLAUDE_API_VERSION)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            let claude_resp: ClaudeResponse = resp
                .json()
                .await
                .map_err(|e| ExplainError::ParseError(format!("Failed to parse JSON: {}", e)))?;

            return claude_resp
                .content
                .into_iter()
                .find_map(|c| c.text)
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .ok_or_else(|| {
                    ExplainError::InvalidResponse("Empty content array in response".to_string())
                });
        }

        if status.as_u16() == 429 {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ExplainError::RateLimited { retry_after });
        }

        let error_text = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ExplainError::ApiError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

#[async_trait]
impl Explainer for ClaudeExplainer {
    fn name(&self) -> &str {
        "claude"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn explain(&self, context: &ExplainContext) -> Result<String, ExplainError> {
        let prompt = prompts::build_explanation_prompt(context);
        tracing::debug!("Requesting explanation from Claude ({})", self.model);
        self.send_request(&prompt).await
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "claude".to_string(),
            model_name: self.model.clone(),
            is_local: false,
            context_window: 200_000,
        }
    }
}

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    text: Option<String>,
}
