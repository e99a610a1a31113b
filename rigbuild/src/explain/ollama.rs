//! Ollama Client for Local Explanations
//!
//! Talks to a local Ollama server so explanations work offline.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::explain::prompts;
use crate::explain::provider::{ExplainContext, ExplainError, Explainer, ModelInfo};
use crate::explain::retry::with_retry;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1:8b";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const HEALTH_TIMEOUT_SECS: u64 = 2;

/// Client for interacting with Ollama
pub struct OllamaExplainer {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: i32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct OllamaModelList {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

impl OllamaExplainer {
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        Self::with_timeout(base_url, model, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: Option<String>, model: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if Ollama is running and the model is pulled
    pub async fn health_check(&self) -> Result<bool, ExplainError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) => response,
            // Ollama not running
            Err(_) => return Ok(false),
        };

        if !response.status().is_success() {
            return Ok(false);
        }

        let models: OllamaModelList = response
            .json()
            .await
            .map_err(|e| ExplainError::ParseError(e.to_string()))?;
        Ok(models
            .models
            .iter()
            .any(|m| m.name.starts_with(&self.model) || self.model.starts_with(&m.name)))
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ExplainError> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: 0.7,
                num_predict: 400,
                top_p: 0.9,
            },
        };

        tracing::debug!("Sending request to Ollama: {}", self.model);
        with_retry("Ollama", || self.generate_once(&request)).await
    }

    async fn generate_once(&self, request: &OllamaRequest) -> Result<String, ExplainError> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ExplainError::ApiError { status, message });
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| ExplainError::ParseError(e.to_string()))?;

        let text = ollama_response.response.trim();
        if text.is_empty() {
            return Err(ExplainError::InvalidResponse("Empty response".to_string()));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl Explainer for OllamaExplainer {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    async fn explain(&self, context: &ExplainContext) -> Result<String, ExplainError> {
        let prompt = prompts::build_explanation_prompt(context);
        self.generate(&prompt).await
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "ollama".to_string(),
            model_name: self.model.clone(),
            is_local: true,
            context_window: 8192,
        }
    }
}
