//! Explainer Trait
//!
//! Defines a common interface for explanation providers (Claude, Ollama,
//! offline template).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build::BuildResult;
use crate::catalog::Category;
use crate::profiles::Usage;

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Rate limited. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Missing API key or no provider available")]
    MissingApiKey,
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    #[error("Explanation timed out after {0:?}")]
    Timeout(Duration),
}

impl ExplainError {
    /// Failures worth one more attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            ExplainError::RequestFailed(e) => e.is_timeout() || e.is_connect(),
            ExplainError::ApiError { status, .. } => *status >= 500,
            ExplainError::RateLimited { .. } | ExplainError::Timeout(_) => true,
            _ => false,
        }
    }
}

/// One selected part as shown to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartLine {
    pub category: Category,
    pub model_name: String,
    pub price: f64,
}

/// What a provider needs to know about a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainContext {
    pub budget: f64,
    pub usage: Usage,
    pub parts: Vec<PartLine>,
    pub total_price: f64,
    pub socket: Option<String>,
}

impl ExplainContext {
    pub fn remaining(&self) -> f64 {
        self.budget - self.total_price
    }

    pub fn part(&self, category: Category) -> Option<&PartLine> {
        self.parts.iter().find(|p| p.category == category)
    }
}

impl From<&BuildResult> for ExplainContext {
    fn from(build: &BuildResult) -> Self {
        Self {
            budget: build.budget,
            usage: build.usage,
            parts: build
                .iter()
                .map(|(category, part)| PartLine {
                    category: *category,
                    model_name: part.model_name.clone(),
                    price: part.price,
                })
                .collect(),
            total_price: build.total_price,
            socket: build.socket().map(str::to_string),
        }
    }
}

/// Information about the model behind a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider name (e.g., "claude", "ollama")
    pub provider: String,
    pub model_name: String,
    pub is_local: bool,
    /// Context window size in tokens
    pub context_window: usize,
}

/// Explanation text and where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// Common trait for all explanation providers
#[async_trait]
pub trait Explainer: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check if the provider is available/configured
    async fn is_available(&self) -> bool;

    /// Describe why the build suits the request
    async fn explain(&self, context: &ExplainContext) -> Result<String, ExplainError>;

    fn model_info(&self) -> ModelInfo;
}
