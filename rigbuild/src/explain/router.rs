//! Explainer Router
//!
//! Routes between explanation providers, falling back to the offline
//! template when no remote provider answers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::explain::claude::ClaudeExplainer;
use crate::explain::ollama::OllamaExplainer;
use crate::explain::provider::{ExplainContext, ExplainError, Explainer, Explanation, ModelInfo};
use crate::explain::template::TemplateExplainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Claude,
    Ollama,
    Template,
}

impl ProviderKind {
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::Claude => "claude",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Template => "template",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(ProviderKind::Claude),
            "ollama" | "local" => Ok(ProviderKind::Ollama),
            "template" | "offline" | "none" => Ok(ProviderKind::Template),
            other => Err(format!("unknown explanation provider '{}'", other)),
        }
    }
}

/// Router that manages the explanation providers
pub struct ExplainerRouter {
    claude: Option<Arc<dyn Explainer>>,
    ollama: Option<Arc<dyn Explainer>>,
    template: Arc<dyn Explainer>,
    preferred: ProviderKind,
}

impl Default for ExplainerRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExplainerRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplainerRouter")
            .field("claude", &self.claude.is_some())
            .field("ollama", &self.ollama.is_some())
            .field("preferred", &self.preferred)
            .finish()
    }
}

impl ExplainerRouter {
    /// Template only, until remote providers are configured.
    pub fn new() -> Self {
        Self {
            claude: None,
            ollama: None,
            template: Arc::new(TemplateExplainer::new()),
            preferred: ProviderKind::default(),
        }
    }

    /// Configure Claude with an API key. An empty key removes it.
    pub fn set_claude_api_key(&mut self, key: String, model: Option<String>, timeout: Duration) {
        if key.is_empty() {
            self.claude = None;
            return;
        }
        let mut client = ClaudeExplainer::with_timeout(key, timeout);
        if let Some(model) = model {
            client = client.with_model(model);
        }
        self.claude = Some(Arc::new(client));
    }

    pub fn set_ollama_config(&mut self, url: Option<String>, model: Option<String>, timeout: Duration) {
        self.ollama = Some(Arc::new(OllamaExplainer::with_timeout(url, model, timeout)));
    }

    pub fn has_provider(&self, kind: ProviderKind) -> bool {
        match kind {
            ProviderKind::Claude => self.claude.is_some(),
            ProviderKind::Ollama => self.ollama.is_some(),
            ProviderKind::Template => true,
        }
    }

    /// Install an arbitrary provider in a slot. Mostly for tests.
    pub fn set_provider(&mut self, kind: ProviderKind, provider: Arc<dyn Explainer>) {
        match kind {
            ProviderKind::Claude => self.claude = Some(provider),
            ProviderKind::Ollama => self.ollama = Some(provider),
            ProviderKind::Template => self.template = provider,
        }
    }

    pub fn set_preferred(&mut self, preferred: ProviderKind) {
        self.preferred = preferred;
    }

    pub fn preferred(&self) -> ProviderKind {
        self.preferred
    }

    /// Providers to try, in order: preferred, the other remote, template.
    fn candidates(&self) -> Vec<Arc<dyn Explainer>> {
        let remote = match self.preferred {
            ProviderKind::Claude => vec![&self.claude, &self.ollama],
            ProviderKind::Ollama => vec![&self.ollama, &self.claude],
            ProviderKind::Template => vec![],
        };

        remote
            .into_iter()
            .flatten()
            .cloned()
            .chain(std::iter::once(self.template.clone()))
            .collect()
    }

    /// Model info for the first available provider.
    pub async fn active_model(&self) -> Option<ModelInfo> {
        for provider in self.candidates() {
            if provider.is_available().await {
                return Some(provider.model_info());
            }
        }
        None
    }

    /// Explain a build with the first provider that succeeds.
    pub async fn explain(&self, context: &ExplainContext) -> Result<Explanation, ExplainError> {
        self.route(context, None).await
    }

    /// Like [`explain`](Self::explain), but each provider gets at most
    /// `deadline` before the router moves on to the next one.
    pub async fn explain_within(
        &self,
        context: &ExplainContext,
        deadline: Duration,
    ) -> Result<Explanation, ExplainError> {
        self.route(context, Some(deadline)).await
    }

    async fn route(
        &self,
        context: &ExplainContext,
        deadline: Option<Duration>,
    ) -> Result<Explanation, ExplainError> {
        let mut last_error = None;

        for provider in self.candidates() {
            if !provider.is_available().await {
                tracing::debug!("Explanation provider {} unavailable", provider.name());
                continue;
            }

            tracing::info!("Using explanation provider: {}", provider.name());
            let outcome = match deadline {
                Some(deadline) => tokio::time::timeout(deadline, provider.explain(context))
                    .await
                    .unwrap_or(Err(ExplainError::Timeout(deadline))),
                None => provider.explain(context).await,
            };
            match outcome {
                Ok(text) => {
                    return Ok(Explanation {
                        text,
                        provider: provider.name().to_string(),
                        model: provider.model_info().model_name,
                        generated_at: Utc::now(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Provider {} failed: {}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ExplainError::MissingApiKey))
    }
}
