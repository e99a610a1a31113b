//! Recommendation facade shared by the CLI and library callers.
//! Loads the catalog once and answers any number of requests.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::build::BuildResult;
use crate::catalog::{Catalog, CatalogError};
use crate::config::{ConfigError, RigConfig};
use crate::explain::{
    attempt_deadline, ExplainContext, ExplainError, ExplainerRouter, Explanation, ProviderKind,
};
use crate::selector::{SelectionError, Selector};

#[derive(Debug, thiserror::Error)]
pub enum RigBuildError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Explain(#[from] ExplainError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for a single recommendation.
#[derive(Clone, Debug)]
pub struct RecommendOptions {
    pub explain: bool,
    /// Time each explanation provider gets, its retry included. When it
    /// runs out the router moves on and ends at the offline template.
    pub explain_timeout: Duration,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            explain: false,
            explain_timeout: attempt_deadline(Duration::from_secs(
                crate::explain::claude::DEFAULT_TIMEOUT_SECS,
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub build: BuildResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

#[derive(Debug)]
pub struct Recommender {
    selector: Selector,
    explainer: ExplainerRouter,
}

impl Recommender {
    pub fn new(selector: Selector, explainer: ExplainerRouter) -> Self {
        Self {
            selector,
            explainer,
        }
    }

    /// Build everything a config describes: catalog, profiles, selector
    /// settings and explanation providers.
    pub fn from_config(config: &RigConfig) -> Result<Self, RigBuildError> {
        config.validate()?;

        let catalog = match config.catalog {
            Some(ref path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };
        let selector = Selector::with_config(
            Arc::new(catalog),
            config.profile_table(),
            config.selector.clone(),
        )?;

        Ok(Self::new(selector, router_from_config(config)))
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn explainer(&self) -> &ExplainerRouter {
        &self.explainer
    }

    pub fn explainer_mut(&mut self) -> &mut ExplainerRouter {
        &mut self.explainer
    }

    /// Select a build and, when asked, explain it.
    ///
    /// Explanation problems never fail the call: they are logged and the
    /// build is returned on its own.
    pub async fn recommend(
        &self,
        budget: f64,
        usage: &str,
        options: &RecommendOptions,
    ) -> Result<Recommendation, RigBuildError> {
        let build = self.selector.build(budget, usage)?;

        let explanation = if options.explain {
            self.explain(&build, options.explain_timeout).await
        } else {
            None
        };

        Ok(Recommendation { build, explanation })
    }

    async fn explain(&self, build: &BuildResult, deadline: Duration) -> Option<Explanation> {
        let context = ExplainContext::from(build);
        match self.explainer.explain_within(&context, deadline).await {
            Ok(explanation) => Some(explanation),
            Err(e) => {
                tracing::warn!("Explanation failed: {}", e);
                None
            }
        }
    }
}

/// Router with the providers a config and the environment make available.
pub fn router_from_config(config: &RigConfig) -> ExplainerRouter {
    let timeout = config.explainer.request_timeout();
    let mut router = ExplainerRouter::new();
    router.set_preferred(config.explainer.provider);

    if let Some(key) = RigConfig::claude_api_key() {
        router.set_claude_api_key(key, config.explainer.claude_model.clone(), timeout);
    }

    let wants_ollama = config.explainer.provider == ProviderKind::Ollama
        || config.explainer.ollama_url.is_some()
        || config.explainer.ollama_model.is_some();
    if wants_ollama {
        router.set_ollama_config(
            config.explainer.ollama_url.clone(),
            config.explainer.ollama_model.clone(),
            timeout,
        );
    }

    router
}
