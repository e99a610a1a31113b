//! Runtime configuration.
//!
//! Everything is optional: an empty JSON object (or no file at all) gives
//! the embedded catalog, built-in profiles and the template explainer as the
//! last fallback.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Category;
use crate::explain::{attempt_deadline, ProviderKind};
use crate::profiles::{ProfileTable, Usage};
use crate::selector::SelectorConfig;

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";
pub const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("Failed to parse config {origin}: {error}")]
    Parse {
        origin: String,
        #[source]
        error: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    pub provider: ProviderKind,
    pub claude_model: Option<String>,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,
    /// Per-request timeout for remote providers.
    pub timeout_secs: u64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            claude_model: None,
            ollama_url: None,
            ollama_model: None,
            timeout_secs: 30,
        }
    }
}

impl ExplainerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// How long one provider may take before the router falls back,
    /// covering the request, its retry and the pause between them.
    pub fn explain_deadline(&self) -> Duration {
        attempt_deadline(self.request_timeout())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Catalog file, directory or database. Embedded catalog when unset.
    pub catalog: Option<PathBuf>,
    pub selector: SelectorConfig,
    /// Weight overrides per usage.
    pub profiles: BTreeMap<Usage, BTreeMap<Category, f64>>,
    pub explainer: ExplainerConfig,
}

impl RigConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            error,
        })?;
        Self::from_json_str(&text, &path.display().to_string())
    }

    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: RigConfig = serde_json::from_str(json).map_err(|error| ConfigError::Parse {
            origin: origin.to_string(),
            error,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.selector.tolerance;
        if !tolerance.is_finite() || tolerance < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "selector.tolerance must be at least 1.0, got {}",
                tolerance
            )));
        }

        for (usage, weights) in &self.profiles {
            for (category, weight) in weights {
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "profiles.{}.{} must be a non-negative number, got {}",
                        usage, category, weight
                    )));
                }
            }
        }

        for profile in self.profile_table().iter() {
            if profile.total_weight() <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "profile '{}' has no positive weights",
                    profile.usage
                )));
            }
        }

        if self.explainer.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "explainer.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Built-in profiles with this config's overrides applied.
    pub fn profile_table(&self) -> ProfileTable {
        ProfileTable::builtin().with_overrides(&self.profiles)
    }

    /// Apply `OLLAMA_HOST` and `OLLAMA_MODEL` when set.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup(OLLAMA_HOST_ENV).filter(|v| !v.trim().is_empty()) {
            let host = host.trim();
            self.explainer.ollama_url = Some(if host.starts_with("http://") || host.starts_with("https://") {
                host.to_string()
            } else {
                format!("http://{}", host)
            });
        }
        if let Some(model) = lookup(OLLAMA_MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.explainer.ollama_model = Some(model.trim().to_string());
        }
    }

    /// Anthropic API key from the environment, if any.
    pub fn claude_api_key() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::ConstraintOrder;

    #[test]
    fn test_empty_object_is_default() {
        let config = RigConfig::from_json_str("{}", "inline").unwrap();
        assert_eq!(config, RigConfig::default());
        assert_eq!(config.selector.tolerance, 1.2);
        assert_eq!(config.explainer.timeout_secs, 30);
        assert_eq!(config.explainer.explain_deadline(), Duration::from_millis(60_500));
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "catalog": "parts.db",
            "selector": { "tolerance": 1.5, "constraint_order": "budget_first" },
            "profiles": { "gaming": { "gpu": 0.5, "case": 0.0 } },
            "explainer": { "provider": "ollama", "ollama_model": "mistral" }
        }"#;
        let config = RigConfig::from_json_str(json, "inline").unwrap();
        assert_eq!(config.catalog, Some(PathBuf::from("parts.db")));
        assert_eq!(config.selector.constraint_order, ConstraintOrder::BudgetFirst);
        assert_eq!(config.selector.alternatives, 3);
        assert_eq!(config.explainer.provider, ProviderKind::Ollama);

        let table = config.profile_table();
        assert_eq!(table.get(Usage::Gaming).weight(Category::Gpu), 0.5);
        assert_eq!(table.get(Usage::Gaming).weight(Category::Case), 0.0);
    }

    #[test]
    fn test_low_tolerance_rejected() {
        let err = RigConfig::from_json_str(r#"{"selector": {"tolerance": 0.9}}"#, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = RigConfig::from_json_str(r#"{"profiles": {"office": {"cpu": -0.1}}}"#, "inline").unwrap_err();
        assert!(err.to_string().contains("profiles.office.cpu"));
    }

    #[test]
    fn test_all_zero_profile_rejected() {
        let json = r#"{"profiles": {"design": {
            "cpu": 0, "motherboard": 0, "ram": 0, "storage": 0, "gpu": 0, "psu": 0, "case": 0
        }}}"#;
        let err = RigConfig::from_json_str(json, "inline").unwrap_err();
        assert!(err.to_string().contains("design"));
    }

    #[test]
    fn test_malformed_json() {
        let err = RigConfig::from_json_str("{ not json", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RigConfig::default();
        config.apply_env_from(|name| match name {
            OLLAMA_HOST_ENV => Some("gpu-box:11434".to_string()),
            OLLAMA_MODEL_ENV => Some("qwen2.5:7b".to_string()),
            _ => None,
        });
        assert_eq!(config.explainer.ollama_url.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.explainer.ollama_model.as_deref(), Some("qwen2.5:7b"));
    }

    #[test]
    fn test_missing_file() {
        let err = RigConfig::load(Path::new("/nonexistent/rigbuild.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
