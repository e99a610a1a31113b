//! Natural-language explanations of a finished build.
//!
//! Selection never depends on this module. A recommendation is complete
//! without an explanation, and the router always ends at the offline
//! template so an explanation is available without network access.

pub mod claude;
pub mod ollama;
pub mod prompts;
pub mod provider;
mod retry;
pub mod router;
pub mod template;

pub use claude::ClaudeExplainer;
pub use ollama::OllamaExplainer;
pub use provider::{ExplainContext, ExplainError, Explainer, Explanation, ModelInfo, PartLine};
pub use retry::attempt_deadline;
pub use router::{ExplainerRouter, ProviderKind};
pub use template::TemplateExplainer;
