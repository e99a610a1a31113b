//! Offline explainer that needs no network.

use async_trait::async_trait;

use crate::catalog::Category;
use crate::explain::provider::{ExplainContext, ExplainError, Explainer, ModelInfo};
use crate::profiles::Usage;

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn new() -> Self {
        Self
    }

    fn focus(usage: Usage) -> (Category, &'static str) {
        match usage {
            Usage::Gaming => (
                Category::Gpu,
                "the graphics card, which sets frame rates in most games",
            ),
            Usage::Design => (
                Category::Cpu,
                "the processor, which keeps complex scenes and large canvases responsive",
            ),
            Usage::VideoEditing => (
                Category::Cpu,
                "the processor, which drives encoding and timeline scrubbing",
            ),
            Usage::Office => (
                Category::Cpu,
                "a responsive processor for everyday multitasking",
            ),
        }
    }

    /// Render the explanation text without any I/O.
    pub fn render(&self, context: &ExplainContext) -> String {
        let (focus_category, focus_reason) = Self::focus(context.usage);

        let mut text = format!(
            "This {} build comes to ${:.2} of your ${:.2} budget",
            context.usage.label().to_lowercase(),
            context.total_price,
            context.budget
        );
        let remaining = context.remaining();
        if remaining >= 0.005 {
            text.push_str(&format!(", leaving ${:.2} to spare.", remaining));
        } else {
            text.push('.');
        }

        if let Some(part) = context.part(focus_category) {
            text.push_str(&format!(
                " The largest share goes to {}: the {} (${:.2}).",
                focus_reason, part.model_name, part.price
            ));
        }

        if let Some(ref socket) = context.socket {
            text.push_str(&format!(
                " The CPU and motherboard share the {} socket, so they work together out of the box.",
                socket
            ));
        }

        if let Some(gpu) = context.part(Category::Gpu) {
            if focus_category != Category::Gpu {
                text.push_str(&format!(" Graphics are handled by the {}.", gpu.model_name));
            }
        }

        text.push_str(" Each part was picked for the most performance per dollar within its share of the budget.");
        text
    }
}

#[async_trait]
impl Explainer for TemplateExplainer {
    fn name(&self) -> &str {
        "template"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn explain(&self, context: &ExplainContext) -> Result<String, ExplainError> {
        Ok(self.render(context))
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "template".to_string(),
            model_name: "builtin".to_string(),
            is_local: true,
            context_window: 0,
        }
    }
}
