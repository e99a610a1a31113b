use crate::explain::provider::ExplainContext;

/// One line per part: `- Graphics Card: NVIDIA GeForce RTX 4060 ($294.99)`.
pub fn format_build_details(context: &ExplainContext) -> String {
    context
        .parts
        .iter()
        .map(|p| format!("- {}: {} (${:.2})", p.category.label(), p.model_name, p.price))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_explanation_prompt(context: &ExplainContext) -> String {
    let socket_line = match context.socket {
        Some(ref socket) => format!("CPU and motherboard share the {} socket.", socket),
        None => "Socket information unavailable.".to_string(),
    };

    format!(
        r#"You are an expert PC hardware advisor.
A user has requested a PC build with the following specifications:
- Budget: ${:.2}
- Primary Use: {}

The following build was recommended (total ${:.2}, ${:.2} left over):
{}

{}

Please provide a brief, friendly, and encouraging explanation (around 100-150 words)
of why this is a good build for the user's needs. Highlight why the key components
(especially the CPU and GPU) are a great fit for the intended usage and budget.
Mention any smart trade-offs that were made to meet the budget."#,
        context.budget,
        context.usage.label(),
        context.total_price,
        context.remaining(),
        format_build_details(context),
        socket_line
    )
}
