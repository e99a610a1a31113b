//! Build plus explanation. Uses Claude when ANTHROPIC_API_KEY is set and the
//! offline template otherwise.

use rigbuild::prelude::*;

#[tokio::main]
async fn main() -> Result<(), RigBuildError> {
    let mut config = RigConfig::default();
    config.apply_env();

    let recommender = Recommender::from_config(&config)?;
    let options = RecommendOptions {
        explain: true,
        explain_timeout: config.explainer.explain_deadline(),
    };
    let recommendation = recommender.recommend(1200.0, "design", &options).await?;

    let build = &recommendation.build;
    println!("Design build: ${:.2} of ${:.2}", build.total_price, build.budget);
    for (category, part) in build.iter() {
        println!("  {}: {}", category.label(), part.model_name);
    }

    match recommendation.explanation {
        Some(explanation) => println!("\n{} says:\n{}", explanation.provider, explanation.text),
        None => println!("\nNo explanation available."),
    }
    Ok(())
}
