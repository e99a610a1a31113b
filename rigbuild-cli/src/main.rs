//! rigbuild CLI - budget PC build recommendations from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use rigbuild::{
    Catalog, Category, ProfileTable, ProviderKind, Recommendation, RecommendOptions, Recommender,
    RigBuildError, RigConfig, Usage,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rigbuild")]
#[command(about = "Budget-constrained PC build recommendations", long_about = None)]
#[command(version)]
struct Cli {
    /// Log progress (info level)
    #[arg(long)]
    verbose: bool,

    /// Log selection details (debug level)
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a build for a budget and usage
    Build {
        /// Total budget in dollars
        #[arg(short, long)]
        budget: f64,

        /// gaming, design, video_editing or office
        #[arg(short, long, default_value = "gaming")]
        usage: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Add a plain-language explanation of the build
        #[arg(long)]
        explain: bool,

        /// Preferred explanation provider (claude, ollama, template)
        #[arg(long)]
        provider: Option<ProviderKind>,

        /// Catalog file, directory or database (embedded catalog if omitted)
        #[arg(long, value_name = "PATH")]
        catalog: Option<PathBuf>,

        /// JSON config file
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// List the best parts in a category
    Parts {
        /// cpu, motherboard, ram, storage, gpu, psu or case
        #[arg(value_name = "CATEGORY")]
        category: Category,

        /// Only parts at or below this price
        #[arg(long)]
        max_price: Option<f64>,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        #[arg(long, value_name = "PATH")]
        catalog: Option<PathBuf>,
    },

    /// List usage profiles and their budget weights
    Profiles {
        /// Show downgrade priorities too
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize a catalog
    Catalog {
        #[arg(long, value_name = "PATH")]
        catalog: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let result = match cli.command {
        Commands::Build {
            budget,
            usage,
            format,
            explain,
            provider,
            catalog,
            config,
        } => {
            handle_build(
                budget,
                &usage,
                format,
                explain,
                provider,
                catalog,
                config.as_deref(),
            )
            .await
        }
        Commands::Parts {
            category,
            max_price,
            limit,
            format,
            catalog,
        } => handle_parts(category, max_price, limit, format, catalog.as_deref()),
        Commands::Profiles { verbose } => {
            handle_profiles(verbose);
            Ok(())
        }
        Commands::Catalog { catalog } => handle_catalog(catalog.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so JSON on stdout stays clean.
fn init_logging(verbose: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RigConfig, RigBuildError> {
    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            RigConfig::load(path)?
        }
        None => RigConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, RigBuildError> {
    Ok(match path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    })
}

async fn handle_build(
    budget: f64,
    usage: &str,
    format: OutputFormat,
    explain: bool,
    provider: Option<ProviderKind>,
    catalog: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<(), RigBuildError> {
    let mut config = load_config(config)?;
    if catalog.is_some() {
        config.catalog = catalog;
    }
    if let Some(provider) = provider {
        config.explainer.provider = provider;
    }

    let recommender = Recommender::from_config(&config)?;
    let options = RecommendOptions {
        explain,
        explain_timeout: config.explainer.explain_deadline(),
    };
    let recommendation = recommender.recommend(budget, usage, &options).await?;

    match format {
        OutputFormat::Human => output_human(&recommendation),
        OutputFormat::Json => print_json(&recommendation)?,
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), RigBuildError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| RigBuildError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    println!("{}", text);
    Ok(())
}

fn output_human(recommendation: &Recommendation) {
    let build = &recommendation.build;

    println!(
        "\n{} build for ${:.2}",
        build.usage.label(),
        build.budget
    );
    println!("{}", "─".repeat(72));

    for (category, part) in build.iter() {
        let socket = part
            .socket
            .as_deref()
            .map(|s| format!("  [{}]", s))
            .unwrap_or_default();
        println!(
            "  {:<14} {:<40} {:>10}{}",
            category.label(),
            part.model_name,
            format!("${:.2}", part.price),
            socket
        );
    }

    println!("{}", "─".repeat(72));
    println!("  {:<55} {:>10}", "Total", format!("${:.2}", build.total_price));
    println!(
        "  {:<55} {:>10}",
        "Remaining",
        format!("${:.2}", build.remaining_budget())
    );
    println!("  Performance score: {:.0}", build.total_performance);

    if let Some(ref explanation) = recommendation.explanation {
        println!("\n  Why this build ({}):", explanation.provider);
        for line in explanation.text.lines() {
            println!("    {}", line);
        }
    }
}

fn handle_parts(
    category: Category,
    max_price: Option<f64>,
    limit: usize,
    format: OutputFormat,
    catalog: Option<&Path>,
) -> Result<(), RigBuildError> {
    let catalog = load_catalog(catalog)?;
    let parts = catalog.top_parts(category, max_price, limit);

    match format {
        OutputFormat::Json => print_json(&parts)?,
        OutputFormat::Human => {
            println!("\n{} options:\n", category.label());
            if parts.is_empty() {
                println!("  No parts found");
            }
            for part in parts {
                println!("  - {}  (score {:.0})", part, part.performance_score);
            }
        }
    }
    Ok(())
}

fn handle_profiles(verbose: bool) {
    let table = ProfileTable::builtin();
    println!("Usage profiles:\n");

    for profile in table.iter() {
        println!("  {} ({})", profile.usage.id(), profile.usage.label());
        for category in Category::ALL {
            let weight = profile.weight(category);
            if verbose {
                println!(
                    "    {:<14} {:>4.0}%   priority {:.1}",
                    category.label(),
                    weight * 100.0,
                    profile.priority(category)
                );
            } else {
                println!("    {:<14} {:>4.0}%", category.label(), weight * 100.0);
            }
        }
        println!();
    }

    if verbose {
        let aliases: Vec<String> = Usage::ALL.iter().map(|u| u.id().to_string()).collect();
        println!("  Usage names: {} (also office_work, video-editing, editing)", aliases.join(", "));
    }
}

fn handle_catalog(catalog: Option<&Path>) -> Result<(), RigBuildError> {
    let catalog = load_catalog(catalog)?;

    println!("\nCatalog: {}", catalog.origin());
    println!("{}", "─".repeat(40));
    for category in Category::ALL {
        println!("  {:<14} {:>4}", category.label(), catalog.count(category));
    }
    println!("  {:<14} {:>4}", "Total", catalog.len());

    let sockets: Vec<&str> = catalog.sockets().into_iter().collect();
    println!("\n  Sockets: {}", sockets.join(", "));

    match catalog.cheapest_build_cost() {
        Some(cost) => println!("  Cheapest compatible build: ${:.2}", cost),
        None => println!("  No compatible CPU and motherboard pair"),
    }
    Ok(())
}
