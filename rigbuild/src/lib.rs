//! rigbuild - budget PC build recommendations
//!
//! Picks one CPU, motherboard, RAM kit, storage drive, graphics card, power
//! supply and case from a parts catalog so that the build fits a budget, the
//! CPU and motherboard share a socket, and the money goes where the intended
//! usage needs it.
//!
//! # Quick Start
//!
//! ```no_run
//! use rigbuild::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::builtin().unwrap());
//! let selector = Selector::new(catalog).unwrap();
//! let build = selector.build(1200.0, "gaming").unwrap();
//!
//! for (category, part) in build.iter() {
//!     println!("{}: {}", category.label(), part);
//! }
//! println!("Total: ${:.2}", build.total_price);
//! ```
//!
//! # Features
//!
//! - **Catalogs**: JSON files or directories, SQLite databases (`sqlite`
//!   feature), or the embedded default catalog
//! - **Profiles**: gaming, design, video editing and office budget splits
//! - **Selection**: deterministic, socket-aware, budget-bounded
//! - **Optional explanations**: Claude/Ollama with an offline template fallback

pub mod build;
pub mod catalog;
pub mod config;
pub mod core;
pub mod explain;
pub mod profiles;
pub mod selector;

// Re-export main types
pub use crate::core::{Recommendation, RecommendOptions, Recommender, RigBuildError};
pub use build::{Allocation, BuildRequest, BuildResult};
pub use catalog::{Catalog, CatalogError, Category, Part};
pub use config::{ConfigError, ExplainerConfig, RigConfig};
pub use explain::{ExplainError, Explanation, ExplainerRouter, ProviderKind};
pub use profiles::{ProfileTable, Usage, UsageProfile};
pub use selector::{ConstraintOrder, SelectionError, Selector, SelectorConfig};

/// Load a catalog from a file, directory or database (convenience wrapper).
pub fn load_catalog(path: &std::path::Path) -> Result<Catalog, RigBuildError> {
    Ok(Catalog::load(path)?)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BuildResult, Catalog, Category, Part, Recommendation, RecommendOptions, Recommender,
        RigBuildError, RigConfig, SelectionError, Selector, SelectorConfig, Usage,
    };
}
