//! Budget-constrained component selection.
//!
//! ```text
//! budget, usage
//!      │
//!      ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Allocation  │──▶│  Rank per    │──▶│  CPU / board │──▶│  Downgrade   │──▶ BuildResult
//! │  per weight  │   │  category    │   │  pairing     │   │  to budget   │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! [`Selector::build`] is deterministic: the same catalog and request always
//! give the same result.

pub mod candidates;
pub mod downgrade;
pub mod platform;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build::{Allocation, BuildRequest, BuildResult};
use crate::catalog::{Catalog, Category, Part};
use crate::profiles::{ProfileTable, UnknownUsage};
use candidates::CandidateList;
use downgrade::{total_price, Downgrader, Picks};
use platform::{Pair, PlatformWalk};

const CPU: usize = 0;
const BOARD: usize = 1;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SelectionError {
    #[error("Invalid budget {0}: must be a positive amount")]
    InvalidBudget(f64),
    #[error("{0}")]
    InvalidUsage(String),
    #[error("No compatible CPU and motherboard pair fits a budget of ${budget:.2}")]
    NoCompatibleBuild { budget: f64 },
    #[error("Budget ${budget:.2} is too low: the cheapest reachable build costs ${required:.2}")]
    BudgetExceeded { budget: f64, required: f64 },
    #[error("Catalog has no parts in category {0}")]
    EmptyCategory(Category),
}

impl From<UnknownUsage> for SelectionError {
    fn from(e: UnknownUsage) -> Self {
        SelectionError::InvalidUsage(e.to_string())
    }
}

/// Which constraint is repaired first when the provisional picks break both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintOrder {
    /// Pair CPU and motherboard, then trim to budget.
    #[default]
    CompatibilityFirst,
    /// Trim every category independently, then pair from the trimmed
    /// positions, then trim again.
    BudgetFirst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Multiplier on each category's target allocation giving its ceiling.
    pub tolerance: f64,
    pub constraint_order: ConstraintOrder,
    /// Alternatives reported per category.
    pub alternatives: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.2,
            constraint_order: ConstraintOrder::CompatibilityFirst,
            alternatives: 3,
        }
    }
}

/// Picks builds from a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct Selector {
    catalog: Arc<Catalog>,
    profiles: ProfileTable,
    config: SelectorConfig,
}

impl Selector {
    /// Selector with built-in profiles and default settings.
    ///
    /// Fails if any category is empty.
    pub fn new(catalog: Arc<Catalog>) -> Result<Self, SelectionError> {
        Self::with_config(catalog, ProfileTable::builtin(), SelectorConfig::default())
    }

    pub fn with_config(
        catalog: Arc<Catalog>,
        profiles: ProfileTable,
        config: SelectorConfig,
    ) -> Result<Self, SelectionError> {
        if let Some(category) = catalog.missing_category() {
            return Err(SelectionError::EmptyCategory(category));
        }
        Ok(Self {
            catalog,
            profiles,
            config,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Smallest budget for which some build exists.
    pub fn minimum_budget(&self) -> Option<f64> {
        self.catalog.cheapest_build_cost()
    }

    pub fn build_request(&self, request: &BuildRequest) -> Result<BuildResult, SelectionError> {
        self.build(request.budget, &request.usage)
    }

    /// Select one part per category for `budget` under the named usage.
    pub fn build(&self, budget: f64, usage: &str) -> Result<BuildResult, SelectionError> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(SelectionError::InvalidBudget(budget));
        }
        let profile = self.profiles.resolve(usage)?;

        let mut allocations = BTreeMap::new();
        let mut lists = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let parts = self.catalog.parts(category);
            if parts.is_empty() {
                return Err(SelectionError::EmptyCategory(category));
            }
            let target = budget * profile.weight(category);
            let ceiling = target * self.config.tolerance;
            allocations.insert(category, Allocation { target, ceiling });
            lists.push(CandidateList::new(category, parts, ceiling));
        }

        let walk = PlatformWalk::new(&lists[CPU], &lists[BOARD]);
        let first_pair = walk
            .first()
            .ok_or(SelectionError::NoCompatibleBuild { budget })?;
        match self.catalog.cheapest_platform_cost() {
            Some(cost) if cost <= budget => {}
            _ => return Err(SelectionError::NoCompatibleBuild { budget }),
        }
        if first_pair != (0, 0) {
            tracing::debug!(
                "Provisional CPU {} and motherboard {} differ in socket",
                lists[CPU].get(0).model_name,
                lists[BOARD].get(0).model_name
            );
        }

        let downgrader = Downgrader {
            lists: &lists,
            walk: &walk,
            profile,
        };
        let mut picks: Picks = [0; 7];

        match self.config.constraint_order {
            ConstraintOrder::CompatibilityFirst => {
                set_pair(&mut picks, first_pair);
                downgrader.run(&mut picks, budget, true);
            }
            ConstraintOrder::BudgetFirst => {
                downgrader.run(&mut picks, budget, false);
                let pair = walk
                    .pairs_from(picks[CPU], picks[BOARD])
                    .next()
                    .unwrap_or(first_pair);
                set_pair(&mut picks, pair);
                downgrader.run(&mut picks, budget, true);
                if total_price(&lists, &picks) > budget && pair != first_pair {
                    // restart the walk so the cheapest pair stays reachable
                    set_pair(&mut picks, first_pair);
                    downgrader.run(&mut picks, budget, true);
                }
            }
        }

        let total = total_price(&lists, &picks);
        if total > budget {
            return Err(SelectionError::BudgetExceeded {
                budget,
                required: total,
            });
        }

        let parts: BTreeMap<Category, Part> = Category::ALL
            .iter()
            .map(|c| (*c, lists[c.index()].get(picks[c.index()]).clone()))
            .collect();
        let total_performance = parts.values().map(|p| p.performance_score).sum();
        let alternatives = self.alternatives(&lists, &picks);

        tracing::debug!(
            "Selected {} build: ${:.2} of ${:.2}",
            profile.usage,
            total,
            budget
        );

        Ok(BuildResult {
            usage: profile.usage,
            budget,
            parts,
            total_price: total,
            total_performance,
            allocations,
            alternatives,
        })
    }

    fn alternatives(&self, lists: &[CandidateList<'_>], picks: &Picks) -> BTreeMap<Category, Vec<Part>> {
        let cpu = lists[CPU].get(picks[CPU]);
        let board = lists[BOARD].get(picks[BOARD]);

        Category::ALL
            .iter()
            .map(|category| {
                let list = &lists[category.index()];
                let options = list
                    .iter()
                    .filter(|(i, _)| *i != picks[category.index()])
                    .filter(|(_, p)| match category {
                        Category::Cpu => p.socket_matches(board),
                        Category::Motherboard => p.socket_matches(cpu),
                        _ => true,
                    })
                    .take(self.config.alternatives)
                    .map(|(_, p)| p.clone())
                    .collect();
                (*category, options)
            })
            .collect()
    }
}

fn set_pair(picks: &mut Picks, (cpu, board): Pair) {
    picks[CPU] = cpu;
    picks[BOARD] = board;
}
