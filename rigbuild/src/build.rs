//! Build requests and results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Part};
use crate::profiles::Usage;

/// A budget and the name of a usage profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub budget: f64,
    pub usage: String,
}

impl BuildRequest {
    pub fn new(budget: f64, usage: impl Into<String>) -> Self {
        Self {
            budget,
            usage: usage.into(),
        }
    }
}

/// Budget share for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// `budget * weight`
    pub target: f64,
    /// Highest price admitted as a first choice.
    pub ceiling: f64,
}

/// A complete, socket-compatible build within budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildResult {
    pub usage: Usage,
    pub budget: f64,
    /// One part per category, in category order.
    pub parts: BTreeMap<Category, Part>,
    pub total_price: f64,
    pub total_performance: f64,
    pub allocations: BTreeMap<Category, Allocation>,
    /// Next-ranked options per category, compatible with the chosen platform.
    #[serde(default)]
    pub alternatives: BTreeMap<Category, Vec<Part>>,
}

impl BuildResult {
    pub fn part(&self, category: Category) -> Option<&Part> {
        self.parts.get(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &Part)> {
        self.parts.iter()
    }

    pub fn remaining_budget(&self) -> f64 {
        self.budget - self.total_price
    }

    /// CPU and motherboard share a socket.
    pub fn is_compatible(&self) -> bool {
        match (self.part(Category::Cpu), self.part(Category::Motherboard)) {
            (Some(cpu), Some(board)) => cpu.socket_matches(board),
            _ => false,
        }
    }

    pub fn socket(&self) -> Option<&str> {
        self.part(Category::Cpu).and_then(|p| p.socket.as_deref())
    }
}
