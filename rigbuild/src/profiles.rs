//! Usage Profiles
//!
//! A usage profile splits the budget across categories and says which
//! categories matter most when the build has to be trimmed. The tables are
//! configuration data; [`ProfileTable::with_overrides`] replaces weights from
//! a config file.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Category;

/// What the machine is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    Gaming,
    Design,
    #[serde(alias = "video-editing")]
    VideoEditing,
    #[serde(alias = "office_work")]
    Office,
}

#[derive(Debug, Clone, Error)]
#[error("Unknown usage profile '{0}' (expected one of: gaming, design, video_editing, office)")]
pub struct UnknownUsage(pub String);

impl Usage {
    pub const ALL: [Usage; 4] = [Usage::Gaming, Usage::Design, Usage::VideoEditing, Usage::Office];

    pub fn id(&self) -> &'static str {
        match self {
            Usage::Gaming => "gaming",
            Usage::Design => "design",
            Usage::VideoEditing => "video_editing",
            Usage::Office => "office",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Usage::Gaming => "Gaming",
            Usage::Design => "Design",
            Usage::VideoEditing => "Video Editing",
            Usage::Office => "Office Work",
        }
    }

    fn index(&self) -> usize {
        match self {
            Usage::Gaming => 0,
            Usage::Design => 1,
            Usage::VideoEditing => 2,
            Usage::Office => 3,
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Usage {
    type Err = UnknownUsage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "gaming" => Ok(Usage::Gaming),
            "design" => Ok(Usage::Design),
            "video_editing" | "videoediting" | "editing" => Ok(Usage::VideoEditing),
            "office" | "office_work" => Ok(Usage::Office),
            _ => Err(UnknownUsage(s.to_string())),
        }
    }
}

/// Weights for one usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageProfile {
    pub usage: Usage,
    /// Share of the budget allotted to each category.
    pub weights: BTreeMap<Category, f64>,
    /// Relative importance when downgrading; 1.0 is neutral.
    pub priorities: BTreeMap<Category, f64>,
}

impl UsageProfile {
    fn from_rows(usage: Usage, weights: [f64; 7], priorities: [f64; 7]) -> Self {
        Self {
            usage,
            weights: Category::ALL.into_iter().zip(weights).collect(),
            priorities: Category::ALL.into_iter().zip(priorities).collect(),
        }
    }

    pub fn weight(&self, category: Category) -> f64 {
        self.weights.get(&category).copied().unwrap_or(0.0)
    }

    pub fn priority(&self, category: Category) -> f64 {
        self.priorities.get(&category).copied().unwrap_or(1.0)
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }
}

/// One profile per [`Usage`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    profiles: [UsageProfile; 4],
}

impl ProfileTable {
    /// Built-in weights. Column order follows [`Category::ALL`]:
    /// CPU, Motherboard, RAM, Storage, GPU, PSU, Case.
    pub fn builtin() -> Self {
        Self {
            profiles: [
                UsageProfile::from_rows(
                    Usage::Gaming,
                    [0.20, 0.08, 0.10, 0.10, 0.45, 0.05, 0.02],
                    [0.8, 1.0, 1.0, 1.0, 1.2, 1.0, 1.0],
                ),
                UsageProfile::from_rows(
                    Usage::Design,
                    [0.30, 0.08, 0.20, 0.10, 0.25, 0.05, 0.02],
                    [1.2, 1.0, 1.1, 1.0, 0.8, 1.0, 1.0],
                ),
                UsageProfile::from_rows(
                    Usage::VideoEditing,
                    [0.35, 0.05, 0.20, 0.10, 0.25, 0.03, 0.02],
                    [1.2, 1.0, 1.1, 1.0, 1.0, 1.0, 1.0],
                ),
                UsageProfile::from_rows(
                    Usage::Office,
                    [0.25, 0.15, 0.15, 0.20, 0.05, 0.10, 0.10],
                    [1.1, 1.0, 1.0, 1.2, 0.7, 1.0, 1.0],
                ),
            ],
        }
    }

    pub fn get(&self, usage: Usage) -> &UsageProfile {
        &self.profiles[usage.index()]
    }

    /// Resolve a usage name to its profile.
    pub fn resolve(&self, name: &str) -> Result<&UsageProfile, UnknownUsage> {
        let usage: Usage = name.parse()?;
        Ok(self.get(usage))
    }

    pub fn iter(&self) -> impl Iterator<Item = &UsageProfile> {
        self.profiles.iter()
    }

    /// Replace individual weights. Categories left out keep their built-in
    /// weight.
    pub fn with_overrides(mut self, overrides: &BTreeMap<Usage, BTreeMap<Category, f64>>) -> Self {
        for (usage, weights) in overrides {
            let profile = &mut self.profiles[usage.index()];
            for (category, weight) in weights {
                profile.weights.insert(*category, *weight);
            }
        }
        self
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::builtin()
    }
}
