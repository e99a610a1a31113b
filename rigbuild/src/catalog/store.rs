//! In-memory parts catalog.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use thiserror::Error;

use crate::catalog::schema::{Category, Part};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("Failed to parse catalog JSON from {origin}: {error}")]
    Parse {
        origin: String,
        #[source]
        error: serde_json::Error,
    },
    #[error("{origin} row {row}: {reason}")]
    InvalidRow {
        origin: String,
        row: usize,
        reason: String,
    },
    #[error("Duplicate part '{model_name}' in category {category}")]
    Duplicate {
        category: Category,
        model_name: String,
    },
    #[error("Catalog has no parts in category {0}")]
    EmptyCategory(Category),
    #[error("Invalid catalog directory: {0}")]
    InvalidDirectory(String),
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Read-only table of parts, grouped by category.
///
/// Parts keep their load order inside a category; callers that need a
/// ranking sort a view of it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    parts: BTreeMap<Category, Vec<Part>>,
    origin: String,
}

impl Catalog {
    /// Build a catalog from validated parts, rejecting duplicate keys.
    pub(crate) fn from_validated(
        parts: Vec<Part>,
        origin: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let mut seen: HashSet<(Category, String)> = HashSet::new();
        let mut grouped: BTreeMap<Category, Vec<Part>> = BTreeMap::new();

        for part in parts {
            if !seen.insert((part.category, part.model_name.clone())) {
                return Err(CatalogError::Duplicate {
                    category: part.category,
                    model_name: part.model_name,
                });
            }
            grouped.entry(part.category).or_default().push(part);
        }

        let catalog = Self {
            parts: grouped,
            origin: origin.into(),
        };
        tracing::info!(
            "Loaded {} parts across {} categories from {}",
            catalog.len(),
            catalog.parts.len(),
            catalog.origin
        );
        Ok(catalog)
    }

    /// Where the catalog was loaded from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn parts(&self, category: Category) -> &[Part] {
        self.parts.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.values().flatten()
    }

    pub fn get(&self, category: Category, model_name: &str) -> Option<&Part> {
        self.parts(category)
            .iter()
            .find(|p| p.model_name == model_name)
    }

    pub fn len(&self) -> usize {
        self.parts.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, category: Category) -> usize {
        self.parts(category).len()
    }

    /// Categories with at least one part.
    pub fn categories_present(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.count(*c) > 0)
            .collect()
    }

    /// First category with no parts, if any.
    pub fn missing_category(&self) -> Option<Category> {
        Category::ALL.into_iter().find(|c| self.count(*c) == 0)
    }

    /// Fails on the first category with no parts.
    pub fn ensure_complete(&self) -> Result<(), CatalogError> {
        match self.missing_category() {
            Some(category) => Err(CatalogError::EmptyCategory(category)),
            None => Ok(()),
        }
    }

    /// All sockets carried by CPUs or motherboards.
    pub fn sockets(&self) -> BTreeSet<&str> {
        self.parts(Category::Cpu)
            .iter()
            .chain(self.parts(Category::Motherboard))
            .filter_map(|p| p.socket.as_deref())
            .collect()
    }

    /// Best-performing parts of a category, optionally capped by price.
    pub fn top_parts(&self, category: Category, max_price: Option<f64>, limit: usize) -> Vec<&Part> {
        let mut options: Vec<&Part> = self
            .parts(category)
            .iter()
            .filter(|p| max_price.map_or(true, |max| p.price <= max))
            .collect();
        options.sort_by(|a, b| {
            b.performance_score
                .total_cmp(&a.performance_score)
                .then(a.price.total_cmp(&b.price))
                .then_with(|| a.model_name.cmp(&b.model_name))
        });
        options.truncate(limit);
        options
    }

    /// Price of the cheapest complete, socket-compatible build, if any.
    pub fn cheapest_build_cost(&self) -> Option<f64> {
        let platform = self.cheapest_platform_cost()?;
        let mut total = platform;
        for category in Category::ALL {
            if category.requires_socket() {
                continue;
            }
            total += self.cheapest(category)?.price;
        }
        Some(total)
    }

    /// Cheapest CPU plus motherboard sharing a socket.
    pub fn cheapest_platform_cost(&self) -> Option<f64> {
        self.sockets()
            .into_iter()
            .filter_map(|socket| {
                let cpu = self.cheapest_on_socket(Category::Cpu, socket)?;
                let board = self.cheapest_on_socket(Category::Motherboard, socket)?;
                Some(cpu.price + board.price)
            })
            .min_by(f64::total_cmp)
    }

    fn cheapest(&self, category: Category) -> Option<&Part> {
        self.parts(category)
            .iter()
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }

    fn cheapest_on_socket(&self, category: Category, socket: &str) -> Option<&Part> {
        self.parts(category)
            .iter()
            .filter(|p| p.socket.as_deref() == Some(socket))
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(category: Category, name: &str, price: f64, score: f64, socket: Option<&str>) -> Part {
        Part {
            category,
            model_name: name.to_string(),
            price,
            performance_score: score,
            socket: socket.map(str::to_string),
        }
    }

    fn small_catalog() -> Catalog {
        Catalog::from_validated(
            vec![
                part(Category::Cpu, "cpu-a", 100.0, 10.0, Some("A")),
                part(Category::Cpu, "cpu-b", 80.0, 8.0, Some("B")),
                part(Category::Motherboard, "mb-a", 90.0, 1.0, Some("A")),
                part(Category::Motherboard, "mb-b", 150.0, 1.0, Some("B")),
                part(Category::Ram, "ram", 40.0, 1.0, None),
                part(Category::Storage, "ssd", 50.0, 1.0, None),
                part(Category::Gpu, "gpu", 200.0, 1.0, None),
                part(Category::Gpu, "gpu-big", 600.0, 4.0, None),
                part(Category::Psu, "psu", 60.0, 1.0, None),
                part(Category::Case, "case", 70.0, 1.0, None),
            ],
            "test",
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = Catalog::from_validated(
            vec![
                part(Category::Ram, "dup", 40.0, 1.0, None),
                part(Category::Ram, "dup", 45.0, 1.0, None),
            ],
            "test",
        );
        assert!(matches!(result, Err(CatalogError::Duplicate { .. })));
    }

    #[test]
    fn test_same_name_different_category_allowed() {
        let result = Catalog::from_validated(
            vec![
                part(Category::Ram, "same", 40.0, 1.0, None),
                part(Category::Storage, "same", 45.0, 1.0, None),
            ],
            "test",
        );
        assert_eq!(result.unwrap().len(), 2);
    }

    #[test]
    fn test_cheapest_build_cost_uses_compatible_platform() {
        let catalog = small_catalog();
        // A: 100 + 90 = 190, B: 80 + 150 = 230
        assert_eq!(catalog.cheapest_platform_cost(), Some(190.0));
        assert_eq!(catalog.cheapest_build_cost(), Some(190.0 + 40.0 + 50.0 + 200.0 + 60.0 + 70.0));
    }

    #[test]
    fn test_top_parts() {
        let catalog = small_catalog();
        let top = catalog.top_parts(Category::Gpu, None, 10);
        assert_eq!(top[0].model_name, "gpu-big");
        let capped = catalog.top_parts(Category::Gpu, Some(300.0), 10);
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].model_name, "gpu");
    }

    #[test]
    fn test_ensure_complete() {
        assert!(small_catalog().ensure_complete().is_ok());
        let partial = Catalog::from_validated(vec![part(Category::Ram, "ram", 40.0, 1.0, None)], "test").unwrap();
        assert!(matches!(
            partial.ensure_complete(),
            Err(CatalogError::EmptyCategory(Category::Cpu))
        ));
    }
}
