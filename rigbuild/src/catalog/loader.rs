//! Catalog Loader
//!
//! Loads parts from:
//! 1. A JSON array of rows (file or string)
//! 2. A directory of JSON files, one per category
//! 3. The embedded default catalog compiled into the binary
//!
//! Loading is all-or-nothing: the first malformed row fails the whole load.

use std::path::Path;

use serde::Deserialize;

use crate::catalog::schema::{Category, Part};
use crate::catalog::socket::infer_socket;
use crate::catalog::store::{Catalog, CatalogError};

const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.json");

/// A catalog row as it appears in source data, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPart {
    #[serde(default, alias = "type")]
    pub category: Option<String>,
    #[serde(alias = "name", alias = "model")]
    pub model_name: String,
    pub price: RawPrice,
    #[serde(default, alias = "score", alias = "performance")]
    pub performance_score: Option<f64>,
    #[serde(default)]
    pub socket: Option<String>,
}

/// Prices come either as numbers or as retail strings like `"$1,299.99"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

impl RawPrice {
    pub fn amount(&self) -> Option<f64> {
        match self {
            RawPrice::Number(n) => Some(*n),
            RawPrice::Text(s) => parse_dollars(s),
        }
    }
}

pub(crate) fn parse_dollars(s: &str) -> Option<f64> {
    s.chars()
        .filter(|c| !(*c == '$' || *c == ',' || c.is_whitespace()))
        .collect::<String>()
        .parse::<f64>()
        .ok()
}

/// Validate one raw row into a [`Part`].
///
/// `default_category` applies when the row does not name its own category.
pub fn validate_row(raw: RawPart, default_category: Option<Category>) -> Result<Part, String> {
    let category = match raw.category.as_deref() {
        Some(name) => name.parse::<Category>()?,
        None => default_category.ok_or_else(|| "missing category".to_string())?,
    };

    let model_name = raw.model_name.trim().to_string();
    if model_name.is_empty() {
        return Err("empty model name".to_string());
    }

    let price = raw
        .price
        .amount()
        .ok_or_else(|| format!("unparseable price for '{}'", model_name))?;
    if !price.is_finite() || price <= 0.0 {
        return Err(format!("price must be positive for '{}', got {}", model_name, price));
    }

    let performance_score = match raw.performance_score {
        Some(score) => score,
        None => {
            tracing::debug!("No performance score for '{}', falling back to price", model_name);
            price
        }
    };
    if !performance_score.is_finite() || performance_score <= 0.0 {
        return Err(format!(
            "performance score must be positive for '{}', got {}",
            model_name, performance_score
        ));
    }

    let mut socket = raw
        .socket
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if category == Category::Cpu && socket.is_none() {
        socket = infer_socket(&model_name).map(str::to_string);
        if let Some(ref inferred) = socket {
            tracing::debug!("Inferred socket {} for '{}'", inferred, model_name);
        }
    }

    match (category.requires_socket(), socket.is_some()) {
        (true, false) => {
            return Err(format!("{} '{}' has no socket", category.label(), model_name));
        }
        (false, true) => {
            return Err(format!(
                "{} '{}' must not carry a socket",
                category.label(),
                model_name
            ));
        }
        _ => {}
    }

    Ok(Part {
        category,
        model_name,
        price,
        performance_score,
        socket,
    })
}

fn validate_rows(
    rows: Vec<RawPart>,
    origin: &str,
    default_category: Option<Category>,
) -> Result<Vec<Part>, CatalogError> {
    rows.into_iter()
        .enumerate()
        .map(|(row, raw)| {
            validate_row(raw, default_category).map_err(|reason| CatalogError::InvalidRow {
                origin: origin.to_string(),
                row,
                reason,
            })
        })
        .collect()
}

fn parse_rows(json: &str, origin: &str) -> Result<Vec<RawPart>, CatalogError> {
    serde_json::from_str(json).map_err(|error| CatalogError::Parse {
        origin: origin.to_string(),
        error,
    })
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|error| CatalogError::Io {
        path: path.display().to_string(),
        error,
    })
}

impl Catalog {
    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(EMBEDDED_CATALOG, "embedded catalog")
    }

    /// Parse a JSON array of rows.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self, CatalogError> {
        let rows = parse_rows(json, origin)?;
        let parts = validate_rows(rows, origin, None)?;
        Self::from_validated(parts, origin)
    }

    /// Load a JSON file of rows.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = read_file(path)?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Load every `*.json` file in a directory.
    ///
    /// A file named after a category (e.g. `video_card.json`) supplies that
    /// category to rows that leave it out.
    pub fn from_directory(dir: &Path) -> Result<Self, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::InvalidDirectory(dir.display().to_string()));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|error| CatalogError::Io {
            path: dir.display().to_string(),
            error,
        })? {
            let path = entry
                .map_err(|error| CatalogError::Io {
                    path: dir.display().to_string(),
                    error,
                })?
                .path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                files.push(path);
            }
        }
        // read_dir order is platform dependent
        files.sort();

        if files.is_empty() {
            return Err(CatalogError::InvalidDirectory(format!(
                "{} contains no .json files",
                dir.display()
            )));
        }

        let mut parts = Vec::new();
        for path in &files {
            let origin = path.display().to_string();
            let default_category = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<Category>().ok());
            let rows = parse_rows(&read_file(path)?, &origin)?;
            parts.extend(validate_rows(rows, &origin, default_category)?);
        }

        Self::from_validated(parts, dir.display().to_string())
    }

    /// Load from a file, a directory, or (with the `sqlite` feature) a
    /// `.db`/`.sqlite` parts database, chosen by the path.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if path.is_dir() {
            return Self::from_directory(path);
        }
        #[cfg(feature = "sqlite")]
        {
            let ext = path.extension().and_then(|s| s.to_str());
            if matches!(ext, Some("db") | Some("sqlite") | Some("sqlite3")) {
                return Self::from_sqlite(path);
            }
        }
        Self::from_json_file(path)
    }
}
