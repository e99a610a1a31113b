//! Catalog Schema
//!
//! Data structures for catalog rows. A [`Part`] is only ever constructed by
//! the loader, which enforces its invariants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Component category of a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "CPU")]
    Cpu,
    #[serde(alias = "mainboard")]
    Motherboard,
    #[serde(alias = "RAM", alias = "memory")]
    Ram,
    #[serde(alias = "internal_hard_drive", alias = "ssd")]
    Storage,
    #[serde(alias = "GPU", alias = "video_card")]
    Gpu,
    #[serde(alias = "PSU", alias = "power_supply")]
    Psu,
    Case,
}

impl Category {
    /// Every category, in the order builds are reported.
    pub const ALL: [Category; 7] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Ram,
        Category::Storage,
        Category::Gpu,
        Category::Psu,
        Category::Case,
    ];

    /// Short identifier used in JSON and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Motherboard => "motherboard",
            Category::Ram => "ram",
            Category::Storage => "storage",
            Category::Gpu => "gpu",
            Category::Psu => "psu",
            Category::Case => "case",
        }
    }

    /// Table name used by parts databases.
    pub fn table_name(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Motherboard => "motherboard",
            Category::Ram => "memory",
            Category::Storage => "internal_hard_drive",
            Category::Gpu => "video_card",
            Category::Psu => "power_supply",
            Category::Case => "case",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Motherboard => "Motherboard",
            Category::Ram => "Memory",
            Category::Storage => "Storage",
            Category::Gpu => "Graphics Card",
            Category::Psu => "Power Supply",
            Category::Case => "Case",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Category::Cpu => 0,
            Category::Motherboard => 1,
            Category::Ram => 2,
            Category::Storage => 3,
            Category::Gpu => 4,
            Category::Psu => 5,
            Category::Case => 6,
        }
    }

    /// Whether rows of this category must carry a socket.
    pub fn requires_socket(&self) -> bool {
        matches!(self, Category::Cpu | Category::Motherboard)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "cpu" | "processor" => Ok(Category::Cpu),
            "motherboard" | "mainboard" => Ok(Category::Motherboard),
            "ram" | "memory" => Ok(Category::Ram),
            "storage" | "internal_hard_drive" | "ssd" => Ok(Category::Storage),
            "gpu" | "video_card" => Ok(Category::Gpu),
            "psu" | "power_supply" => Ok(Category::Psu),
            "case" => Ok(Category::Case),
            _ => Err(format!("unknown component category '{}'", s)),
        }
    }
}

/// One validated catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub category: Category,
    pub model_name: String,
    pub price: f64,
    pub performance_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
}

impl Part {
    /// Performance per currency unit, the ranking key.
    pub fn value(&self) -> f64 {
        self.performance_score / self.price
    }

    /// True when both parts carry the same socket.
    pub fn socket_matches(&self, other: &Part) -> bool {
        match (&self.socket, &other.socket) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (${:.2})", self.model_name, self.price)?;
        if let Some(ref socket) = self.socket {
            write!(f, " [{}]", socket)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases() {
        assert_eq!("memory".parse::<Category>().unwrap(), Category::Ram);
        assert_eq!("video_card".parse::<Category>().unwrap(), Category::Gpu);
        assert_eq!("Power-Supply".parse::<Category>().unwrap(), Category::Psu);
        assert!("keyboard".parse::<Category>().is_err());

        let cat: Category = serde_json::from_str("\"internal_hard_drive\"").unwrap();
        assert_eq!(cat, Category::Storage);
    }

    #[test]
    fn test_socket_matches() {
        let cpu = Part {
            category: Category::Cpu,
            model_name: "AMD Ryzen 5 7600".to_string(),
            price: 199.0,
            performance_score: 27000.0,
            socket: Some("AM5".to_string()),
        };
        let mut board = Part {
            category: Category::Motherboard,
            model_name: "B650".to_string(),
            price: 150.0,
            performance_score: 150.0,
            socket: Some("AM5".to_string()),
        };
        assert!(cpu.socket_matches(&board));
        board.socket = Some("AM4".to_string());
        assert!(!cpu.socket_matches(&board));
        board.socket = None;
        assert!(!cpu.socket_matches(&board));
    }
}
