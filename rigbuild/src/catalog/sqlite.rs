//! SQLite parts database loader.
//!
//! Expects one table per category, named by [`Category::table_name`], with a
//! `name` and `price` column and optional `score` and `socket` columns.
//! Missing tables are skipped; completeness is checked by the caller.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};

use crate::catalog::loader::{validate_row, RawPart, RawPrice};
use crate::catalog::schema::Category;
use crate::catalog::store::{Catalog, CatalogError};

impl Catalog {
    /// Load a read-only parts database.
    pub fn from_sqlite(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let origin = path.display().to_string();
        let mut parts = Vec::new();

        for category in Category::ALL {
            let table = category.table_name();
            let columns = table_columns(&conn, table)?;
            if columns.is_empty() {
                tracing::debug!("No table '{}' in {}", table, origin);
                continue;
            }

            let score = if columns.iter().any(|c| c == "score") { "score" } else { "NULL" };
            let socket = if columns.iter().any(|c| c == "socket") { "socket" } else { "NULL" };
            let sql = format!(
                "SELECT name, price, {}, {} FROM \"{}\" ORDER BY rowid",
                score, socket, table
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, Value>(0)?,
                    row.get::<_, Value>(1)?,
                    row.get::<_, Value>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?;

            let row_origin = format!("{}:{}", origin, table);
            for (index, row) in rows.enumerate() {
                let (name, price, score, socket) = row?;
                let invalid = |reason: String| CatalogError::InvalidRow {
                    origin: row_origin.clone(),
                    row: index,
                    reason,
                };

                let raw = RawPart {
                    category: None,
                    model_name: value_as_text(&name).ok_or_else(|| invalid("missing name".to_string()))?,
                    price: value_as_price(&price).ok_or_else(|| invalid("missing price".to_string()))?,
                    performance_score: value_as_f64(&score),
                    socket,
                };
                parts.push(validate_row(raw, Some(category)).map_err(invalid)?);
            }
        }

        Self::from_validated(parts, origin)
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, CatalogError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{}\")", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(r) => Some(r.to_string()),
        _ => None,
    }
}

fn value_as_price(value: &Value) -> Option<RawPrice> {
    match value {
        Value::Integer(i) => Some(RawPrice::Number(*i as f64)),
        Value::Real(r) => Some(RawPrice::Number(*r)),
        Value::Text(s) => Some(RawPrice::Text(s.clone())),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Real(r) => Some(*r),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE cpu (name TEXT, price TEXT, score REAL, socket TEXT);
             INSERT INTO cpu VALUES ('Intel Core i5-13400F', '$189.99', 25000, NULL);
             INSERT INTO cpu VALUES ('AMD Ryzen 5 7600', '199', 27000, 'AM5');
             CREATE TABLE motherboard (name TEXT, price REAL, socket TEXT);
             INSERT INTO motherboard VALUES ('MSI PRO B760M-A', 129.99, 'LGA1700');
             CREATE TABLE memory (name TEXT, price REAL, score REAL);
             INSERT INTO memory VALUES ('Corsair Vengeance 32GB', 94.99, NULL);",
        )
        .unwrap();
    }

    #[test]
    fn test_load_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parts.db");
        seed(&path);

        let catalog = Catalog::from_sqlite(&path).unwrap();
        assert_eq!(catalog.count(Category::Cpu), 2);
        assert_eq!(catalog.count(Category::Motherboard), 1);
        assert_eq!(catalog.count(Category::Gpu), 0);

        let intel = catalog.get(Category::Cpu, "Intel Core i5-13400F").unwrap();
        assert_eq!(intel.price, 189.99);
        assert_eq!(intel.socket.as_deref(), Some("LGA1700"));

        let ram = catalog.get(Category::Ram, "Corsair Vengeance 32GB").unwrap();
        assert_eq!(ram.performance_score, 94.99);
        assert!(matches!(catalog.ensure_complete(), Err(CatalogError::EmptyCategory(_))));
    }

    #[test]
    fn test_sqlite_bad_row_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parts.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE video_card (name TEXT, price REAL);
             INSERT INTO video_card VALUES ('Free GPU', 0);",
        )
        .unwrap();
        drop(conn);

        assert!(matches!(
            Catalog::from_sqlite(&path),
            Err(CatalogError::InvalidRow { .. })
        ));
    }
}
