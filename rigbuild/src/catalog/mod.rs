//! Parts Catalog
//!
//! The catalog is loaded once at startup and shared read-only afterwards.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  JSON / dir  │───▶│  Row         │───▶│   Catalog    │
//! │  / SQLite    │    │  Validation  │    │  (read-only) │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Every row must have a positive price and performance score, and
//! `(category, model_name)` must be unique. CPUs and motherboards carry a
//! socket; nothing else does.

pub mod loader;
pub mod schema;
pub mod socket;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod store;

pub use loader::{RawPart, RawPrice};
pub use schema::{Category, Part};
pub use socket::infer_socket;
pub use store::{Catalog, CatalogError};
