//! # envcat Catalog
//!
//! The persisted record of every environment variable a codebase reads.
//!
//! ## Lifecycle
//!
//! ```text
//! scan ──> Catalog (fresh)
//!              │
//!              ├──> merge into loaded Catalog (update)
//!              ├──> diff against loaded Catalog (check)
//!              │
//!              └──> save (atomic JSON write)
//!
//! load ──> filter_by_tags ──> verifier
//!      └─> apply_tags(name source) ──> save
//! ```
//!
//! Entries are never removed by these operations: a variable that was
//! catalogued once stays catalogued until someone deletes it by hand.
//!
//! ## Example
//!
//! ```rust
//! use envcat_catalog::{Catalog, Location, VariableEntry};
//!
//! let mut entry = VariableEntry::new("DB_URL");
//! entry.add_location(Location::new("api/db.py", 5));
//! entry.tags.insert("api".to_string());
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(entry);
//!
//! assert_eq!(catalog.filter_by_tags(&["api"]).len(), 1);
//! assert!(catalog.filter_by_tags(&["worker"]).is_empty());
//! ```

mod catalog;
mod env_snapshot;
mod error;
mod model;
mod store;
mod task_definition;
pub mod tags;

pub use catalog::{Catalog, CatalogDiff, MergeStats};
pub use env_snapshot::EnvSnapshot;
pub use envcat_extractor::DefaultValue;
pub use error::{CatalogError, Result};
pub use model::{Location, VariableEntry};
pub use tags::{apply_tags, PathHeuristics, ALL_TAGS};
pub use task_definition::{ContainerDefinition, NamedVariable, TaskDefinition};
