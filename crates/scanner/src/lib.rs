//! # envcat Scanner
//!
//! Walks a source tree, runs the extractor over every candidate file and
//! aggregates the call sites into a fresh [`Catalog`](envcat_catalog::Catalog).
//!
//! ```text
//! FileWalker (exclusions, sorted) ──> Extractor ──> CatalogBuilder ──> (Catalog, ScanStats)
//! ```
//!
//! Scanning an unchanged tree twice yields identical catalogs: traversal is
//! sorted by file name and aggregation keeps first-discovery order.
//!
//! ```no_run
//! use envcat_extractor::ExtractorConfig;
//! use envcat_scanner::{scan_codebase, ScanOptions};
//!
//! let options = ScanOptions::default().exclude_dirs(["build"]);
//! let (catalog, stats) = scan_codebase(".", &options, &ExtractorConfig::default())?;
//! println!("{} variables in {} files", catalog.len(), stats.files);
//! # Ok::<(), envcat_scanner::ScannerError>(())
//! ```

mod builder;
mod error;
mod options;
mod stats;
mod walker;

pub use builder::{scan_codebase, CatalogBuilder, Scanner};
pub use error::{Result, ScannerError};
pub use options::{ScanOptions, DEFAULT_EXCLUDE_DIRS};
pub use stats::ScanStats;
pub use walker::{FileWalker, SourceFile};
