//! # envcat Extractor
//!
//! Static discovery of environment variable reads in Python source.
//!
//! ## Philosophy
//!
//! The extractor favours precision over recall:
//! - Only literal variable names are recorded (`os.getenv(name)` is skipped)
//! - A call site is either recorded completely or not at all
//! - A file with syntax errors yields nothing rather than a partial answer
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Tree-sitter Parsing → AST
//!     │
//!     ├──> Pre-order walk over every `call` node
//!     │    ├─> Match callee against configured accessor patterns
//!     │    ├─> Resolve name / default arguments (positional or keyword)
//!     │    └─> Evaluate the default literal, infer a type tag
//!     │
//!     └──> Emit CallSite[] in source order
//! ```
//!
//! ## Example
//!
//! ```rust
//! use envcat_extractor::{Extractor, ExtractorConfig};
//!
//! let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
//!
//! let code = r#"
//! import os
//! DEBUG = os.environ.get("DEBUG", False)
//! "#;
//!
//! let sites = extractor.extract_str(code, "settings.py").unwrap();
//! assert_eq!(sites[0].name, "DEBUG");
//! assert_eq!(sites[0].inferred_type.as_deref(), Some("bool"));
//! ```

mod config;
mod error;
mod extractor;
mod language;
mod literal;
mod types;
mod visitor;

pub use config::{AccessorPattern, ExtractorConfig};
pub use error::{ExtractorError, Result};
pub use extractor::Extractor;
pub use language::Language;
pub use types::{CallSite, DefaultValue};
