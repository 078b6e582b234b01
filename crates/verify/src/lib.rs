//! # envcat Verify
//!
//! Classifies catalogued variables against an explicit environment snapshot.
//!
//! | present | has default | status                    | severity                          |
//! |---------|-------------|---------------------------|-----------------------------------|
//! | yes     | any         | `Set`                     | ok                                |
//! | no      | yes         | `MissingWithDefault`      | warning, error if strict          |
//! | no      | no          | `MissingWithoutDefault`   | error                             |
//!
//! [`verify`] evaluates everything for reporting. [`must_pass_check`] is the
//! gate: a missing required variable fails it before any default does.
//!
//! ```rust
//! use envcat_catalog::{EnvSnapshot, VariableEntry};
//! use envcat_verify::{must_pass_check, VerifyError};
//!
//! let entries = vec![VariableEntry::new("DB_URL")];
//! let env = EnvSnapshot::new();
//!
//! let err = must_pass_check(&entries, &env, false).unwrap_err();
//! assert_eq!(err, VerifyError::RequiredVariableMissing { name: "DB_URL".into() });
//! ```

mod error;
mod gate;
mod report;
mod status;

pub use error::{Result, VerifyError};
pub use gate::{must_pass_check, Verified};
pub use report::{verify, CheckSummary, VariableCheck, VerificationReport};
pub use status::{classify, Severity, VariableStatus};
