use envcat_catalog::{EnvSnapshot, VariableEntry};
use serde::Serialize;
use std::fmt;

/// Runtime state of one catalogued variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableStatus {
    Set,
    MissingWithDefault,
    MissingWithoutDefault,
}

/// How a status weighs on the overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

impl VariableStatus {
    pub fn severity(self, warning_as_error: bool) -> Severity {
        match self {
            VariableStatus::Set => Severity::Ok,
            VariableStatus::MissingWithDefault if warning_as_error => Severity::Error,
            VariableStatus::MissingWithDefault => Severity::Warning,
            VariableStatus::MissingWithoutDefault => Severity::Error,
        }
    }
}

impl fmt::Display for VariableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VariableStatus::Set => "SET",
            VariableStatus::MissingWithDefault => "MISSING_WITH_DEFAULT",
            VariableStatus::MissingWithoutDefault => "MISSING_WITHOUT_DEFAULT",
        };
        f.write_str(label)
    }
}

/// Presence in `env` wins; otherwise the entry's `has_default` decides
pub fn classify(entry: &VariableEntry, env: &EnvSnapshot) -> VariableStatus {
    if env.contains(&entry.name) {
        VariableStatus::Set
    } else if entry.has_default {
        VariableStatus::MissingWithDefault
    } else {
        VariableStatus::MissingWithoutDefault
    }
}
