use crate::error::VerifyError;
use crate::status::{classify, Severity, VariableStatus};
use envcat_catalog::{EnvSnapshot, VariableEntry};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Result for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableCheck<'a> {
    pub entry: &'a VariableEntry,
    pub status: VariableStatus,
    pub severity: Severity,
}

impl Serialize for VariableCheck<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("VariableCheck", 6)?;
        state.serialize_field("name", &self.entry.name)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("has_default", &self.entry.has_default)?;
        state.serialize_field("default_value", &self.entry.default_value)?;
        state.serialize_field("tags", &self.entry.tags)?;
        state.end()
    }
}

/// Aggregate counts over a verification run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub total: usize,
    pub present: usize,
    pub missing_with_default: usize,
    pub missing_without_default: usize,
}

impl CheckSummary {
    pub(crate) fn record(&mut self, status: VariableStatus) {
        self.total += 1;
        match status {
            VariableStatus::Set => self.present += 1,
            VariableStatus::MissingWithDefault => self.missing_with_default += 1,
            VariableStatus::MissingWithoutDefault => self.missing_without_default += 1,
        }
    }
}

/// Every variable's status, for reporting
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport<'a> {
    pub checks: Vec<VariableCheck<'a>>,
    pub summary: CheckSummary,
    pub warning_as_error: bool,
}

impl<'a> VerificationReport<'a> {
    /// True when no check has error severity
    pub fn passed(&self) -> bool {
        self.checks
            .iter()
            .all(|check| check.severity != Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &VariableCheck<'a>> {
        self.checks
            .iter()
            .filter(|check| check.severity == Severity::Error)
    }

    /// Variables falling back to their default, whatever their severity
    pub fn defaults_used(&self) -> impl Iterator<Item = &VariableCheck<'a>> {
        self.checks
            .iter()
            .filter(|check| check.status == VariableStatus::MissingWithDefault)
    }

    /// The error `must_pass_check` would raise for the same input.
    ///
    /// A required variable that is missing outranks any default in use,
    /// whatever their order.
    pub fn first_error(&self) -> Option<VerifyError> {
        let first = |status: VariableStatus| {
            self.checks.iter().find(|check| check.status == status)
        };
        match first(VariableStatus::MissingWithoutDefault) {
            Some(check) => Some(to_error(check)),
            None if self.warning_as_error => {
                first(VariableStatus::MissingWithDefault).map(to_error)
            }
            None => None,
        }
    }
}

fn to_error(check: &VariableCheck<'_>) -> VerifyError {
    match check.status {
        VariableStatus::MissingWithDefault => VerifyError::DefaultUsedAsError {
            name: check.entry.name.clone(),
            default_value: check.entry.default_value.clone(),
        },
        _ => VerifyError::RequiredVariableMissing {
            name: check.entry.name.clone(),
        },
    }
}

fn check_entry<'a>(
    entry: &'a VariableEntry,
    env: &EnvSnapshot,
    warning_as_error: bool,
) -> VariableCheck<'a> {
    let status = classify(entry, env);
    VariableCheck {
        entry,
        status,
        severity: status.severity(warning_as_error),
    }
}

/// Classify every entry; never fails.
///
/// Checks keep the order of `entries`.
pub fn verify<'a, I>(entries: I, env: &EnvSnapshot, warning_as_error: bool) -> VerificationReport<'a>
where
    I: IntoIterator<Item = &'a VariableEntry>,
{
    let mut summary = CheckSummary::default();
    let checks: Vec<_> = entries
        .into_iter()
        .map(|entry| {
            let check = check_entry(entry, env, warning_as_error);
            summary.record(check.status);
            check
        })
        .collect();

    log::debug!(
        "Verified {} variables: {} present, {} with default, {} without",
        summary.total,
        summary.present,
        summary.missing_with_default,
        summary.missing_without_default
    );

    VerificationReport {
        checks,
        summary,
        warning_as_error,
    }
}
