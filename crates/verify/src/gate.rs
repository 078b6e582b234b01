use crate::error::Result;
use crate::report::{verify, CheckSummary};
use envcat_catalog::{EnvSnapshot, VariableEntry};

/// A passed gate: counts plus the names that will run on their defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verified {
    pub summary: CheckSummary,
    pub defaults_used: Vec<String>,
}

impl Verified {
    pub fn has_warnings(&self) -> bool {
        !self.defaults_used.is_empty()
    }
}

/// Evaluate every entry, then pass or fail as a whole.
///
/// The error names the first required variable that is missing. Only when
/// none is missing does strict mode fail on the first variable running on
/// its default. Meant as startup gating code in a service.
pub fn must_pass_check<'a, I>(entries: I, env: &EnvSnapshot, warning_as_error: bool) -> Result<Verified>
where
    I: IntoIterator<Item = &'a VariableEntry>,
{
    let report = verify(entries, env, warning_as_error);
    if let Some(err) = report.first_error() {
        log::debug!(
            "Gate failed with {} required and {} defaulted variables missing",
            report.summary.missing_without_default,
            report.summary.missing_with_default
        );
        return Err(err);
    }

    Ok(Verified {
        summary: report.summary,
        defaults_used: report
            .defaults_used()
            .map(|check| check.entry.name.clone())
            .collect(),
    })
}
