use anyhow::Result;
use envcat_catalog::{CatalogDiff, Location, VariableEntry};
use envcat_verify::{Severity, VariableStatus, VerificationReport};
use serde_json::{json, Map, Value};
use std::fmt::Write as _;
use std::io::{self, Write};

const SEPARATOR_WIDTH: usize = 80;
const SHOWN_LOCATIONS: usize = 3;

/// Write to stdout, treating a closed pipe as success
pub(crate) fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn join_or(values: impl IntoIterator<Item = impl AsRef<str>>, fallback: &str) -> String {
    let joined: Vec<String> = values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect();
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined.join(", ")
    }
}

fn default_text(entry: &VariableEntry) -> String {
    entry
        .default_value
        .as_ref()
        .map_or_else(|| "None".to_string(), ToString::to_string)
}

fn short_locations(locations: &[Location]) -> String {
    let mut text = locations
        .iter()
        .take(SHOWN_LOCATIONS)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if locations.len() > SHOWN_LOCATIONS {
        let _ = write!(text, " and {} more", locations.len() - SHOWN_LOCATIONS);
    }
    text
}

/// Per-variable blocks followed by the summary and verdict
pub(crate) fn render_verification(report: &VerificationReport<'_>) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let total = report.checks.len();
    let mut out = String::new();

    let _ = writeln!(out, "Checking {total} environment variables:");
    let _ = writeln!(out, "{separator}");

    for (idx, check) in report.checks.iter().enumerate() {
        let entry = check.entry;
        let _ = writeln!(out, "[{}/{total}] {}", idx + 1, entry.name);
        let _ = writeln!(out, "  Tags:          {}", join_or(&entry.tags, "unknown"));
        let _ = writeln!(out, "  Used in:       {}", join_or(&entry.packages, "unknown"));
        let _ = writeln!(out, "  Has default:   {}", entry.has_default);
        if entry.has_default {
            let _ = writeln!(out, "  Default value: {}", default_text(entry));
        }

        let status = match (check.status, check.severity) {
            (VariableStatus::Set, _) => "✓ SET".to_string(),
            (VariableStatus::MissingWithoutDefault, _) => {
                "✗ ERROR - Required variable not set".to_string()
            }
            (VariableStatus::MissingWithDefault, Severity::Error) => format!(
                "✗ ERROR - Not set, default {} not allowed",
                default_text(entry)
            ),
            (VariableStatus::MissingWithDefault, _) => {
                format!("⚠ WARNING - Not set, using default: {}", default_text(entry))
            }
        };
        let _ = writeln!(out, "  Status:        {status}");

        if !entry.locations.is_empty() {
            let _ = writeln!(out, "  Referenced in:");
            for location in entry.locations.iter().take(SHOWN_LOCATIONS) {
                let _ = writeln!(out, "    • {location}");
            }
            if entry.locations.len() > SHOWN_LOCATIONS {
                let _ = writeln!(
                    out,
                    "    • ... and {} more locations",
                    entry.locations.len() - SHOWN_LOCATIONS
                );
            }
        }
        let _ = writeln!(out, "{separator}");
    }

    let summary = &report.summary;
    let strict_note = if report.warning_as_error {
        " (treated as errors)"
    } else {
        ""
    };
    let _ = writeln!(out, "\nSUMMARY:");
    let _ = writeln!(out, "  Total variables checked: {}", summary.total);
    let _ = writeln!(out, "  Variables present:       {}", summary.present);
    let _ = writeln!(
        out,
        "  Missing with default:    {}{strict_note}",
        summary.missing_with_default
    );
    let _ = writeln!(
        out,
        "  Missing without default: {}",
        summary.missing_without_default
    );

    let verdict = if summary.missing_without_default > 0 {
        format!(
            "ERROR: {} required environment variables are missing",
            summary.missing_without_default
        )
    } else if summary.missing_with_default > 0 && report.warning_as_error {
        format!(
            "ERROR: {} environment variables are using defaults but warnings are treated as errors",
            summary.missing_with_default
        )
    } else if summary.missing_with_default > 0 {
        format!(
            "WARNING: {} environment variables are using defaults",
            summary.missing_with_default
        )
    } else {
        "SUCCESS: All required environment variables are set".to_string()
    };
    let _ = write!(out, "\n{verdict}");
    out
}

/// `{name: {default_value?, locations?}}` for uncatalogued variables
pub(crate) fn structured_diff(diff: &CatalogDiff) -> Value {
    let mut output = Map::new();
    for entry in &diff.uncatalogued {
        let mut fields = Map::new();
        if let Some(value) = &entry.default_value {
            fields.insert("default_value".to_string(), json!(value));
        }
        if !entry.locations.is_empty() {
            fields.insert("locations".to_string(), json!(entry.locations));
        }
        output.insert(entry.name.clone(), Value::Object(fields));
    }
    Value::Object(output)
}

pub(crate) fn render_diff(diff: &CatalogDiff) -> String {
    if diff.is_clean() {
        return "All environment variables in code are documented in the catalog.".to_string();
    }

    let mut out = format!(
        "WARNING: Found {} environment variables in code that are not in the catalog:",
        diff.uncatalogued.len()
    );
    for entry in &diff.uncatalogued {
        let _ = write!(
            out,
            "\n- {} (default: {}) in {}",
            entry.name,
            default_text(entry),
            short_locations(&entry.locations)
        );
    }
    out
}
