use crate::error::{CatalogError, Result};
use envcat_extractor::DefaultValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Where a variable is read: file relative to the scan root, 1-indexed line
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One catalogued environment variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    /// Variable name, the catalog key
    pub name: String,

    /// True iff some call site passes a default
    pub has_default: bool,

    /// Default from the first call site that passes one.
    ///
    /// Required in the file even when `null`.
    #[serde(deserialize_with = "required_nullable")]
    pub default_value: Option<DefaultValue>,

    /// Best-effort type tag
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub inferred_type: Option<String>,

    /// Source groupings the variable is used in
    pub packages: BTreeSet<String>,

    /// Free-form labels: directory tags plus externally applied ones
    pub tags: BTreeSet<String>,

    /// Call sites in discovery order
    pub locations: Vec<Location>,
}

impl VariableEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_default: false,
            default_value: None,
            inferred_type: None,
            packages: BTreeSet::new(),
            tags: BTreeSet::new(),
            locations: Vec::new(),
        }
    }

    /// Append a location unless the same file+line is already recorded.
    pub fn add_location(&mut self, location: Location) -> bool {
        if self.locations.contains(&location) {
            return false;
        }
        self.locations.push(location);
        true
    }

    /// Record a call site's default. Only the first defaulting site sets the value.
    ///
    /// Returns `false` when a different default was already recorded.
    pub fn record_default(&mut self, value: Option<DefaultValue>) -> bool {
        if self.has_default {
            return self.default_value == value;
        }
        self.has_default = true;
        self.default_value = value;
        true
    }

    /// Union tags; returns how many were new
    pub fn add_tags<I, S>(&mut self, tags: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tags.into_iter()
            .map(Into::into)
            .filter(|tag: &String| !tag.is_empty())
            .fold(0, |added, tag| added + usize::from(self.tags.insert(tag)))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::format("entry with an empty name"));
        }
        if !self.has_default && self.default_value.is_some() {
            return Err(CatalogError::format(format!(
                "'{}' has a default_value but has_default is false",
                self.name
            )));
        }
        if let Some(location) = self
            .locations
            .iter()
            .find(|location| location.line == 0 || location.file.is_empty())
        {
            return Err(CatalogError::format(format!(
                "'{}' has an invalid location '{location}'",
                self.name
            )));
        }
        Ok(())
    }
}

/// `Option` field that must be present in the document, even if `null`
fn required_nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Older catalogs store a missing type as `""`
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|ty| !ty.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_location_skips_duplicates() {
        let mut entry = VariableEntry::new("A");
        assert!(entry.add_location(Location::new("a.py", 1)));
        assert!(!entry.add_location(Location::new("a.py", 1)));
        assert!(entry.add_location(Location::new("a.py", 2)));
        assert_eq!(entry.locations.len(), 2);
    }

    #[test]
    fn test_record_default_keeps_first() {
        let mut entry = VariableEntry::new("A");
        assert!(entry.record_default(Some(DefaultValue::Integer(1))));
        assert!(!entry.record_default(Some(DefaultValue::Integer(2))));
        assert!(entry.record_default(Some(DefaultValue::Integer(1))));
        assert_eq!(entry.default_value, Some(DefaultValue::Integer(1)));
    }

    #[test]
    fn test_add_tags_ignores_empty_and_duplicates() {
        let mut entry = VariableEntry::new("A");
        assert_eq!(entry.add_tags(["api", "", "api", "worker"]), 2);
        assert!(entry.has_tag("api"));
        assert!(entry.has_tag("worker"));
    }

    #[test]
    fn test_missing_default_value_field_is_rejected() {
        let raw = r#"{"name":"A","has_default":false,"packages":[],"tags":[],"locations":[]}"#;
        assert!(serde_json::from_str::<VariableEntry>(raw).is_err());
    }

    #[test]
    fn test_empty_inferred_type_reads_as_none() {
        let raw = r#"{"name":"A","has_default":false,"default_value":null,"inferred_type":"",
                      "packages":[],"tags":[],"locations":[{"file":"a.py","line":3}]}"#;
        let entry: VariableEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.inferred_type, None);
        assert_eq!(entry.locations, vec![Location::new("a.py", 3)]);
    }

    #[test]
    fn test_validate_rejects_default_without_flag() {
        let mut entry = VariableEntry::new("A");
        entry.default_value = Some(DefaultValue::Bool(true));
        assert!(entry.validate().is_err());
    }
}
