use crate::error::{CatalogError, Result};
use crate::model::VariableEntry;
use crate::tags::ALL_TAGS;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Variable entries keyed by name, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<VariableEntry>,
    index: HashMap<String, usize>,
}

/// Outcome of [`Catalog::merge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Names introduced by the scan
    pub added: usize,

    /// Existing entries that gained a location, tag or package
    pub updated_entries: usize,

    /// Locations appended to existing entries
    pub new_locations: usize,
}

/// Outcome of [`Catalog::diff`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogDiff {
    /// Scanned variables the catalog does not know about
    pub uncatalogued: Vec<VariableEntry>,

    /// Catalogued names the scan did not find
    pub unseen: Vec<String>,
}

impl CatalogDiff {
    pub fn is_clean(&self) -> bool {
        self.uncatalogued.is_empty()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries, rejecting duplicates and broken entries
    pub fn from_entries(entries: Vec<VariableEntry>) -> Result<Self> {
        let mut catalog = Self::new();
        for entry in entries {
            entry.validate()?;
            let name = entry.name.clone();
            if !catalog.insert(entry) {
                return Err(CatalogError::format(format!(
                    "variable '{name}' appears more than once"
                )));
            }
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&VariableEntry> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    /// Insert a new entry. Returns `false` (and leaves the catalog untouched)
    /// when the name is already present.
    pub fn insert(&mut self, entry: VariableEntry) -> bool {
        if self.index.contains_key(&entry.name) {
            return false;
        }
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Entry for `name`, created empty if missing
    pub fn entry_or_insert(&mut self, name: &str) -> &mut VariableEntry {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(VariableEntry::new(name));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariableEntry> {
        self.entries.iter()
    }

    // Callers inside the crate must not rename entries.
    pub(crate) fn entries_mut(&mut self) -> std::slice::IterMut<'_, VariableEntry> {
        self.entries.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn entries(&self) -> &[VariableEntry] {
        &self.entries
    }

    /// Fold a fresh scan into this catalog.
    ///
    /// Known names gain new locations (exact file+line duplicates skipped),
    /// tags and packages; their default and type metadata is left as
    /// recorded. Unknown names are appended. Nothing is removed.
    pub fn merge(&mut self, scan: Catalog) -> MergeStats {
        let mut stats = MergeStats::default();

        for incoming in scan.entries {
            let Some(&idx) = self.index.get(&incoming.name) else {
                log::debug!("merge: new variable {}", incoming.name);
                self.insert(incoming);
                stats.added += 1;
                continue;
            };

            let existing = &mut self.entries[idx];
            let mut changed = false;
            for location in incoming.locations {
                if existing.add_location(location) {
                    stats.new_locations += 1;
                    changed = true;
                }
            }
            changed |= existing.add_tags(incoming.tags) > 0;
            for package in incoming.packages {
                changed |= existing.packages.insert(package);
            }
            if changed {
                stats.updated_entries += 1;
            }
        }

        stats
    }

    /// Compare a fresh scan against this catalog without modifying it
    pub fn diff(&self, scan: &Catalog) -> CatalogDiff {
        let uncatalogued = scan
            .iter()
            .filter(|entry| !self.contains(&entry.name))
            .cloned()
            .collect();
        let unseen = self
            .names()
            .filter(|name| !scan.contains(name))
            .map(str::to_string)
            .collect();
        CatalogDiff {
            uncatalogued,
            unseen,
        }
    }

    /// Entries carrying any of `tags`; everything when `tags` is empty.
    ///
    /// Entries tagged [`ALL_TAGS`] belong to every tag, so a filter on
    /// `["api"]` also returns them even though they do not carry `api`.
    /// Scans never assign [`ALL_TAGS`]; only `apply_tags` or a hand-edited
    /// catalog can.
    pub fn filter_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&VariableEntry> {
        if tags.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|entry| {
                entry.has_tag(ALL_TAGS) || tags.iter().any(|tag| entry.has_tag(tag.as_ref()))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a VariableEntry;
    type IntoIter = std::slice::Iter<'a, VariableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = Vec::<VariableEntry>::deserialize(deserializer)?;
        Catalog::from_entries(entries).map_err(serde::de::Error::custom)
    }
}
