//! Tag inference: directory-derived tags at scan time, and externally
//! applied tags from a set of present names.

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};

/// Entries carrying this tag match every tag filter
pub const ALL_TAGS: &str = "__all__";

/// Add `tags` to every entry whose name `is_present` accepts.
///
/// Returns the number of entries whose tag set changed. Entries that do not
/// match are untouched; empty tags are ignored.
pub fn apply_tags<S, F>(catalog: &mut Catalog, is_present: F, tags: &[S]) -> usize
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    if tags.is_empty() {
        return 0;
    }

    let mut changed = 0;
    for entry in catalog.entries_mut() {
        if !is_present(&entry.name) {
            continue;
        }
        if entry.add_tags(tags.iter().map(|t| t.as_ref())) > 0 {
            log::debug!("Tagged {}", entry.name);
            changed += 1;
        }
    }
    changed
}

/// Derives a tag and a package from a file path relative to the scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHeuristics {
    /// Directory names never used as a tag
    pub skip_segments: Vec<String>,

    /// How many meaningful directory segments form the tag, joined with `/`
    pub tag_depth: usize,

    /// Directories whose child names the package
    pub package_roots: Vec<String>,
}

impl Default for PathHeuristics {
    fn default() -> Self {
        Self {
            skip_segments: [".", "..", "src", "lib"].map(String::from).to_vec(),
            tag_depth: 1,
            package_roots: ["src", "lib", "packages"].map(String::from).to_vec(),
        }
    }
}

impl PathHeuristics {
    pub fn validate(&self) -> Result<()> {
        if self.tag_depth == 0 {
            return Err(CatalogError::format("tag_depth must be at least 1"));
        }
        Ok(())
    }

    /// Tag for a `/`-separated relative path. Files at the root have none.
    pub fn tag_for(&self, relative: &str) -> Option<String> {
        let segments: Vec<&str> = dir_segments(relative)
            .filter(|seg| !self.skip_segments.iter().any(|skip| skip == seg))
            .take(self.tag_depth)
            .collect();
        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }

    /// Package for a `/`-separated relative path: the directory after a
    /// package root, otherwise the file's parent directory.
    pub fn package_for(&self, relative: &str) -> Option<String> {
        let dirs: Vec<&str> = dir_segments(relative).collect();

        let after_root = dirs.windows(2).find_map(|pair| {
            self.package_roots
                .iter()
                .any(|root| root == pair[0])
                .then_some(pair[1])
        });

        after_root
            .or_else(|| dirs.last().copied())
            .filter(|dir| *dir != "." && *dir != "..")
            .map(str::to_string)
    }
}

// Directory components only; the last segment is the file name.
fn dir_segments(relative: &str) -> impl Iterator<Item = &str> {
    let mut parts: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    parts.pop();
    parts.into_iter()
}
