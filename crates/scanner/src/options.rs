use crate::error::{Result, ScannerError};
use envcat_catalog::PathHeuristics;
use envcat_extractor::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Directories never descended into unless the caller clears the list
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".venv",
    "venv",
    "__pycache__",
    ".tox",
    ".mypy_cache",
    "node_modules",
];

/// What to scan and how to label it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory names pruned at any depth (exact match)
    pub exclude_dirs: Vec<String>,

    /// Globs matched against the file name and the root-relative path
    pub exclude_patterns: Vec<String>,

    /// File extensions to extract from, without the dot
    pub extensions: Vec<String>,

    /// Derive tags from each location's directory
    pub auto_tag: bool,

    pub heuristics: PathHeuristics,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|d| d.to_string()).collect(),
            exclude_patterns: Vec::new(),
            extensions: Language::Python
                .extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
            auto_tag: true,
            heuristics: PathHeuristics::default(),
        }
    }
}

impl ScanOptions {
    /// Add directories on top of the current list, skipping duplicates
    pub fn exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dir in dirs {
            let dir = dir.into();
            if !self.exclude_dirs.contains(&dir) {
                self.exclude_dirs.push(dir);
            }
        }
        self
    }

    pub fn exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn auto_tag(mut self, enabled: bool) -> Self {
        self.auto_tag = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|ext| Language::from_extension(ext).is_none())
        {
            return Err(ScannerError::UnsupportedExtension(ext.clone()));
        }
        self.heuristics.validate()?;
        self.compile_patterns().map(|_| ())
    }

    pub(crate) fn compile_patterns(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_patterns {
            let glob = Glob::new(pattern).map_err(|source| ScannerError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ScannerError::InvalidPattern {
            pattern: self.exclude_patterns.join(", "),
            source,
        })
    }

    pub(crate) fn wants_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ScanOptions::default();
        assert!(options.exclude_dirs.iter().any(|d| d == ".venv"));
        assert!(options.wants_extension("py"));
        assert!(options.wants_extension("PYW"));
        assert!(!options.wants_extension("rs"));
        assert!(options.auto_tag);
        options.validate().unwrap();
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let options = ScanOptions::default().exclude_patterns(["tests/[oops"]);
        assert!(matches!(
            options.validate(),
            Err(ScannerError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let options = ScanOptions {
            extensions: vec!["rb".into()],
            ..ScanOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ScannerError::UnsupportedExtension(ext)) if ext == "rb"
        ));
    }

    #[test]
    fn test_exclude_dirs_adds_without_duplicates() {
        let options = ScanOptions::default().exclude_dirs(["build", ".git"]);
        assert_eq!(
            options.exclude_dirs.len(),
            DEFAULT_EXCLUDE_DIRS.len() + 1
        );
    }
}
