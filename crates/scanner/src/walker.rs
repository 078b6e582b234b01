use crate::error::{Result, ScannerError};
use crate::options::ScanOptions;
use globset::GlobSet;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A candidate source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,

    /// Path relative to the scan root, `/`-separated
    pub relative: String,
}

/// Finds source files under a root according to [`ScanOptions`]
pub struct FileWalker {
    root: PathBuf,
    options: ScanOptions,
    /// Compiled from `options.exclude_patterns`
    patterns: GlobSet,
}

impl FileWalker {
    pub fn new(root: impl AsRef<Path>, options: &ScanOptions) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ScannerError::InvalidRoot(root));
        }
        Ok(Self {
            root,
            options: options.clone(),
            patterns: options.compile_patterns()?,
        })
    }

    /// Walk the tree in file-name order.
    ///
    /// Entries that cannot be read are logged and skipped; only a failure on
    /// the root itself is an error.
    pub fn walk(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry));

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ScannerError::Walk {
                        root: self.root.clone(),
                        source: e,
                    })
                }
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let wanted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.options.wants_extension(ext));
            if !wanted {
                continue;
            }

            let relative = relative_path(&self.root, path);
            if self.is_excluded_file(path, &relative) {
                log::debug!("Skipping excluded file {relative}");
                continue;
            }

            files.push(SourceFile {
                path: path.to_path_buf(),
                relative,
            });
        }

        log::debug!("Found {} source files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        let excluded = self.options.exclude_dirs.iter().any(|dir| *dir == name);
        if excluded {
            log::debug!("Pruning {}", entry.path().display());
        }
        excluded
    }

    fn is_excluded_file(&self, path: &Path, relative: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let by_name = path
            .file_name()
            .is_some_and(|name| self.patterns.is_match(name));
        by_name || self.patterns.is_match(relative)
    }
}

/// `/`-joined path of `path` below `root`
pub(crate) fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn walk(root: &Path, options: &ScanOptions) -> Vec<String> {
        FileWalker::new(root, options)
            .unwrap()
            .walk()
            .unwrap()
            .into_iter()
            .map(|f| f.relative)
            .collect()
    }

    #[test]
    fn test_walk_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for file in [
            "z.py",
            "api/b.py",
            "api/a.py",
            "api/readme.md",
            "tools/run.pyw",
            ".venv/lib/site.py",
            "api/__pycache__/a.py",
            "nested/.git/hook.py",
        ] {
            touch(dir.path(), file);
        }

        assert_eq!(
            walk(dir.path(), &ScanOptions::default()),
            vec!["api/a.py", "api/b.py", "tools/run.pyw", "z.py"]
        );
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = tempdir().unwrap();
        for file in ["app.py", "test_app.py", "tests/conftest.py", "migrations/0001.py"] {
            touch(dir.path(), file);
        }

        let options = ScanOptions::default().exclude_patterns(["test_*.py", "migrations/*"]);
        assert_eq!(walk(dir.path(), &options), vec!["app.py", "tests/conftest.py"]);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        let result = FileWalker::new(dir.path().join("nope"), &ScanOptions::default());
        assert!(matches!(result, Err(ScannerError::InvalidRoot(_))));
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/repo");
        assert_eq!(relative_path(root, &root.join("a").join("b.py")), "a/b.py");
    }
}
