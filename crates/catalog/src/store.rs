use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

impl Catalog {
    /// Parse a catalog document
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CatalogError::format(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Load a persisted catalog. A missing file is [`CatalogError::NotFound`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(CatalogError::io(path, e)),
        };

        let catalog = Self::from_json_str(&content).map_err(|e| match e {
            CatalogError::Format(msg) => {
                CatalogError::Format(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        log::debug!("Loaded {} variables from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Like [`Catalog::load`], but a missing file yields an empty catalog
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(CatalogError::NotFound(_)) => Ok(Self::new()),
            other => other,
        }
    }

    /// Write the catalog as pretty JSON.
    ///
    /// The document goes to a sibling temp file first and is renamed over
    /// `path`, so readers see either the old catalog or the new one.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }

        let json = self.to_json_pretty()?;
        let tmp = tmp_path(path);
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(CatalogError::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(CatalogError::io(path, e));
        }

        log::debug!("Saved {} variables to {}", self.len(), path.display());
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "catalog".into());
    name.push(".tmp");
    path.with_file_name(name)
}
