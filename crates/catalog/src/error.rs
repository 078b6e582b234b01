use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed catalog content or a broken entry invariant
    #[error("Invalid catalog format: {0}")]
    Format(String),

    #[error("Invalid task definition: {0}")]
    TaskDefinition(String),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
