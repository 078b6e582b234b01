use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScannerError>;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Failed to walk '{}': {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Extension '{0}' does not belong to a supported language")]
    UnsupportedExtension(String),

    #[error("Scan root '{}' is not a directory", .0.display())]
    InvalidRoot(PathBuf),

    #[error("Extractor error: {0}")]
    Extractor(#[from] envcat_extractor::ExtractorError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] envcat_catalog::CatalogError),
}
