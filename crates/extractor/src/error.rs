use thiserror::Error;

/// Result type for extractor operations
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Errors that can occur while extracting accessor calls
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The source file does not parse cleanly
    #[error("Parse error in {path}: syntax error near line {line}")]
    ParseError { path: String, line: usize },

    /// Unsupported language
    #[error("Unsupported language for {0}")]
    UnsupportedLanguage(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl ExtractorError {
    /// Create a parse error
    pub fn parse(path: impl Into<String>, line: usize) -> Self {
        Self::ParseError {
            path: path.into(),
            line,
        }
    }

    /// Create an unsupported language error
    pub fn unsupported_language(path: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(path.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// True when the error means "this file is not valid source"
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }
}
