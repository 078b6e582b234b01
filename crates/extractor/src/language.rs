use std::path::Path;

/// Language whose accessor calls can be extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" => Some(Language::Python),
            _ => None,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
        }
    }

    /// Source file extensions scanned for this language
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "pyw"],
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }
}
