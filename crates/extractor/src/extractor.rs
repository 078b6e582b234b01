use crate::config::ExtractorConfig;
use crate::error::{ExtractorError, Result};
use crate::language::Language;
use crate::types::CallSite;
use crate::visitor::AccessorVisitor;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Main extractor interface
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Create a new extractor, rejecting invalid configuration
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Extract call sites from a string, detecting the language from `file_path`
    pub fn extract_str(&self, content: &str, file_path: &str) -> Result<Vec<CallSite>> {
        let language = Language::from_path(file_path)
            .ok_or_else(|| ExtractorError::unsupported_language(file_path))?;
        self.extract_with_language(content, file_path, language)
    }

    /// Extract call sites from a file on disk
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Vec<CallSite>> {
        let path = path.as_ref();
        let display = path.to_string_lossy();
        let language = Language::from_path(path)
            .ok_or_else(|| ExtractorError::unsupported_language(display.to_string()))?;
        let content = std::fs::read_to_string(path)?;
        self.extract_with_language(&content, &display, language)
    }

    /// Extract call sites with an explicit language.
    ///
    /// A tree containing any error or missing node is rejected as a whole.
    pub fn extract_with_language(
        &self,
        content: &str,
        file_path: &str,
        language: Language,
    ) -> Result<Vec<CallSite>> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|e| ExtractorError::tree_sitter(format!("Failed to set language: {e}")))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ExtractorError::tree_sitter("Parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ExtractorError::parse(file_path, first_error_line(root)));
        }

        let sites = AccessorVisitor::new(&self.config, content).visit(&tree);
        log::debug!(
            "{file_path}: {} accessor call(s) ({})",
            sites.len(),
            language.as_str()
        );
        Ok(sites)
    }
}

fn first_error_line(root: Node<'_>) -> usize {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        // Only descend into subtrees that contain the error
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return root.start_position().row + 1;
            }
        }
    }
}
