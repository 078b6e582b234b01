use serde::{Deserialize, Serialize};

/// Statistics about a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Files successfully extracted
    pub files: usize,

    /// Accessor calls found
    pub call_sites: usize,

    /// Distinct variable names
    pub variables: usize,

    /// Files skipped because they did not parse
    pub parse_errors: usize,

    /// Files skipped because they could not be read
    pub read_errors: usize,

    /// Names seen with more than one distinct default
    pub divergent_defaults: usize,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, call_sites: usize) {
        self.files += 1;
        self.call_sites += call_sites;
    }

    pub fn skipped(&self) -> usize {
        self.parse_errors + self.read_errors
    }
}
