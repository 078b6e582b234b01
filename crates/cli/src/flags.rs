use clap::Args;
use envcat_catalog::PathHeuristics;
use envcat_extractor::{AccessorPattern, ExtractorConfig};
use envcat_scanner::ScanOptions;
use std::env;
use std::path::PathBuf;

pub(crate) const DEFAULT_CATALOG: &str = "env_var_catalog.json";
pub(crate) const CATALOG_ENV: &str = "ENVCAT_CATALOG";

/// Catalog path: the flag, then `ENVCAT_CATALOG`, then the default file name
pub(crate) fn catalog_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| {
        env::var_os(CATALOG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG))
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ScanFlags {
    /// Directory name to skip, on top of the defaults (repeatable)
    #[arg(long = "exclude-dir", value_name = "DIR")]
    pub exclude_dirs: Vec<String>,

    /// Glob over file name or relative path to skip (repeatable)
    #[arg(long = "exclude-pattern", value_name = "GLOB")]
    pub exclude_patterns: Vec<String>,

    /// Do not infer tags from directories
    #[arg(long)]
    pub no_auto_tag: bool,

    /// Number of directory segments forming an inferred tag
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub tag_depth: usize,

    /// Extra accessor, `callee[:name_pos[:default_pos|-]]` (repeatable)
    #[arg(long = "accessor", value_name = "PATTERN")]
    pub accessors: Vec<AccessorPattern>,
}

impl ScanFlags {
    pub(crate) fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            heuristics: PathHeuristics {
                tag_depth: self.tag_depth,
                ..PathHeuristics::default()
            },
            ..ScanOptions::default()
        }
        .exclude_dirs(self.exclude_dirs.iter().cloned())
        .exclude_patterns(self.exclude_patterns.iter().cloned())
        .auto_tag(!self.no_auto_tag)
    }

    pub(crate) fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::with_accessors(self.accessors.iter().cloned())
    }
}
