use crate::error::Result;
use crate::options::ScanOptions;
use crate::stats::ScanStats;
use crate::walker::FileWalker;
use envcat_catalog::{Catalog, Location, PathHeuristics};
use envcat_extractor::{CallSite, Extractor, ExtractorConfig, ExtractorError, Language};
use std::collections::HashSet;
use std::path::Path;

/// Aggregates call sites into catalog entries, one per variable name.
///
/// Entry order is first-discovery order. For each name the first call site
/// that passes a default decides `default_value`; a later site passing a
/// different default is logged and counted, not recorded.
pub struct CatalogBuilder {
    heuristics: PathHeuristics,
    auto_tag: bool,
    catalog: Catalog,
    stats: ScanStats,
    divergent: HashSet<String>,
}

impl CatalogBuilder {
    pub fn new(heuristics: PathHeuristics, auto_tag: bool) -> Self {
        Self {
            heuristics,
            auto_tag,
            catalog: Catalog::new(),
            stats: ScanStats::new(),
            divergent: HashSet::new(),
        }
    }

    pub fn from_options(options: &ScanOptions) -> Self {
        Self::new(options.heuristics.clone(), options.auto_tag)
    }

    /// Record every call site found in one file
    pub fn add_file(&mut self, relative: &str, sites: Vec<CallSite>) {
        self.stats.add_file(sites.len());
        if sites.is_empty() {
            return;
        }

        let package = self.heuristics.package_for(relative);
        let tag = if self.auto_tag {
            self.heuristics.tag_for(relative)
        } else {
            None
        };

        for site in sites {
            self.add_site(relative, site, package.as_deref(), tag.as_deref());
        }
    }

    fn add_site(&mut self, relative: &str, site: CallSite, package: Option<&str>, tag: Option<&str>) {
        let entry = self.catalog.entry_or_insert(&site.name);
        entry.add_location(Location::new(relative, line_number(site.line)));

        if site.has_default && !entry.record_default(site.default_value.clone()) {
            log::warn!(
                "{} has a different default at {relative}:{} ({}); keeping the first one",
                site.name,
                site.line,
                describe(site.default_value.as_ref()),
            );
            if self.divergent.insert(site.name.clone()) {
                self.stats.divergent_defaults += 1;
            }
        }

        if entry.inferred_type.is_none() {
            entry.inferred_type = site.inferred_type;
        }
        if let Some(package) = package {
            entry.packages.insert(package.to_string());
        }
        if let Some(tag) = tag {
            entry.add_tags([tag]);
        }
    }

    pub fn record_parse_error(&mut self) {
        self.stats.parse_errors += 1;
    }

    pub fn record_read_error(&mut self) {
        self.stats.read_errors += 1;
    }

    pub fn finish(mut self) -> (Catalog, ScanStats) {
        self.stats.variables = self.catalog.len();
        (self.catalog, self.stats)
    }
}

fn line_number(line: usize) -> u32 {
    u32::try_from(line).unwrap_or(u32::MAX)
}

fn describe(value: Option<&envcat_catalog::DefaultValue>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

/// Walks a tree and extracts every accessor call into a fresh catalog
pub struct Scanner {
    options: ScanOptions,
    extractor: Extractor,
}

impl Scanner {
    pub fn new(options: ScanOptions, config: ExtractorConfig) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            extractor: Extractor::new(config)?,
        })
    }

    /// Scan `root`. Unreadable and unparsable files are skipped and counted.
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<(Catalog, ScanStats)> {
        let walker = FileWalker::new(root, &self.options)?;
        let mut builder = CatalogBuilder::from_options(&self.options);

        for file in walker.walk()? {
            let Some(language) = Language::from_path(&file.path) else {
                continue;
            };
            let content = match std::fs::read_to_string(&file.path) {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("Skipping {}: {e}", file.relative);
                    builder.record_read_error();
                    continue;
                }
            };

            match self
                .extractor
                .extract_with_language(&content, &file.relative, language)
            {
                Ok(sites) => builder.add_file(&file.relative, sites),
                Err(e @ ExtractorError::ParseError { .. }) => {
                    log::warn!("Skipping {e}");
                    builder.record_parse_error();
                }
                Err(e) => return Err(e.into()),
            }
        }

        let (catalog, stats) = builder.finish();
        log::info!(
            "Scanned {} files: {} call sites, {} variables ({} skipped)",
            stats.files,
            stats.call_sites,
            stats.variables,
            stats.skipped()
        );
        Ok((catalog, stats))
    }
}

/// Scan `root` with the given options and extractor configuration
pub fn scan_codebase(
    root: impl AsRef<Path>,
    options: &ScanOptions,
    config: &ExtractorConfig,
) -> Result<(Catalog, ScanStats)> {
    Scanner::new(options.clone(), config.clone())?.scan(root)
}
