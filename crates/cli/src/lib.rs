use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use envcat_catalog::{apply_tags, Catalog, EnvSnapshot, TaskDefinition};
use envcat_scanner::{ScanStats, Scanner};
use envcat_verify::verify;
use flags::{catalog_path, ScanFlags};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod flags;
mod report;
pub mod retrieval;

use report::print_stdout;

#[derive(Parser)]
#[command(name = "envcat")]
#[command(about = "Catalog and verify the environment variables a Python codebase reads", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Root of the source tree to scan
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the codebase and write a new catalog
    Create(CreateArgs),

    /// Scan the codebase and merge the results into an existing catalog
    Update(CreateArgs),

    /// Report variables read in code but missing from the catalog
    Check(CheckArgs),

    /// Verify that catalogued variables are set in the environment
    Verify(VerifyArgs),

    /// Tag catalogued variables that are present in the environment
    #[command(name = "tags-from-env", alias = "tags_from_env")]
    TagsFromEnv(TagsFromEnvArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Catalog file to write (env: ENVCAT_CATALOG, default: env_var_catalog.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    scan: ScanFlags,
}

#[derive(Args)]
struct CheckArgs {
    /// Catalog file to check against
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Print findings as JSON on stdout
    #[arg(short, long)]
    structured_output: bool,

    #[command(flatten)]
    scan: ScanFlags,
}

#[derive(Args)]
struct VerifyArgs {
    /// Catalog file to verify
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Only verify variables with this tag (repeatable). Variables tagged
    /// `__all__` match every tag.
    #[arg(short, long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Treat missing variables with defaults as errors
    #[arg(long)]
    warning_as_error: bool,

    /// Task definition file or identifier to verify instead of the process environment
    #[arg(short, long)]
    definition: Option<String>,

    /// Region for task definitions fetched from AWS
    #[arg(long)]
    region: Option<String>,

    /// Print the report as JSON on stdout
    #[arg(short, long)]
    structured_output: bool,
}

#[derive(Args)]
struct TagsFromEnvArgs {
    /// Catalog file to read
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Where to write the tagged catalog (default: the catalog file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tag to add (repeatable)
    #[arg(short, long = "tag", value_name = "TAG", required = true)]
    tags: Vec<String>,

    /// Task definition file or identifier to take variable names from
    #[arg(short, long)]
    definition: Option<String>,

    /// Region for task definitions fetched from AWS
    #[arg(long)]
    region: Option<String>,
}

pub fn main_entry() -> Result<ExitCode> {
    let mut cli = Cli::parse();

    // keep stdout pure JSON
    let json_output = match &cli.command {
        Commands::Check(args) => args.structured_output,
        Commands::Verify(args) => args.structured_output,
        _ => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Create(args) => run_create(&cli.root, args),
        Commands::Update(args) => run_update(&cli.root, args),
        Commands::Check(args) => run_check(&cli.root, args),
        Commands::Verify(args) => run_verify(args),
        Commands::TagsFromEnv(args) => run_tags_from_env(args),
    }
}

fn scan(root: &Path, flags: &ScanFlags) -> Result<(Catalog, ScanStats)> {
    let scanner = Scanner::new(flags.scan_options(), flags.extractor_config())
        .context("Invalid scan options")?;
    scanner
        .scan(root)
        .with_context(|| format!("Failed to scan {}", root.display()))
}

fn load(path: &Path) -> Result<Catalog> {
    Catalog::load(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

fn save(catalog: &Catalog, path: &Path) -> Result<()> {
    catalog
        .save(path)
        .with_context(|| format!("Failed to write catalog {}", path.display()))
}

fn fetch_task_definition(id: &str, region: Option<String>) -> Result<TaskDefinition> {
    let document = retrieval::source_for(id, region)
        .fetch(id)
        .with_context(|| format!("Failed to retrieve task definition {id}"))?;
    TaskDefinition::from_value(document).with_context(|| format!("Invalid task definition {id}"))
}

fn run_create(root: &Path, args: CreateArgs) -> Result<ExitCode> {
    let path = catalog_path(args.output);
    if path.exists() {
        log::warn!("Overwriting existing catalog {}", path.display());
    }

    let (catalog, stats) = scan(root, &args.scan)?;
    save(&catalog, &path)?;

    print_stdout(&format!(
        "Found {} unique environment variables\nFound {} total environment variable references\nCatalog written to {}",
        catalog.len(),
        stats.call_sites,
        path.display()
    ))?;
    Ok(ExitCode::SUCCESS)
}

fn run_update(root: &Path, args: CreateArgs) -> Result<ExitCode> {
    let path = catalog_path(args.output);
    let mut catalog = Catalog::load_or_default(&path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;

    let (fresh, stats) = scan(root, &args.scan)?;
    let merged = catalog.merge(fresh);
    save(&catalog, &path)?;

    print_stdout(&format!(
        "Updated {} existing variables\nAdded {} new variables\nThe catalog now contains {} unique environment variables\nFound {} total environment variable references\nUpdated catalog written to {}",
        merged.updated_entries,
        merged.added,
        catalog.len(),
        stats.call_sites,
        path.display()
    ))?;
    Ok(ExitCode::SUCCESS)
}

fn run_check(root: &Path, args: CheckArgs) -> Result<ExitCode> {
    let path = catalog_path(args.catalog);
    let catalog = load(&path)?;
    log::info!("Loaded catalog with {} variables", catalog.len());

    let (fresh, _) = scan(root, &args.scan)?;
    let diff = catalog.diff(&fresh);
    if !diff.unseen.is_empty() {
        log::info!(
            "{} catalogued variables were not found in code: {}",
            diff.unseen.len(),
            diff.unseen.join(", ")
        );
    }

    if args.structured_output {
        print_stdout(&serde_json::to_string(&report::structured_diff(&diff))?)?;
    } else {
        print_stdout(&report::render_diff(&diff))?;
    }

    Ok(if diff.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_verify(args: VerifyArgs) -> Result<ExitCode> {
    let path = catalog_path(args.catalog);
    let catalog = load(&path)?;
    log::info!("Loaded catalog with {} environment variables", catalog.len());

    let env = match &args.definition {
        Some(id) => fetch_task_definition(id, args.region.clone())?.to_snapshot(),
        None => EnvSnapshot::from_process(),
    };

    let entries = catalog.filter_by_tags(&args.tags);
    if args.tags.is_empty() {
        log::info!("No tags filter specified, checking all variables in catalog");
    } else {
        log::info!(
            "Filtered to {} variables used in service(s): {}",
            entries.len(),
            args.tags.join(", ")
        );
    }

    let report = verify(entries.iter().copied(), &env, args.warning_as_error);
    if args.structured_output {
        print_stdout(&serde_json::to_string_pretty(&report)?)?;
    } else {
        print_stdout(&report::render_verification(&report))?;
    }

    if let Some(error) = report.first_error() {
        log::error!("{error}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_tags_from_env(args: TagsFromEnvArgs) -> Result<ExitCode> {
    let path = catalog_path(args.catalog);
    let mut catalog = load(&path)?;

    let names: BTreeSet<String> = match &args.definition {
        Some(id) => fetch_task_definition(id, args.region.clone())?.variable_names(),
        None => EnvSnapshot::from_process()
            .names()
            .map(str::to_string)
            .collect(),
    };

    let changed = apply_tags(&mut catalog, |name| names.contains(name), &args.tags);
    let output = args.output.unwrap_or(path);
    save(&catalog, &output)?;

    print_stdout(&format!(
        "Tagged {changed} variables with {}\nCatalog written to {}",
        args.tags.join(", "),
        output.display()
    ))?;
    Ok(ExitCode::SUCCESS)
}
