//! Command-line interface for docvet.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::DocvetConfig;
use crate::detect::{Check, GitDiff, Runner};
use crate::report::{self, OutputFormat};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["__pycache__", ".venv", "venv", "node_modules"];

/// Default config template written by `docvet init`.
const CONFIG_TEMPLATE: &str = include_str!("templates/docvet.yaml");

/// Docstring quality checker for Google-style Python docstrings.
///
/// Reports docstrings that omit sections the code calls for (Raises,
/// Yields, Attributes, ...) and docstrings left stale by code changes.
#[derive(Parser)]
#[command(name = "docvet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every check
    Check(CheckArgs),
    /// Check for missing docstring sections
    Enrichment(CheckArgs),
    /// Check for docstrings not updated alongside code changes
    Freshness(CheckArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments shared by the check commands.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Files or directories to check (default: src_root from config, or .)
    pub paths: Vec<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: terminal, markdown, json, or diagnostics
    #[arg(short, long, default_value = "terminal")]
    pub format: String,

    /// Diff staged changes instead of the working tree (freshness)
    #[arg(long)]
    pub staged: bool,
}

/// Arguments for the init command.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "docvet.yaml")]
    pub output: PathBuf,
}

/// Load the explicit config, a discovered one, or defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<DocvetConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => DocvetConfig::discover(Path::new(".")),
    };
    let config = match path {
        Some(path) => {
            debug!(config = %path.display(), "loading config");
            DocvetConfig::parse_file(&path)?
        }
        None => DocvetConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Collect Python files under `roots`, applying the config's exclusions.
pub fn collect_files(roots: &[PathBuf], config: &DocvetConfig) -> anyhow::Result<Vec<PathBuf>> {
    let excluded = config.exclude_set()?;
    let mut files = Vec::new();

    for root in roots {
        if root.is_file() {
            if is_python(root) && !excluded.is_match(root) {
                files.push(root.clone());
            }
            continue;
        }
        if !root.exists() {
            anyhow::bail!("cannot access path {}", root.display());
        }

        for entry in WalkDir::new(root).follow_links(true).into_iter().filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&&*name)
        }) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && is_python(path) && !excluded.is_match(path) {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "discovered files");
    Ok(files)
}

fn is_python(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("py")
}

/// Run one of the check commands.
pub fn run_check(checks: &[Check], args: &CheckArgs) -> anyhow::Result<i32> {
    let format: OutputFormat = match args.format.parse() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let roots = if !args.paths.is_empty() {
        args.paths.clone()
    } else {
        vec![config.src_root.clone().unwrap_or_else(|| PathBuf::from("."))]
    };

    let files = match collect_files(&roots, &config) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if files.is_empty() {
        warn!("no Python files to check");
    }

    let diffs = GitDiff {
        staged: args.staged,
    };
    let runner = Runner::new(checks, &config.enrichment).with_diffs(&diffs);
    let result = runner.run(&files);

    report::write_report(format, &result)?;

    let fail_on = config.fail_on_checks()?;
    if result.failed(&fail_on) {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&args.output, CONFIG_TEMPLATE)?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: docvet check --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
