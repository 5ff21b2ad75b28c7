//! pagestamp - Page content change tracker
//!
//! Walks a source tree for page files, hashes each one with SHA-256 and keeps
//! a JSON cache recording, per page, the content hash and the instant that
//! content last changed. Downstream tooling reads the cache instead of
//! relying on filesystem modification times.

pub mod cache;
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;

use std::path::Path;

use anyhow::{Context, Result};

use crate::check::PageChecker;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::report::ConsoleReporter;
use crate::scanner::path_utils::{clean_path, resolve_root};

/// Run the application in the process working directory.
///
/// # Errors
///
/// Returns an error if the working directory is unavailable or the run fails.
pub fn run_app(cli: &Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    run_app_in(cli, &cwd)
}

/// Run the application as if started in `cwd`.
///
/// The cache file, the config file and the default root are all located
/// relative to `cwd`; cache keys are relative to it too.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any stage of the check
/// fails.
pub fn run_app_in(cli: &Cli, cwd: &Path) -> Result<ExitCode> {
    let cwd = clean_path(cwd);
    let config = Config::load(&cwd).context("Failed to load configuration")?;

    let root = resolve_root(&cwd, cli.root.as_deref(), &config.default_root);
    let cache_path = config.cache_path(&cwd);
    log::debug!("Scan root: {}", root.display());
    log::debug!("Cache file: {}", cache_path.display());

    PageChecker::new(&cwd, &root, &cache_path)
        .with_walker_config(config.walker_config())
        .with_reporter(Box::new(ConsoleReporter::new(cli.quiet)))
        .run()
        .with_context(|| format!("Page check failed for {}", root.display()))?;

    Ok(ExitCode::Success)
}
