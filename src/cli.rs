//! Command-line interface definitions for pagestamp.
//!
//! The tool takes a single optional positional argument, the directory to
//! scan. The remaining options only control diagnostics and output.
//!
//! # Example
//!
//! ```bash
//! # Scan ./src and update ./.page-hashes.json
//! pagestamp
//!
//! # Scan another tree; keys stay relative to the working directory
//! pagestamp app/pages
//!
//! # Debug logging on stderr
//! pagestamp -v
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Record when page content last changed.
///
/// Hashes every `page.tsx` under ROOT and stores, per page, the content hash
/// and the time the content last changed in `.page-hashes.json`.
#[derive(Debug, Parser)]
#[command(name = "pagestamp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for pages (default: ./src)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report failures as a JSON object on stderr
    #[arg(long)]
    pub json_errors: bool,
}
