//! Scanner module for page discovery and content hashing.
//!
//! This module provides functionality for:
//! - Sequential directory walking using walkdir
//! - Content hashing with SHA-256
//! - Working-directory-relative cache keys with Unicode normalization
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and page discovery
//! - [`hasher`]: SHA-256 file hashing
//! - [`path_utils`]: Lexical path cleanup and cache key derivation
//!
//! # Example
//!
//! ```no_run
//! use pagestamp::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/srv/site/src"), WalkerConfig::default());
//! for page in walker.find_pages().unwrap() {
//!     println!("{}", page.display());
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{hash_bytes, hash_file, HASH_HEX_LEN};
pub use walker::Walker;

/// File name tracked when no configuration overrides it.
pub const DEFAULT_PAGE_NAME: &str = "page.tsx";

/// Configuration for directory walking.
///
/// Controls which file name counts as a page and how links are treated.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Exact file name a page must have (compared byte-for-byte).
    pub page_name: String,

    /// Follow symbolic links into directories during traversal.
    /// Warning: May cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            page_name: DEFAULT_PAGE_NAME.to_string(),
            follow_symlinks: false,
        }
    }
}

impl WalkerConfig {
    /// Create a configuration tracking the given page file name.
    #[must_use]
    pub fn new(page_name: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            ..Default::default()
        }
    }
}

/// Failure while looking for pages.
///
/// Every variant is fatal for a run; nothing is skipped.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// A directory in the page tree could not be listed.
    #[error("Cannot list page directory (permission denied): {0}")]
    PermissionDenied(PathBuf),

    /// The page root, or a directory under it, does not exist.
    #[error("Page directory not found: {0}")]
    NotFound(PathBuf),

    /// The page root exists but is a file.
    #[error("Page root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Any other traversal failure, including symlink loops.
    #[error("Cannot walk page directory {path}: {source}")]
    Io {
        /// Entry being visited
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while reading a page for hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The page vanished between discovery and hashing.
    #[error("Page not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read page (permission denied): {0}")]
    PermissionDenied(PathBuf),

    #[error("Cannot read page {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
