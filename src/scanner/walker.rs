//! Directory walker implementation using walkdir for sequential traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a page tree and
//! collecting the absolute paths of every page file. Traversal is strictly
//! sequential and follows the directory listing order the operating system
//! returns at each level; no sorting is applied.
//!
//! Any error (missing root, unreadable directory, broken entry) aborts the
//! walk. Callers never see a partial list.
//!
//! # Example
//!
//! ```no_run
//! use pagestamp::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/site/src"), WalkerConfig::default());
//! let pages = walker.find_pages()?;
//! println!("Found {} pages", pages.len());
//! # Ok::<(), pagestamp::scanner::ScanError>(())
//! ```

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{ScanError, WalkerConfig};

/// Directory walker for page discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root directory.
    ///
    /// The root should already be absolute; discovered paths are joined onto
    /// it as-is.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Collect every page file under the root.
    ///
    /// The full list is materialized before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] or [`ScanError::NotADirectory`] if the
    /// root is unusable, and the first traversal error otherwise.
    pub fn find_pages(&self) -> Result<Vec<PathBuf>, ScanError> {
        self.check_root()?;
        let pages = self.walk().collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "Discovered {} page(s) named {} under {}",
            pages.len(),
            self.config.page_name,
            self.root.display()
        );
        Ok(pages)
    }

    /// Walk the directory tree, yielding page paths.
    ///
    /// Errors are yielded in place; [`find_pages`](Self::find_pages) stops at
    /// the first one.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.page_path(&entry).map(Ok),
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Verify the root exists and is a directory.
    fn check_root(&self) -> Result<(), ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::NotADirectory(self.root.clone())),
            Err(e) => Err(Self::handle_io_error(&self.root, e)),
        }
    }

    /// Return the entry path if the entry is a page file.
    fn page_path(&self, entry: &DirEntry) -> Option<PathBuf> {
        if entry.file_name() != self.config.page_name.as_str() {
            return None;
        }

        let file_type = entry.file_type();
        let is_page = if file_type.is_symlink() {
            // Unfollowed link: include it only when it resolves to a file
            entry.path().is_file()
        } else {
            file_type.is_file()
        };

        if is_page {
            log::trace!("Found page: {}", entry.path().display());
            Some(entry.path().to_path_buf())
        } else {
            log::trace!("Skipping non-file named like a page: {}", entry.path().display());
            None
        }
    }

    /// Map I/O errors to scan errors.
    fn handle_io_error(path: &Path, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
            _ => ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Handle walkdir errors.
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let message = error.to_string();
        log::debug!("Walker error for {}: {}", path.display(), message);

        // Symlink loops carry no I/O error
        match error.into_io_error() {
            Some(io_error) => Self::handle_io_error(&path, io_error),
            None => ScanError::Io {
                path,
                source: std::io::Error::other(message),
            },
        }
    }
}
