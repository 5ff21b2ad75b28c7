//! Page change detection pipeline.
//!
//! One run is four stages executed strictly in order:
//!
//! 1. **Load** the previous [`PageCache`] (empty if the file is missing).
//! 2. **Find** every page under the root with [`Walker`].
//! 3. **Compare** each page's SHA-256 with its previous record, one file at
//!    a time. New or changed pages get a fresh timestamp from the [`Clock`];
//!    unchanged pages keep their previous record verbatim.
//! 4. **Write** the new cache, which holds exactly the pages found in step 2.
//!
//! Any failure aborts the run. Nothing is written unless every page was
//! hashed.
//!
//! # Example
//!
//! ```no_run
//! use pagestamp::check::PageChecker;
//! use std::path::Path;
//!
//! let cwd = Path::new("/home/user/site");
//! let summary = PageChecker::new(cwd, &cwd.join("src"), &cwd.join(".page-hashes.json"))
//!     .run()?;
//! println!("{} page(s) changed", summary.changed.len());
//! # Ok::<(), pagestamp::check::CheckError>(())
//! ```

pub mod clock;

use std::path::{Path, PathBuf};

pub use clock::{Clock, FixedClock, SystemClock};

use crate::cache::{CacheError, PageCache, PageRecord};
use crate::report::CheckReporter;
use crate::scanner::path_utils::cache_key;
use crate::scanner::{hash_file, HashError, ScanError, Walker, WalkerConfig};

/// Errors that abort a check run.
#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    /// The page tree could not be walked.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A page could not be read.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// The cache could not be loaded or written.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of pages discovered.
    pub pages: usize,
    /// Keys recorded with a new timestamp, in processing order.
    pub changed: Vec<String>,
    /// Number of pages carried forward untouched.
    pub unchanged: usize,
    /// Keys from the previous cache that no longer exist, sorted.
    pub removed: Vec<String>,
}

impl CheckSummary {
    /// Whether the run altered the cache content at all.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty() || !self.removed.is_empty()
    }
}

/// Runs the load, find, compare and write stages for one page tree.
pub struct PageChecker {
    /// Directory cache keys are relative to
    cwd: PathBuf,
    /// Directory scanned for pages
    root: PathBuf,
    /// Cache file read at start and rewritten at the end
    cache_path: PathBuf,
    walker_config: WalkerConfig,
    clock: Box<dyn Clock>,
    reporter: Option<Box<dyn CheckReporter>>,
}

impl PageChecker {
    /// Create a checker with the default walker configuration and the
    /// system clock.
    ///
    /// All three paths should be absolute.
    #[must_use]
    pub fn new(cwd: &Path, root: &Path, cache_path: &Path) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            root: root.to_path_buf(),
            cache_path: cache_path.to_path_buf(),
            walker_config: WalkerConfig::default(),
            clock: Box::new(SystemClock),
            reporter: None,
        }
    }

    /// Use a custom walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Use a custom time source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Receive per-page and completion notices.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Box<dyn CheckReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Execute a full run.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckError`] encountered. When the error comes
    /// from any stage before the write, the cache file is untouched.
    pub fn run(&self) -> Result<CheckSummary, CheckError> {
        log::debug!(
            "Checking pages under {} (cache: {})",
            self.root.display(),
            self.cache_path.display()
        );

        let previous = PageCache::load(&self.cache_path)?;
        let pages = Walker::new(&self.root, self.walker_config.clone()).find_pages()?;
        let (cache, summary) = self.compare(&previous, &pages)?;
        cache.save(&self.cache_path)?;

        log::debug!(
            "Checked {} page(s): {} changed, {} unchanged, {} removed",
            summary.pages,
            summary.changed.len(),
            summary.unchanged,
            summary.removed.len()
        );
        if let Some(reporter) = &self.reporter {
            reporter.on_complete(&summary);
        }
        Ok(summary)
    }

    /// Hash each page and build the new cache from the previous one.
    ///
    /// The returned cache contains exactly one entry per page in `pages`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Hash`] for the first page that cannot be read.
    pub fn compare(
        &self,
        previous: &PageCache,
        pages: &[PathBuf],
    ) -> Result<(PageCache, CheckSummary), CheckError> {
        let mut cache = PageCache::new();
        let mut summary = CheckSummary {
            pages: pages.len(),
            ..Default::default()
        };

        for page in pages {
            let hash = hash_file(page)?;
            let key = cache_key(page, &self.cwd);

            match previous.get(&key) {
                Some(prev) if prev.matches(&hash) => {
                    log::trace!("Unchanged: {}", key);
                    cache.insert(key, prev.clone());
                    summary.unchanged += 1;
                }
                prev => {
                    log::debug!(
                        "{}: {} -> {}",
                        key,
                        prev.and_then(PageRecord::hash).unwrap_or("(new)"),
                        hash
                    );
                    if let Some(reporter) = &self.reporter {
                        reporter.on_page_changed(&key);
                    }
                    cache.insert(key.clone(), PageRecord::changed(hash, self.clock.now()));
                    summary.changed.push(key);
                }
            }
        }

        summary.removed = previous
            .keys()
            .filter(|key| !cache.contains_key(key))
            .map(str::to_string)
            .collect();
        for key in &summary.removed {
            log::debug!("Dropping removed page: {}", key);
        }

        Ok((cache, summary))
    }
}
