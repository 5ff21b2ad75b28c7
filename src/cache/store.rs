//! JSON-backed page cache.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::entry::PageRecord;

/// Cache file name used when no configuration overrides it.
pub const DEFAULT_CACHE_FILE: &str = ".page-hashes.json";

/// Errors raised while reading or writing the cache file.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// The cache file exists but could not be read.
    #[error("Failed to read page cache {path}: {source}")]
    Read {
        /// Cache file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The cache file is not a JSON object.
    #[error("Malformed page cache {path}: {source}")]
    Parse {
        /// Cache file path
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The mapping could not be serialized.
    #[error("Failed to serialize page cache: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Writing or replacing the cache file failed.
    #[error("Failed to write page cache {path}: {source}")]
    Write {
        /// Path that was being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Mapping from relative page path to its [`PageRecord`].
///
/// Keys are kept sorted so that identical content always serializes to
/// identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCache {
    pages: BTreeMap<String, PageRecord>,
}

impl PageCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache from `path`.
    ///
    /// A missing file yields an empty cache. The file must hold a JSON
    /// object; its values are taken as-is and only their `hash` is ever
    /// read. An unreadable file, invalid JSON or a non-object top level is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] or [`CacheError::Parse`].
    pub fn load(path: &Path) -> CacheResult<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No page cache at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let cache: Self = serde_json::from_slice(&bytes).map_err(|e| CacheError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::debug!(
            "Loaded {} cached page(s) from {}",
            cache.len(),
            path.display()
        );
        Ok(cache)
    }

    /// Serialize to pretty JSON (two-space indent) with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> CacheResult<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(CacheError::Serialize)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the cache to `path`, replacing any previous content.
    ///
    /// The JSON goes to a temporary sibling first and is renamed into place,
    /// so a failed write leaves the previous cache intact.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the temporary file cannot be written
    /// or renamed.
    pub fn save(&self, path: &Path) -> CacheResult<()> {
        let json = self.to_json()?;
        let temp_path = temp_sibling(path);

        std::fs::write(&temp_path, json.as_bytes()).map_err(|e| CacheError::Write {
            path: temp_path.clone(),
            source: e,
        })?;

        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(CacheError::Write {
                path: path.to_path_buf(),
                source: e,
            });
        }

        log::debug!("Wrote {} page(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Look up the record for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PageRecord> {
        self.pages.get(key)
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&mut self, key: String, record: PageRecord) -> Option<PageRecord> {
        self.pages.insert(key, record)
    }

    /// Whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pages.contains_key(key)
    }

    /// Number of pages recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the cache holds no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate over keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Iterate over `(key, record)` pairs in sorted key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PageRecord> {
        self.pages.iter()
    }
}

impl<'a> IntoIterator for &'a PageCache {
    type Item = (&'a String, &'a PageRecord);
    type IntoIter = btree_map::Iter<'a, String, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl FromIterator<(String, PageRecord)> for PageCache {
    fn from_iter<I: IntoIterator<Item = (String, PageRecord)>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

/// Temporary sibling of `path` in the same directory, so the final rename
/// stays on one filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| "page-cache".to_string(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
