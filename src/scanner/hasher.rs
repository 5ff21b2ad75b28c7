//! SHA-256 file hasher.
//!
//! # Overview
//! Pages are small source files, so each one is read fully into memory and
//! digested in a single pass. The digest is rendered as lowercase hex, the
//! form stored in the page cache.

use sha2::{Digest, Sha256};
use std::path::Path;

use super::HashError;

/// Length of a hex-encoded SHA-256 digest.
pub const HASH_HEX_LEN: usize = 64;

/// Hash a byte slice, returning the lowercase hex digest.
#[must_use]
pub fn hash_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Read a file and hash its raw bytes.
///
/// The file handle is released before hashing starts.
///
/// # Errors
///
/// Returns a [`HashError`] if the file cannot be read.
pub fn hash_file(path: &Path) -> Result<String, HashError> {
    let content = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let hash = hash_bytes(&content);
    log::trace!("{} bytes -> {} ({})", content.len(), hash, path.display());
    Ok(hash)
}
