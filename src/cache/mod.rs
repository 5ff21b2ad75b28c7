//! Page cache module for pagestamp.
//!
//! This module holds the tool's only durable state: for every page found on
//! the previous run, the SHA-256 of its content and the instant that content
//! was last seen to change.
//!
//! # Architecture
//!
//! The cache is split into two components:
//!
//! * [`entry`]: The per-page record and its timestamp format.
//! * [`store`]: The in-memory mapping plus JSON load/save.
//!
//! # Format
//!
//! The cache file is a single JSON object keyed by working-directory-relative
//! page path, written with two-space indentation:
//!
//! ```json
//! {
//!   "src/blog/page.tsx": {
//!     "hash": "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
//!     "lastChanged": "2025-03-14T09:26:53.589Z"
//!   }
//! }
//! ```
//!
//! There is no version field; the file is rewritten in full on every run.

pub mod entry;
pub mod store;

pub use entry::{format_timestamp, PageRecord};
pub use store::{CacheError, CacheResult, PageCache, DEFAULT_CACHE_FILE};
