//! Cache entry definitions.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Last known state of a single page.
///
/// The record is kept as the raw JSON value read from disk. Only `hash` is
/// ever interpreted; an unchanged page is written back exactly as it was
/// read, including any field this tool does not know about. Values that are
/// not objects, or lack a string `hash`, never match and are replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRecord(Value);

impl PageRecord {
    /// Build a `{hash, lastChanged}` record.
    #[must_use]
    pub fn new(hash: impl Into<String>, last_changed: impl Into<String>) -> Self {
        Self(serde_json::json!({
            "hash": hash.into(),
            "lastChanged": last_changed.into(),
        }))
    }

    /// Record a page whose content changed at `now`.
    #[must_use]
    pub fn changed(hash: String, now: DateTime<Utc>) -> Self {
        Self::new(hash, format_timestamp(now))
    }

    /// Lowercase hex SHA-256 of the page content, if the record has one.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.0.get("hash").and_then(Value::as_str)
    }

    /// ISO-8601 instant of the last observed content change, if present.
    #[must_use]
    pub fn last_changed(&self) -> Option<&str> {
        self.0.get("lastChanged").and_then(Value::as_str)
    }

    /// Whether this record still describes content with the given hash.
    #[must_use]
    pub fn matches(&self, hash: &str) -> bool {
        self.hash() == Some(hash)
    }

    /// The record as stored.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Format an instant as ISO-8601 UTC with millisecond precision,
/// e.g. `2025-01-02T03:04:05.678Z`.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
