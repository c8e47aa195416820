use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded JSON body as returned by the feed. Shape is not controlled by
/// this crate: either a top-level array of record objects or an envelope
/// object with a `results` array.
pub type RawResponse = serde_json::Value;

/// Substituted when a record carries no usable `id`.
pub const UNKNOWN_PULSE_ID: &str = "unknown";

/// Substituted when the nested author object (or its username) is missing.
pub const ANONYMOUS_AUTHOR: &str = "anonymous";

/// The normalized shape persisted for every pulse. All fields are always
/// present; absent source fields are replaced by the documented defaults
/// during transformation, never left out of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseDocument {
    /// Source identifier, verbatim (integers rendered as strings).
    pub pulse_id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
    pub references: Vec<String>,
    pub indicator_count: i64,
    /// Source-provided modification timestamp, passed through opaquely.
    pub modified: String,
    /// Wall-clock instant of the transform call; shared by every document
    /// in one batch.
    pub ingestion_timestamp: DateTime<Utc>,
}
