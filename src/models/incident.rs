//! Incident record structure.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format the feed uses for string-typed cells and query windows.
pub const FEED_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// One incident report parsed from the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    /// Filing time; the sort key and watermark unit
    pub timestamp: NaiveDateTime,

    /// Free-form incident state text
    pub status: String,

    /// Incident type (e.g., "Požár")
    pub category: String,

    /// Descriptive detail of the incident type
    pub subcategory: String,

    /// District name
    pub region: String,

    /// Municipality name
    pub locality: String,

    /// Street, absent when the feed leaves the cell empty
    pub street: Option<String>,

    /// Note for media, absent when the feed leaves the cell empty
    pub note: Option<String>,

    /// Columns past the consumed positions, kept raw to tolerate schema drift
    #[serde(default)]
    pub extra: Vec<String>,
}

/// One cycle's full parsed view of the feed. Transient; rebuilt every cycle.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Successfully parsed incidents, in feed order
    pub incidents: Vec<Incident>,

    /// Total data rows seen, malformed ones included (status indicator only)
    pub total_rows: usize,
}
