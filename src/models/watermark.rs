//! Watermark value type.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The timestamp of the most recently delivered incident.
///
/// This is the system's sole persisted progress marker. It is read whole at
/// the start of every cycle and written whole after each confirmed delivery,
/// and only ever advances to a just-delivered incident's own timestamp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Watermark {
    #[serde(rename = "last_delivered_timestamp")]
    pub last_delivered: NaiveDateTime,
}

impl Watermark {
    pub fn new(last_delivered: NaiveDateTime) -> Self {
        Self { last_delivered }
    }
}

impl From<NaiveDateTime> for Watermark {
    fn from(last_delivered: NaiveDateTime) -> Self {
        Self::new(last_delivered)
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.last_delivered.format("%Y-%m-%d %H:%M:%S"))
    }
}
