//! Data model types.

mod incident;
mod watermark;

pub use incident::{FEED_TIMESTAMP_FORMAT, Incident, Snapshot};
pub use watermark::Watermark;
