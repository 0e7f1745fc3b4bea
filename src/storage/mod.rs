//! Watermark persistence.
//!
//! The watermark is the single durable progress marker: the timestamp of the
//! most recently delivered incident. It is read whole at cycle start and
//! written whole after each delivery; there are no partial updates. The
//! dispatcher is the only writer, and cycles never overlap, so no further
//! access discipline is needed.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Watermark;

// Re-export for convenience
pub use local::LocalWatermarkStore;

/// Trait for watermark storage backends.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Load the persisted watermark. `None` means no prior run.
    async fn load(&self) -> Result<Option<Watermark>>;

    /// Persist the watermark. Callers only ever pass a value equal to a
    /// just-delivered incident's timestamp, so the stored value is
    /// monotonically non-decreasing under normal operation.
    async fn store(&self, watermark: &Watermark) -> Result<()>;
}
