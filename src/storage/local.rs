//! Local filesystem watermark store.
//!
//! A single JSON file of the shape
//! `{ "last_delivered_timestamp": "..." }`, written atomically (temp file,
//! then rename) so a crash mid-write can never leave a torn watermark.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Watermark;
use crate::storage::WatermarkStore;

/// File-backed watermark storage.
#[derive(Debug, Clone)]
pub struct LocalWatermarkStore {
    path: PathBuf,
}

impl LocalWatermarkStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WatermarkStore for LocalWatermarkStore {
    async fn load(&self) -> Result<Option<Watermark>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn store(&self, watermark: &Watermark) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(watermark)?;
        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
