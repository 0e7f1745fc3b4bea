//! In-memory doubles and fixtures for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::{AppError, Result};
use crate::models::{Incident, Watermark};
use crate::services::message::IncidentMessage;
use crate::services::sink::NotificationSink;
use crate::storage::WatermarkStore;

/// Build an incident with the given `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn incident(timestamp: &str) -> Incident {
    Incident {
        timestamp: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
            .expect("valid test timestamp"),
        status: "Likvidace".to_string(),
        category: "Požár".to_string(),
        subcategory: "Požár nízké budovy".to_string(),
        region: "Jihlava".to_string(),
        locality: "Jihlava".to_string(),
        street: None,
        note: None,
        extra: Vec::new(),
    }
}

/// Watermark store that keeps its full write history for assertions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub history: Mutex<Vec<Watermark>>,
}

impl MemoryStore {
    pub fn with_watermark(watermark: Watermark) -> Self {
        Self {
            history: Mutex::new(vec![watermark]),
        }
    }

    pub fn current(&self) -> Option<Watermark> {
        self.history.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl WatermarkStore for MemoryStore {
    async fn load(&self) -> Result<Option<Watermark>> {
        Ok(self.current())
    }

    async fn store(&self, watermark: &Watermark) -> Result<()> {
        self.history.lock().unwrap().push(*watermark);
        Ok(())
    }
}

/// Sink that records deliveries and can fail on a chosen send.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<IncidentMessage>>,
    pub statuses: Mutex<Vec<String>>,
    /// 1-based index of the send that should fail
    pub fail_on: Option<usize>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, message: &IncidentMessage) -> Result<()> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_on == Some(sent.len() + 1) {
            return Err(AppError::sink_unavailable("sink down"));
        }
        sent.push(message.clone());
        Ok(())
    }

    async fn update_status(&self, status: &str) -> Result<()> {
        self.statuses.lock().unwrap().push(status.to_string());
        Ok(())
    }
}
