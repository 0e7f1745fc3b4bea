// src/pipeline/dispatch.rs

//! Notification dispatch with per-delivery watermark persistence.
//!
//! The ordering inside [`Dispatcher::dispatch_all`] is the linchpin of the
//! at-least-once/no-skip guarantee: the watermark is written only after the
//! sink confirmed a delivery, and before the next incident is touched. A
//! crash between delivery and write redelivers one incident next cycle; a
//! crash before delivery loses nothing.

use crate::config::SinkConfig;
use crate::error::AppError;
use crate::models::{Incident, Watermark};
use crate::services::message;
use crate::services::sink::NotificationSink;
use crate::storage::WatermarkStore;

/// Result of one dispatch batch.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Incidents confirmed delivered, in order
    pub delivered: usize,

    /// The failure that stopped the batch, if any
    pub error: Option<AppError>,
}

/// Delivers new incidents to the sink, advancing the watermark per delivery.
pub struct Dispatcher<'a> {
    sink: &'a dyn NotificationSink,
    store: &'a dyn WatermarkStore,
    sink_config: &'a SinkConfig,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        sink: &'a dyn NotificationSink,
        store: &'a dyn WatermarkStore,
        sink_config: &'a SinkConfig,
    ) -> Self {
        Self {
            sink,
            store,
            sink_config,
        }
    }

    /// Deliver `fresh` (already in chronological order) one by one. Stops at
    /// the first failure; the watermark is never advanced past a failed
    /// incident, so the remainder re-surfaces as new next cycle.
    pub async fn dispatch_all(&self, fresh: &[Incident]) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        for incident in fresh {
            let message = message::render(incident, self.sink_config);
            if let Err(error) = self.sink.send(&message).await {
                log::warn!(
                    "Delivery failed for incident at {}: {}",
                    incident.timestamp,
                    error
                );
                outcome.error = Some(error);
                return outcome;
            }

            if let Err(error) = self.store.store(&Watermark::new(incident.timestamp)).await {
                log::error!(
                    "Watermark write failed after delivery at {}: {}",
                    incident.timestamp,
                    error
                );
                outcome.error = Some(error);
                return outcome;
            }

            log::info!("Delivered incident from {}", incident.timestamp);
            outcome.delivered += 1;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{MemoryStore, RecordingSink, incident};

    fn batch(timestamps: &[&str]) -> Vec<Incident> {
        timestamps.iter().map(|ts| incident(ts)).collect()
    }

    #[tokio::test]
    async fn delivers_all_and_lands_on_the_last_timestamp() {
        let sink = RecordingSink::default();
        let store = MemoryStore::default();
        let config = SinkConfig::default();

        let fresh = batch(&[
            "2026-03-05 14:10:00",
            "2026-03-05 14:20:00",
            "2026-03-05 14:30:00",
        ]);
        let outcome = Dispatcher::new(&sink, &store, &config)
            .dispatch_all(&fresh)
            .await;

        assert_eq!(outcome.delivered, 3);
        assert!(outcome.error.is_none());
        assert_eq!(sink.sent.lock().unwrap().len(), 3);
        assert_eq!(
            store.current(),
            Some(incident("2026-03-05 14:30:00").timestamp.into())
        );
    }

    #[tokio::test]
    async fn failure_mid_batch_stops_without_skipping() {
        let sink = RecordingSink {
            fail_on: Some(3),
            ..RecordingSink::default()
        };
        let store = MemoryStore::default();
        let config = SinkConfig::default();

        let fresh = batch(&[
            "2026-03-05 14:10:00",
            "2026-03-05 14:20:00",
            "2026-03-05 14:30:00",
            "2026-03-05 14:40:00",
            "2026-03-05 14:50:00",
        ]);
        let outcome = Dispatcher::new(&sink, &store, &config)
            .dispatch_all(&fresh)
            .await;

        assert_eq!(outcome.delivered, 2);
        assert!(matches!(outcome.error, Some(AppError::SinkUnavailable(_))));
        // Watermark sits at the last confirmed delivery, so records 3-5 are
        // re-identified as new by the next diff.
        assert_eq!(
            store.current(),
            Some(incident("2026-03-05 14:20:00").timestamp.into())
        );

        let redelivery = crate::pipeline::diff::select_new(&fresh, store.current());
        let order: Vec<_> = redelivery.iter().map(|i| i.timestamp).collect();
        assert_eq!(
            order,
            vec![
                incident("2026-03-05 14:30:00").timestamp,
                incident("2026-03-05 14:40:00").timestamp,
                incident("2026-03-05 14:50:00").timestamp,
            ]
        );
    }

    #[tokio::test]
    async fn watermark_history_is_monotonic() {
        let sink = RecordingSink::default();
        let store = MemoryStore::default();
        let config = SinkConfig::default();

        let fresh = batch(&[
            "2026-03-05 14:10:00",
            "2026-03-05 14:20:00",
            "2026-03-05 14:30:00",
        ]);
        Dispatcher::new(&sink, &store, &config)
            .dispatch_all(&fresh)
            .await;

        let history = store.history.lock().unwrap();
        assert!(history.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let sink = RecordingSink::default();
        let store = MemoryStore::default();
        let config = SinkConfig::default();

        let outcome = Dispatcher::new(&sink, &store, &config)
            .dispatch_all(&[])
            .await;

        assert_eq!(outcome.delivered, 0);
        assert!(outcome.error.is_none());
        assert_eq!(store.current(), None);
    }
}
