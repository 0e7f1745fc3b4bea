// src/pipeline/scheduler.rs

//! Fixed-interval poll loop with failure backoff and graceful shutdown.
//!
//! Cycles never overlap: one runs to completion (or its first failing
//! stage) before the next begins. The shutdown signal is honored only at
//! the sleep boundary, never mid-delivery, so in-flight watermark writes
//! always finish.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use crate::config::{Config, PollConfig};
use crate::error::Result;
use crate::pipeline::cycle::{CycleReport, run_cycle};
use crate::services::{FeedFetcher, NotificationSink};
use crate::storage::WatermarkStore;

/// Drives fetch → parse → diff → dispatch cycles forever.
pub struct Scheduler<'a> {
    config: &'a Config,
    fetcher: &'a FeedFetcher,
    store: &'a dyn WatermarkStore,
    sink: &'a dyn NotificationSink,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        config: &'a Config,
        fetcher: &'a FeedFetcher,
        store: &'a dyn WatermarkStore,
        sink: &'a dyn NotificationSink,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
            sink,
        }
    }

    /// Run cycles until the shutdown signal flips.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) {
        run_loop(&self.config.poll, shutdown, || {
            run_cycle(self.config, self.fetcher, self.store, self.sink)
        })
        .await;
    }
}

/// The poll loop itself, generic over the cycle so it can be exercised
/// without a live feed.
pub(crate) async fn run_loop<F, Fut>(
    poll: &PollConfig,
    mut shutdown: watch::Receiver<bool>,
    mut cycle: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<CycleReport>>,
{
    let steady = Duration::from_secs(poll.interval_secs);
    let max = Duration::from_secs(poll.backoff_max_secs);
    let mut consecutive_failures: u32 = 0;

    loop {
        // Each cycle is independent: failures are logged and the loop
        // simply sleeps and tries the whole cycle again.
        match cycle().await {
            Ok(report) => {
                consecutive_failures = 0;
                log::debug!(
                    "Cycle complete: {} rows, {} new, {} delivered",
                    report.total_rows,
                    report.fresh,
                    report.delivered
                );
            }
            Err(error) => {
                consecutive_failures = consecutive_failures.saturating_add(1);
                log::error!("Cycle failed ({} in a row): {}", consecutive_failures, error);
            }
        }

        let delay = backoff_delay(steady, max, consecutive_failures);
        tokio::select! {
            _ = sleep(delay) => {}
            _ = shutdown.changed() => {
                log::info!("Shutdown requested; stopping poll loop");
                break;
            }
        }
    }
}

/// Steady interval on success; doubled per consecutive failure, capped at
/// `max`, so an outage is not hammered at full poll rate.
fn backoff_delay(steady: Duration, max: Duration, consecutive_failures: u32) -> Duration {
    if consecutive_failures <= 1 {
        return steady;
    }
    let factor = 2u32.saturating_pow((consecutive_failures - 1).min(10));
    steady.saturating_mul(factor).min(max)
}
