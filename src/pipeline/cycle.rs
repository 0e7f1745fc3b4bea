// src/pipeline/cycle.rs

//! One fetch → parse → diff → dispatch pass.

use crate::config::Config;
use crate::error::Result;
use crate::models::Snapshot;
use crate::pipeline::diff;
use crate::pipeline::dispatch::Dispatcher;
use crate::services::parser::{self, ParseWarning};
use crate::services::{FeedFetcher, NotificationSink};
use crate::storage::WatermarkStore;

/// Summary of a completed cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Data rows seen in the snapshot, malformed ones included
    pub total_rows: usize,

    /// Rows dropped with a warning
    pub malformed_rows: usize,

    /// Incidents identified as new
    pub fresh: usize,

    /// Incidents confirmed delivered
    pub delivered: usize,

    /// True when an absent watermark was established without deliveries
    pub baselined: bool,
}

/// Run a full cycle against the live feed.
pub async fn run_cycle(
    config: &Config,
    fetcher: &FeedFetcher,
    store: &dyn WatermarkStore,
    sink: &dyn NotificationSink,
) -> Result<CycleReport> {
    let bytes = fetcher.fetch().await?;
    let (snapshot, warnings) = parser::parse_snapshot(&bytes)?;
    process_snapshot(config, snapshot, warnings, store, sink).await
}

/// Diff and dispatch an already-parsed snapshot.
///
/// The watermark is an explicit value loaded here and threaded through the
/// stages; the only process-wide lifecycle is "load at cycle start, persist
/// after each delivery".
pub(crate) async fn process_snapshot(
    config: &Config,
    snapshot: Snapshot,
    warnings: Vec<ParseWarning>,
    store: &dyn WatermarkStore,
    sink: &dyn NotificationSink,
) -> Result<CycleReport> {
    for warning in &warnings {
        log::warn!("Dropped feed row: {}", warning);
    }

    let mut report = CycleReport {
        total_rows: snapshot.total_rows,
        malformed_rows: warnings.len(),
        ..CycleReport::default()
    };

    // The status indicator is cosmetic; its failure must not abort the cycle.
    let status = format!("Počet výjezdů: {}", snapshot.total_rows);
    if let Err(error) = sink.update_status(&status).await {
        log::warn!("Status update failed: {}", error);
    }

    let watermark = store.load().await?;

    if watermark.is_none() && config.poll.baseline_on_first_run {
        // First-run policy: treat the current snapshot as historical
        // baseline instead of flooding the sink.
        if let Some(baseline) = diff::baseline(&snapshot.incidents) {
            log::info!(
                "First run: baselining watermark at {} without delivering",
                baseline
            );
            store.store(&baseline).await?;
            report.baselined = true;
        }
        return Ok(report);
    }

    let fresh = diff::select_new(&snapshot.incidents, watermark);
    report.fresh = fresh.len();
    if fresh.is_empty() {
        log::info!("No new incidents ({} rows in snapshot)", snapshot.total_rows);
        return Ok(report);
    }

    log::info!("{} new incidents found", fresh.len());
    let outcome = Dispatcher::new(sink, store, &config.sink)
        .dispatch_all(&fresh)
        .await;
    report.delivered = outcome.delivered;

    match outcome.error {
        Some(error) => Err(error),
        None => Ok(report),
    }
}
