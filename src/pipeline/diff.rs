// src/pipeline/diff.rs

//! Diff calculation between a feed snapshot and the delivery watermark.
//!
//! Selects the incidents strictly newer than the watermark and orders them
//! chronologically. The ordering matters: the watermark advances per
//! delivery using each delivered incident's own timestamp, so delivering out
//! of order would let an earlier incident's watermark write retroactively
//! forget a later one.

use crate::models::{Incident, Watermark};

/// Incidents strictly newer than the watermark, oldest first.
///
/// The feed makes no ordering promise, so the result is sorted here; the
/// sort is stable, which keeps input order within equal timestamps. With no
/// watermark every incident qualifies — the first-run policy (baseline vs.
/// deliver-all) is the caller's decision.
pub fn select_new(snapshot: &[Incident], watermark: Option<Watermark>) -> Vec<Incident> {
    let mut fresh: Vec<Incident> = snapshot
        .iter()
        .filter(|incident| watermark.is_none_or(|w| incident.timestamp > w.last_delivered))
        .cloned()
        .collect();

    fresh.sort_by_key(|incident| incident.timestamp);
    fresh
}

/// The maximum timestamp in the snapshot, for cold-start baselining.
pub fn baseline(snapshot: &[Incident]) -> Option<Watermark> {
    snapshot
        .iter()
        .map(|incident| incident.timestamp)
        .max()
        .map(Watermark::new)
}
