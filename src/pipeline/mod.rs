//! The incremental ingestion pipeline: diff, dispatch, cycle and scheduler.

pub mod cycle;
pub mod diff;
pub mod dispatch;
pub mod scheduler;

pub use cycle::{CycleReport, run_cycle};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use scheduler::Scheduler;

#[cfg(test)]
pub(crate) mod testing;
