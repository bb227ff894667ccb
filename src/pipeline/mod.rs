//! Change detection pipeline.
//!
//! - `diff_source`: new records of one source against its previous ids
//! - `ChangeDetector::run_cycle`: one full pass over all sources
//! - `Scheduler`: the fixed-interval loop around `run_cycle`

pub mod detector;
pub mod diff;
pub mod scheduler;
#[cfg(test)]
pub(crate) mod testing;

pub use detector::ChangeDetector;
pub use diff::{SourceDiff, diff_source};
pub use scheduler::Scheduler;
