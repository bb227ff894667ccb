//! Per-cycle outcome, reported by the change detector.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What happened to the alert for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyOutcome {
    /// Nothing new, nothing sent
    NotNeeded,
    /// Alert handed to the notifier successfully
    Delivered,
    /// Notifier returned an error; the items will not be announced again
    Failed,
}

/// Result of checking a single source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    /// Records returned by the fetcher, duplicates included
    pub item_count: usize,
    /// Distinct ids not present in the previous snapshot
    pub new_count: usize,
    /// The fetch errored and the source was treated as empty
    pub fetch_failed: bool,
    pub notification: NotifyOutcome,
}

/// Result of one full pass over all sources.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// False when the previous snapshot could not be read and was treated as empty
    pub snapshot_loaded: bool,
    /// False when writing the new snapshot failed
    pub snapshot_saved: bool,
    pub sources: Vec<SourceReport>,
}

impl CycleReport {
    /// Total new items across all sources.
    pub fn new_items(&self) -> usize {
        self.sources.iter().map(|s| s.new_count).sum()
    }

    /// Total records fetched across all sources.
    pub fn total_items(&self) -> usize {
        self.sources.iter().map(|s| s.item_count).sum()
    }

    /// Number of alerts that were delivered.
    pub fn alerts_delivered(&self) -> usize {
        self.count_outcome(NotifyOutcome::Delivered)
    }

    /// Number of alerts the notifier rejected.
    pub fn alerts_failed(&self) -> usize {
        self.count_outcome(NotifyOutcome::Failed)
    }

    pub fn fetch_failures(&self) -> usize {
        self.sources.iter().filter(|s| s.fetch_failed).count()
    }

    fn count_outcome(&self, outcome: NotifyOutcome) -> usize {
        self.sources
            .iter()
            .filter(|s| s.notification == outcome)
            .count()
    }
}
