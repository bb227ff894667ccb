// src/pipeline/scheduler.rs

//! Fixed-interval polling loop.

use std::time::Duration;

use crate::models::{CycleReport, MonitorConfig};
use crate::pipeline::ChangeDetector;

/// Runs one detection cycle per tick, sleeping a fixed interval after each.
///
/// Cycle starts are therefore at least `interval` apart; slow sources push
/// the next start back further.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_config(monitor: &MonitorConfig) -> Self {
        Self::new(monitor.poll_interval())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one cycle, log its summary, then sleep.
    pub async fn tick(&self, detector: &ChangeDetector) -> CycleReport {
        let report = detector.run_cycle().await;
        log::info!(
            "Cycle done: {} items, {} new, {} alerts sent, {} alerts failed, {} fetch failures",
            report.total_items(),
            report.new_items(),
            report.alerts_delivered(),
            report.alerts_failed(),
            report.fetch_failures()
        );
        log::debug!("Sleeping {}s", self.interval.as_secs());
        tokio::time::sleep(self.interval).await;
        report
    }

    /// Poll until the process is killed. Never returns.
    pub async fn run_forever(&self, detector: &ChangeDetector) {
        log::info!(
            "Watching {} sources every {}s",
            detector.sources().len(),
            self.interval.as_secs()
        );
        loop {
            self.tick(detector).await;
        }
    }
}
