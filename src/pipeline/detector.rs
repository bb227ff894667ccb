// src/pipeline/detector.rs

//! Change detection cycle.
//!
//! One cycle loads the previous snapshot, walks every configured source in
//! order, alerts once per source with new items and saves what was fetched.
//! Every I/O failure is logged and absorbed so a cycle always completes:
//!
//! - unreadable snapshot: treated as empty, so everything listed is new
//! - failed fetch: the source counts as empty and its ids are dropped from
//!   the saved snapshot, so they are all reported again once it recovers
//! - failed alert: the items are still saved and will not be reported again
//! - failed save: the next cycle diffs against whatever is on disk

use chrono::{Local, Utc};

use crate::error::Result;
use crate::models::{
    Alert, Config, CycleReport, ItemRecord, MonitorConfig, NotifyConfig, NotifyOutcome,
    SourceReport, heartbeat,
};
use crate::pipeline::diff::diff_source;
use crate::services::{ListingFetcher, Notifier, SourceFetcher, WebhookNotifier};
use crate::storage::{CsvSnapshotStore, Snapshot, SnapshotStore};
use crate::utils::http;

/// Drives change detection over a fixed, ordered list of sources.
pub struct ChangeDetector {
    sources: Vec<String>,
    recipient_id: Option<String>,
    heartbeat: bool,
    fetcher: Box<dyn SourceFetcher>,
    notifier: Box<dyn Notifier>,
    store: Box<dyn SnapshotStore>,
}

impl ChangeDetector {
    pub fn new(
        monitor: &MonitorConfig,
        notify: &NotifyConfig,
        fetcher: Box<dyn SourceFetcher>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn SnapshotStore>,
    ) -> Self {
        Self {
            sources: monitor.sources.clone(),
            recipient_id: notify.recipient_id.clone(),
            heartbeat: notify.heartbeat,
            fetcher,
            notifier,
            store,
        }
    }

    /// Wire up the HTTP fetcher, webhook notifier and CSV store from config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http::create_client(&config.http)?;
        let fetcher = ListingFetcher::new(client.clone(), config.selectors.clone())?;
        let notifier = WebhookNotifier::new(client, config.notify.webhook_url.clone());
        if !notifier.is_configured() {
            log::warn!("No webhook configured; new items will only be logged");
        }
        let store = CsvSnapshotStore::new(&config.storage.state_file);

        Ok(Self::new(
            &config.monitor,
            &config.notify,
            Box::new(fetcher),
            Box::new(notifier),
            Box::new(store),
        ))
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Run one full pass over all sources and persist the result.
    pub async fn run_cycle(&self) -> CycleReport {
        let started_at = Utc::now();

        let (previous, snapshot_loaded) = match self.store.load().await {
            Ok(snapshot) => (snapshot, true),
            Err(e) => {
                log::error!("Failed to load snapshot, treating all items as new: {}", e);
                (Snapshot::new(), false)
            }
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        log::info!("Checking {} sources at {}", self.sources.len(), timestamp);
        if self.heartbeat {
            if let Err(e) = self
                .notifier
                .notify(&heartbeat(self.sources.len(), &timestamp))
                .await
            {
                log::warn!("Failed to send heartbeat: {}", e);
            }
        }

        let mut next: Vec<ItemRecord> = Vec::new();
        let mut reports = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let (records, fetch_failed) = match self.fetcher.fetch(source).await {
                Ok(records) => (records, false),
                Err(e) => {
                    log::warn!("Failed to fetch {}: {}", source, e);
                    (Vec::new(), true)
                }
            };

            let diff = diff_source(previous.ids(source), &records);
            let notification = if diff.has_new() {
                self.announce(source, diff.added.clone()).await
            } else {
                NotifyOutcome::NotNeeded
            };

            log::info!(
                "Checked {} ({} items, {} new)",
                source,
                records.len(),
                diff.added.len()
            );
            reports.push(SourceReport {
                source: source.clone(),
                item_count: records.len(),
                new_count: diff.added.len(),
                fetch_failed,
                notification,
            });

            next.extend(records);
        }

        let snapshot_saved = match self.store.save(&next).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save snapshot ({} rows): {}", next.len(), e);
                false
            }
        };

        CycleReport {
            started_at,
            finished_at: Utc::now(),
            snapshot_loaded,
            snapshot_saved,
            sources: reports,
        }
    }

    /// Send the single alert for a source's new items.
    async fn announce(&self, source: &str, added: Vec<&ItemRecord>) -> NotifyOutcome {
        let text = Alert::new(source, added).render(self.recipient_id.as_deref());
        log::info!("{}", text);

        match self.notifier.notify(&text).await {
            Ok(()) => NotifyOutcome::Delivered,
            Err(e) => {
                log::error!("Failed to deliver alert for {}: {}", source, e);
                NotifyOutcome::Failed
            }
        }
    }
}
