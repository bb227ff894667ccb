//! In-memory collaborators for exercising the detector without I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::ItemRecord;
use crate::services::{Notifier, SourceFetcher};
use crate::storage::{Snapshot, SnapshotStore};

/// Serves canned listings per source; unknown or failed sources error.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    listings: Arc<Mutex<HashMap<String, Option<Vec<ItemRecord>>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    pub fn set(&self, source: &str, records: Vec<ItemRecord>) {
        self.listings
            .lock()
            .unwrap()
            .insert(source.to_string(), Some(records));
    }

    pub fn fail(&self, source: &str) {
        self.listings.lock().unwrap().insert(source.to_string(), None);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<ItemRecord>> {
        self.calls.lock().unwrap().push(source.to_string());
        match self.listings.lock().unwrap().get(source) {
            Some(Some(records)) => Ok(records.clone()),
            _ => Err(AppError::fetch(source, "connection reset")),
        }
    }
}

/// Records every delivered message; can be switched to fail.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(AppError::notify("webhook returned 500"));
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct StoreState {
    rows: Option<Vec<ItemRecord>>,
    fail_load: bool,
    fail_save: bool,
    saves: usize,
}

/// Snapshot store kept in memory, with switchable read/write failures.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn seed(&self, rows: Vec<ItemRecord>) {
        self.state.lock().unwrap().rows = Some(rows);
    }

    /// Rows as last written, `None` if never written.
    pub fn rows(&self) -> Option<Vec<ItemRecord>> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn save_count(&self) -> usize {
        self.state.lock().unwrap().saves
    }

    pub fn set_failing_load(&self, failing: bool) {
        self.state.lock().unwrap().fail_load = failing;
    }

    pub fn set_failing_save(&self, failing: bool) {
        self.state.lock().unwrap().fail_save = failing;
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Snapshot> {
        let state = self.state.lock().unwrap();
        if state.fail_load {
            return Err(AppError::validation("snapshot is corrupt"));
        }
        Ok(state
            .rows
            .as_ref()
            .map(|rows| Snapshot::from_records(rows))
            .unwrap_or_default())
    }

    async fn save(&self, records: &[ItemRecord]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_save {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            )));
        }
        state.rows = Some(records.to_vec());
        state.saves += 1;
        Ok(())
    }
}
