//! Storage abstractions for snapshot persistence.
//!
//! A snapshot is the set of item ids known per source as of the last
//! completed cycle. It is stored as flat rows and regrouped on load.
//!
//! ## File Layout
//!
//! ```text
//! source,id,name,price
//! https://shop.example/new,1001,Nissan GT-R,Rs. 899
//! https://shop.example/new,9e107d9d372bb6826bd81d3542a419d6,Porsche 911,Rs. 1099
//! ```

pub mod local;

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ItemRecord;

// Re-export for convenience
pub use local::CsvSnapshotStore;

/// Known item ids grouped by source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    sources: BTreeMap<String, HashSet<String>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group flat records by source, collapsing duplicate ids.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ItemRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(&record.source, &record.id);
        }
        snapshot
    }

    pub fn insert(&mut self, source: &str, id: &str) {
        self.sources
            .entry(source.to_string())
            .or_default()
            .insert(id.to_string());
    }

    /// Ids known for `source`, if the source has been seen before.
    pub fn ids(&self, source: &str) -> Option<&HashSet<String>> {
        self.sources.get(source)
    }

    /// Iterate sources and their id sets in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Total distinct ids across all sources.
    pub fn id_count(&self) -> usize {
        self.sources.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the last saved snapshot. A store that was never written yields
    /// an empty snapshot; unreadable data is an error.
    async fn load(&self) -> Result<Snapshot>;

    /// Replace the stored snapshot with exactly `records`, one row each.
    async fn save(&self, records: &[ItemRecord]) -> Result<()>;
}
