//! Local filesystem snapshot storage.
//!
//! Persists the snapshot as a single CSV file with a `source,id,name,price`
//! header. The file is rewritten wholesale on every save. State files from
//! the earlier script, whose first column is headed `url`, load unchanged.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ItemRecord;
use crate::storage::{Snapshot, SnapshotStore};

/// Column order of the snapshot file.
pub const HEADER: [&str; 4] = ["source", "id", "name", "price"];

/// CSV file snapshot backend.
#[derive(Debug, Clone)]
pub struct CsvSnapshotStore {
    path: PathBuf,
}

impl CsvSnapshotStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse every row, returning `None` if the file doesn't exist.
    pub async fn load_records(&self) -> Result<Option<Vec<ItemRecord>>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };
        decode(&bytes).map(Some)
    }

    /// Sibling temp file: the full file name with `.tmp` appended.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for CsvSnapshotStore {
    async fn load(&self) -> Result<Snapshot> {
        match self.load_records().await? {
            Some(records) => Ok(Snapshot::from_records(&records)),
            None => {
                log::info!("No snapshot at {}, starting fresh", self.path.display());
                Ok(Snapshot::new())
            }
        }
    }

    async fn save(&self, records: &[ItemRecord]) -> Result<()> {
        let bytes = encode(records)?;
        self.write_bytes(&bytes).await?;
        log::debug!("Saved {} rows to {}", records.len(), self.path.display());
        Ok(())
    }
}

fn decode(bytes: &[u8]) -> Result<Vec<ItemRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

fn encode(records: &[ItemRecord]) -> Result<Vec<u8>> {
    // Header is written by hand so an empty snapshot still has one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.into_inner().map_err(|e| AppError::Io(e.into_error()))
}
