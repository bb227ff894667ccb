// src/models/mod.rs

//! Domain models for the stock watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod alert;
mod config;
mod item;
mod report;
mod selectors;

// Re-export all public types
pub use alert::{Alert, heartbeat};
pub use config::{
    Config, ENV_POLL_INTERVAL, ENV_RECIPIENT_ID, ENV_STATE_FILE, ENV_WEBHOOK_URL, HttpConfig,
    MonitorConfig, NotifyConfig, StorageConfig,
};
pub use item::ItemRecord;
pub use report::{CycleReport, NotifyOutcome, SourceReport};
pub use selectors::{CompiledSelectors, ListingSelectors};
