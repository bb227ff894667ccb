//! Service layer for the stock watcher.
//!
//! This module contains the I/O collaborators of the change detector:
//! - Listing fetching (`SourceFetcher`, `ListingFetcher`)
//! - Alert delivery (`Notifier`, `WebhookNotifier`)

mod fetcher;
mod notifier;

pub use fetcher::{ListingFetcher, SourceFetcher};
pub use notifier::{Notifier, WebhookNotifier};
