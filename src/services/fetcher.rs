// src/services/fetcher.rs

//! Listing page fetcher.
//!
//! Fetches a product listing page and extracts one [`ItemRecord`] per
//! product card using the configured CSS selectors.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{CompiledSelectors, ItemRecord, ListingSelectors};
use crate::utils::{http, resolve_id};

/// Source of current item records for a listing address.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Return every item currently visible at `source`.
    async fn fetch(&self, source: &str) -> Result<Vec<ItemRecord>>;
}

/// Fetches listing pages over HTTP and scrapes product cards.
pub struct ListingFetcher {
    client: Client,
    selectors: ListingSelectors,
    compiled: CompiledSelectors,
}

impl ListingFetcher {
    /// Create a fetcher, validating the selectors up front.
    pub fn new(client: Client, selectors: ListingSelectors) -> Result<Self> {
        let compiled = selectors.compile()?;
        Ok(Self {
            client,
            selectors,
            compiled,
        })
    }

    /// Extract item records from a parsed listing page.
    pub fn parse_listing(&self, document: &Html, source: &str) -> Vec<ItemRecord> {
        document
            .select(&self.compiled.item)
            .map(|card| self.parse_card(&card, source))
            .collect()
    }

    fn parse_card(&self, card: &ElementRef, source: &str) -> ItemRecord {
        let name = first_text(card, &self.compiled.name)
            .unwrap_or_else(|| self.selectors.missing_name.clone());
        let price = first_text(card, &self.compiled.price)
            .unwrap_or_else(|| self.selectors.missing_price.clone());
        let native = card.value().attr(&self.selectors.id_attribute);
        let id = resolve_id(native, &name, &price);

        ItemRecord {
            source: source.to_string(),
            id,
            name,
            price,
        }
    }
}

#[async_trait]
impl SourceFetcher for ListingFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<ItemRecord>> {
        let document = http::fetch_page(&self.client, source).await?;
        let items = self.parse_listing(&document, source);
        log::debug!("Parsed {} items from {}", items.len(), source);
        Ok(items)
    }
}

/// Trimmed text of the first element matching `selector` inside `card`.
fn first_text(card: &ElementRef, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
