// src/models/selectors.rs

//! CSS selectors for scraping a product listing page.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors for scraping a product listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Selector for each product card on the page
    #[serde(default = "defaults::item_selector")]
    pub item_selector: String,

    /// Attribute on the card carrying the shop's own product id
    #[serde(default = "defaults::id_attribute")]
    pub id_attribute: String,

    /// Selector for the product name within a card
    #[serde(default = "defaults::name_selector")]
    pub name_selector: String,

    /// Selector for the price within a card
    #[serde(default = "defaults::price_selector")]
    pub price_selector: String,

    /// Name used when a card has no name element
    #[serde(default = "defaults::missing_name")]
    pub missing_name: String,

    /// Price used when a card has no price element
    #[serde(default = "defaults::missing_price")]
    pub missing_price: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item_selector: defaults::item_selector(),
            id_attribute: defaults::id_attribute(),
            name_selector: defaults::name_selector(),
            price_selector: defaults::price_selector(),
            missing_name: defaults::missing_name(),
            missing_price: defaults::missing_price(),
        }
    }
}

impl ListingSelectors {
    /// Parse every selector, failing on the first invalid one.
    pub fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            item: parse_selector(&self.item_selector)?,
            name: parse_selector(&self.name_selector)?,
            price: parse_selector(&self.price_selector)?,
        })
    }
}

/// Parsed form of [`ListingSelectors`], ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub item: Selector,
    pub name: Selector,
    pub price: Selector,
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

mod defaults {
    pub fn item_selector() -> String {
        "div.show-product-small-bx".into()
    }
    pub fn id_attribute() -> String {
        "data-latest".into()
    }
    pub fn name_selector() -> String {
        "h3".into()
    }
    pub fn price_selector() -> String {
        "span.rs".into()
    }
    pub fn missing_name() -> String {
        "Unknown Product".into()
    }
    pub fn missing_price() -> String {
        "Price N/A".into()
    }
}
