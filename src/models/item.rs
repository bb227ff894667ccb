//! Item record data structure.

use serde::{Deserialize, Serialize};

/// A single product observation from one source in one cycle.
///
/// Field order is the snapshot column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRecord {
    /// Listing page the item was seen on. Older state files call it `url`.
    #[serde(alias = "url")]
    pub source: String,

    /// Stable identity of the listing
    pub id: String,

    /// Display name
    pub name: String,

    /// Display price, verbatim from the page
    pub price: String,
}

impl ItemRecord {
    pub fn new(
        source: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            id: id.into(),
            name: name.into(),
            price: price.into(),
        }
    }

    /// Format the record as one alert bullet.
    pub fn bullet(&self) -> String {
        format!("• {} - {}", self.name, self.price)
    }
}
