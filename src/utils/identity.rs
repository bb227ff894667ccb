// src/utils/identity.rs

//! Stable item identity.
//!
//! Shops that tag their product cards with an id get that id back verbatim.
//! Everything else is identified by an MD5 digest of name and price, which
//! means a price reformat on an unchanged listing produces a new id. Changing
//! the digest scheme invalidates every fallback id already on disk.

use md5::{Digest, Md5};

/// Resolve the id for a record, preferring the shop's own identifier.
pub fn resolve_id(native: Option<&str>, name: &str, price: &str) -> String {
    match native.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => fallback_id(name, price),
    }
}

/// Content-derived id: hex MD5 of `name` immediately followed by `price`.
pub fn fallback_id(name: &str, price: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(name.as_bytes());
    hasher.update(price.as_bytes());
    hex::encode(hasher.finalize())
}
