//! Utility functions and helpers.

pub mod http;
pub mod identity;

pub use identity::{fallback_id, resolve_id};
