// src/lib.rs

//! Stock watcher library: polls product listing pages and alerts on new items.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
