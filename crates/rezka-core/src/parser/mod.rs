//! HTML parsers for Rezka AJAX payloads
//!
//! - `episodes`: Parse the episodes fragment returned by the `get_episodes` action

pub mod episodes;

// Re-export main parsing functions
pub use episodes::{normalize_locator, parse_catalog, parse_catalog_bytes, parse_id};
