//! Rezka Episode Catalog Core Library
//!
//! Fetches the season/episode listing for a title and translator from the
//! Rezka CDN-lookup endpoint and turns it into a queryable [`Catalog`].
//!
//! # Features
//! - Rate-limited HTTP transport with retries, behind the [`CdnTransport`] trait
//! - Response envelope validation
//! - Lenient episodes HTML parser (malformed items are skipped, not fatal)
//! - Sorted enumeration of seasons and episodes
//!
//! Locators in the catalog are raw and still need to be resolved into
//! playable URLs by the caller.

pub mod client;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{CdnTransport, ClientConfig, RateLimiter, RezkaClient};
pub use error::{Result, RezkaError};
pub use scraper::RezkaScraper;
pub use types::{Catalog, EpisodesResponse, Stream};
