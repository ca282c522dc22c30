//! Main Rezka scraper API
//!
//! Combines a [`CdnTransport`] with the episodes parser: fetch the
//! `get_episodes` envelope, validate it, and build a [`Catalog`] from its
//! HTML fragment.

use crate::client::{CdnTransport, ClientConfig, RezkaClient};
use crate::error::{RezkaError, Result};
use crate::parser::parse_catalog;
use crate::types::{Catalog, EpisodesResponse};

/// Action discriminator for episode listing lookups
pub const GET_EPISODES_ACTION: &str = "get_episodes";

/// Episode catalog scraper
///
/// Generic over the transport so callers can plug in their own session
/// handling; defaults to [`RezkaClient`].
///
/// # Example
/// ```no_run
/// use rezka_core::RezkaScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = RezkaScraper::new()?;
///     let catalog = scraper.get_catalog("646", "56").await?;
///
///     for season in catalog.list_seasons() {
///         println!("Season {}: {:?}", season, catalog.list_episodes(season));
///     }
///     Ok(())
/// }
/// ```
pub struct RezkaScraper<T = RezkaClient> {
    transport: T,
}

impl RezkaScraper<RezkaClient> {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(RezkaClient::new()?))
    }

    /// Create a new scraper with custom client configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(RezkaClient::with_config(config)?))
    }
}

impl<T: CdnTransport> RezkaScraper<T> {
    /// Create a scraper over an existing transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the raw episodes HTML fragment for a title and translator.
    ///
    /// IDs are passed through to the endpoint as-is.
    ///
    /// # Arguments
    /// * `content_id` - ID of the title on the site
    /// * `translator_id` - ID of the translation/dub variant
    ///
    /// # Errors
    /// - `RezkaError::InvalidId` if either ID is empty
    /// - transport errors (`Http`, `RateLimited`, `NotFound`, `UnexpectedStatus`) unchanged
    /// - `RezkaError::MalformedDocument` if the body is not valid UTF-8
    /// - `RezkaError::Decode` if the body is not a valid envelope
    /// - `RezkaError::RemoteRejection` if the envelope reports `success: false`
    pub async fn fetch_episodes(&self, content_id: &str, translator_id: &str) -> Result<String> {
        if content_id.is_empty() {
            return Err(RezkaError::InvalidId("content ID cannot be empty".to_string()));
        }
        if translator_id.is_empty() {
            return Err(RezkaError::InvalidId("translator ID cannot be empty".to_string()));
        }

        let form = [
            ("id", content_id),
            ("translator_id", translator_id),
            ("action", GET_EPISODES_ACTION),
        ];

        let body = self.transport.submit(&form).await?;
        let body = std::str::from_utf8(&body)
            .map_err(|e| RezkaError::MalformedDocument(format!("Invalid UTF-8 in response: {}", e)))?;
        let envelope: EpisodesResponse = serde_json::from_str(body)?;

        if !envelope.success {
            tracing::warn!(
                content_id,
                translator_id,
                message = %envelope.message,
                "episode lookup rejected"
            );
            return Err(RezkaError::RemoteRejection(envelope.message));
        }

        Ok(envelope.episodes)
    }

    /// Fetch and parse the episode catalog for a title and translator.
    ///
    /// # Errors
    /// Everything [`Self::fetch_episodes`] returns, plus
    /// `RezkaError::MalformedDocument` from the parser. No catalog is
    /// returned alongside an error.
    pub async fn get_catalog(&self, content_id: &str, translator_id: &str) -> Result<Catalog> {
        let html = self.fetch_episodes(content_id, translator_id).await?;
        let catalog = parse_catalog(&html)?;

        tracing::debug!(
            content_id,
            translator_id,
            seasons = catalog.season_count(),
            episodes = catalog.len(),
            "fetched episode catalog"
        );

        Ok(catalog)
    }
}
