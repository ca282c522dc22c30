//! Episodes parser for Rezka
//!
//! Parses the HTML fragment from the `get_episodes` envelope into a [`Catalog`].
//!
//! Expected markup:
//!
//! ```html
//! <ul class="b-simple_episodes__list">
//!   <li class="b-simple_episode__item" data-season_id="1" data-episode_id="2"
//!       data-cdn_url="#h..."></li>
//! </ul>
//! ```
//!
//! If the upstream renames these markers the result is an empty or partial
//! catalog rather than an error.

use scraper::{Html, Selector};

use crate::error::{RezkaError, Result};
use crate::types::{Catalog, Stream};

/// Episode items nested in any episode list container
const EPISODE_ITEM_SELECTOR: &str = ".b-simple_episodes__list .b-simple_episode__item";

const SEASON_ATTR: &str = "data-season_id";
const EPISODE_ATTR: &str = "data-episode_id";
const LOCATOR_ATTR: &str = "data-cdn_url";

/// Serialized form of an absent locator
const NULL_LOCATOR: &str = "null";

/// Parse the episodes HTML fragment into a catalog.
///
/// Items whose season or episode ID is missing, unparseable or not positive
/// are skipped. When the same (season, episode) pair appears more than once,
/// the later item in document order wins.
///
/// # Arguments
/// * `html` - Episodes fragment from the response envelope
///
/// # Returns
/// * `Ok(Catalog)` with every valid item
/// * `Err(RezkaError::MalformedDocument)` if the item selector cannot be built
///
/// # Examples
/// ```
/// use rezka_core::parser::parse_catalog;
///
/// let html = r#"<ul class="b-simple_episodes__list">
///     <li class="b-simple_episode__item" data-season_id="1" data-episode_id="1" data-cdn_url="null"></li>
/// </ul>"#;
/// let catalog = parse_catalog(html).unwrap();
/// assert_eq!(catalog.list_seasons(), vec![1]);
/// assert_eq!(catalog.stream(1, 1).unwrap().url, "");
/// ```
pub fn parse_catalog(html: &str) -> Result<Catalog> {
    let fragment = Html::parse_fragment(html);
    let item_selector = Selector::parse(EPISODE_ITEM_SELECTOR)
        .map_err(|e| RezkaError::MalformedDocument(format!("Invalid selector: {:?}", e)))?;

    let mut catalog = Catalog::default();

    for item in fragment.select(&item_selector) {
        let element = item.value();
        let season = parse_id(element.attr(SEASON_ATTR).unwrap_or_default());
        let episode = parse_id(element.attr(EPISODE_ATTR).unwrap_or_default());

        if season == 0 || episode == 0 {
            tracing::trace!(
                season = ?element.attr(SEASON_ATTR),
                episode = ?element.attr(EPISODE_ATTR),
                "skipping episode item without positive ids"
            );
            continue;
        }

        let locator = normalize_locator(element.attr(LOCATOR_ATTR).unwrap_or_default());
        catalog.insert(season, episode, Stream::new(locator));
    }

    tracing::debug!(
        seasons = catalog.season_count(),
        episodes = catalog.len(),
        "parsed episode catalog"
    );

    Ok(catalog)
}

/// Parse an episodes fragment given as raw bytes.
///
/// # Errors
/// Returns `MalformedDocument` if the bytes are not valid UTF-8.
pub fn parse_catalog_bytes(bytes: &[u8]) -> Result<Catalog> {
    let html = std::str::from_utf8(bytes)
        .map_err(|e| RezkaError::MalformedDocument(format!("Invalid UTF-8: {}", e)))?;
    parse_catalog(html)
}

/// Parse a season or episode ID attribute.
///
/// The value must be a 64-bit signed integer as written, with no
/// surrounding whitespace. Missing, unparseable or non-positive values
/// yield 0.
///
/// # Examples
/// ```
/// use rezka_core::parser::parse_id;
///
/// assert_eq!(parse_id("12"), 12);
/// assert_eq!(parse_id("4294967296"), 4_294_967_296);
/// assert_eq!(parse_id("-3"), 0);
/// assert_eq!(parse_id("abc"), 0);
/// ```
pub fn parse_id(value: &str) -> u64 {
    value
        .parse::<i64>()
        .ok()
        .and_then(|id| u64::try_from(id).ok())
        .unwrap_or(0)
}

/// Normalize a raw locator attribute.
///
/// The literal `null` becomes an empty string; anything else is kept verbatim.
///
/// # Examples
/// ```
/// use rezka_core::parser::normalize_locator;
///
/// assert_eq!(normalize_locator("null"), "");
/// assert_eq!(normalize_locator("NULL"), "NULL");
/// assert_eq!(normalize_locator(""), "");
/// ```
pub fn normalize_locator(raw: &str) -> String {
    if raw == NULL_LOCATOR {
        String::new()
    } else {
        raw.to_string()
    }
}
