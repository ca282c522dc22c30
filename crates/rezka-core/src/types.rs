//! Data types for the Rezka episode catalog
//!
//! The catalog is a two-level map: season number -> episode number -> [`Stream`].
//! Ordering is never stored; the enumeration methods sort on demand.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw map shape used for (de)serialization of a [`Catalog`]
type SeasonMap = HashMap<u64, HashMap<u64, Stream>>;

/// Stream descriptor for a single episode
///
/// `url` is the raw locator as served by the CDN-lookup endpoint. It is not a
/// playable URL and must be resolved separately. An empty string means the
/// episode has no locator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    /// Raw, unresolved locator string
    pub url: String,
}

impl Stream {
    /// Create a stream descriptor from a raw locator
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Whether a locator is present for this episode
    pub fn has_locator(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Season -> episode -> stream catalog for one title and translator
///
/// Every season present holds at least one episode, and all season and
/// episode numbers are positive. Callers cannot mutate a catalog; it is built
/// by [`crate::parser::parse_catalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SeasonMap", into = "SeasonMap")]
pub struct Catalog {
    seasons: SeasonMap,
}

impl Catalog {
    /// Build a catalog from an episodes HTML fragment.
    ///
    /// Shorthand for [`crate::parser::parse_catalog`].
    pub fn from_html(html: &str) -> crate::Result<Self> {
        crate::parser::parse_catalog(html)
    }

    /// Record an episode, creating its season on first use.
    ///
    /// A repeated (season, episode) pair overwrites the earlier stream.
    pub(crate) fn insert(&mut self, season: u64, episode: u64, stream: Stream) {
        self.seasons
            .entry(season)
            .or_default()
            .insert(episode, stream);
    }

    /// All season numbers in ascending order.
    pub fn list_seasons(&self) -> Vec<u64> {
        let mut seasons: Vec<u64> = self.seasons.keys().copied().collect();
        seasons.sort_unstable();
        seasons
    }

    /// Episode numbers of `season` in ascending order.
    ///
    /// Returns an empty vector when the season is not in the catalog.
    pub fn list_episodes(&self, season: u64) -> Vec<u64> {
        let mut episodes: Vec<u64> = self
            .seasons
            .get(&season)
            .map(|episodes| episodes.keys().copied().collect())
            .unwrap_or_default();
        episodes.sort_unstable();
        episodes
    }

    /// Stream descriptor for a single episode
    pub fn stream(&self, season: u64, episode: u64) -> Option<&Stream> {
        self.seasons.get(&season)?.get(&episode)
    }

    /// Whether the (season, episode) pair is in the catalog
    pub fn contains(&self, season: u64, episode: u64) -> bool {
        self.stream(season, episode).is_some()
    }

    /// Number of seasons
    pub fn season_count(&self) -> usize {
        self.seasons.len()
    }

    /// Total number of episodes across all seasons
    pub fn len(&self) -> usize {
        self.seasons.values().map(HashMap::len).sum()
    }

    /// Whether the catalog has no episodes
    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Iterate `(season, episode, stream)` in ascending season, then episode order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64, &Stream)> + '_ {
        self.list_seasons().into_iter().flat_map(move |season| {
            self.list_episodes(season)
                .into_iter()
                .filter_map(move |episode| {
                    self.stream(season, episode)
                        .map(|stream| (season, episode, stream))
                })
        })
    }
}

impl From<SeasonMap> for Catalog {
    /// Drops zero keys and empty seasons so deserialized catalogs keep the
    /// same shape as parsed ones.
    fn from(raw: SeasonMap) -> Self {
        let seasons = raw
            .into_iter()
            .filter(|(season, _)| *season > 0)
            .map(|(season, episodes)| {
                let episodes: HashMap<u64, Stream> = episodes
                    .into_iter()
                    .filter(|(episode, _)| *episode > 0)
                    .collect();
                (season, episodes)
            })
            .filter(|(_, episodes)| !episodes.is_empty())
            .collect();
        Self { seasons }
    }
}

impl From<Catalog> for SeasonMap {
    fn from(catalog: Catalog) -> Self {
        catalog.seasons
    }
}

/// Response envelope of the `get_episodes` action
///
/// `episodes` carries the HTML fragment when `success` is true; `message`
/// carries the reason when it is false.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodesResponse {
    /// Whether the endpoint accepted the request
    pub success: bool,
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// Episodes HTML fragment
    #[serde(default)]
    pub episodes: String,
}
