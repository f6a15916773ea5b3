//! Candidate expansion strategies.
//!
//! Each strategy turns a few seed tracks into more candidates through one
//! kind of catalog query. Strategies run one after another, never fail and
//! feed a single [`CandidatePool`].

use std::{collections::HashMap, future::Future};

use chrono::{Datelike, Utc};
use rand::Rng;
use tracing::debug;

use crate::{
    config::SEARCH_PAGE_SIZE,
    mood::{CandidatePool, Language, Mood, classify},
    spotify::{CatalogClient, Fetch},
    types::{Playlist, Track},
    utils,
};

/// Markets tried, in order, for browse endpoints.
pub const DEFAULT_MARKETS: [&str; 5] = ["US", "GB", "IN", "AU", "CA"];

const SEED_LIMIT: usize = 20;
const KEYWORD_SEED_LIMIT: usize = 50;
const AUDIO_SEED_WINDOW: usize = 100;
const TOP_ARTISTS: usize = 5;

const GENRE_ARTISTS: usize = 10;
const GENRE_COUNT: usize = 5;
const GENRE_KEYWORDS: usize = 3;
const GENRE_QUERY_CAP: usize = 8;
const GENRE_STOP_AFTER: usize = 60;
const HEURISTIC_ARTISTS: usize = 50;

const SEARCH_QUERY_CAP: usize = 6;
const SEARCH_STOP_AFTER: usize = 40;

const CATEGORY_LIMIT: u32 = 20;
const CATEGORY_PLAYLIST_LIMIT: u32 = 10;
const FEATURED_LIMIT: u32 = 20;
const PLAYLIST_TRACK_LIMIT: u32 = 20;
const CATEGORIES_USED: usize = 3;
const PLAYLISTS_PER_SOURCE: usize = 3;
const CATEGORY_STOP_AFTER: usize = 30;
const FEATURED_STOP_AFTER: usize = 50;
const RANDOM_THRESHOLD: usize = 10;

const RANDOM_QUERY_CAP: usize = 8;
const RANDOM_STOP_AFTER: usize = 40;

/// Browse markets for `language`: the defaults with the language's market
/// moved to the front.
pub fn markets_for(language: Language) -> Vec<String> {
    let preferred = language.market();
    let mut markets = vec![preferred.to_string()];
    markets.extend(
        DEFAULT_MARKETS
            .iter()
            .filter(|m| **m != preferred)
            .map(|m| m.to_string()),
    );
    markets
}

/// `year:<Y-4>-<Y>` for the current year.
pub fn recent_years_filter() -> String {
    let year = Utc::now().year();
    format!("year:{}-{}", year - 4, year)
}

/// One of 0, 10, 20, 30, 40.
pub fn random_search_offset() -> u32 {
    rand::rng().random_range(0..5u32) * SEARCH_PAGE_SIZE
}

/// Free-text queries pairing mood and language words, each as a plain and a
/// year-scoped variant.
pub fn mood_language_queries(mood_words: &[&str], language_words: &[&str]) -> Vec<String> {
    let years = recent_years_filter();
    let mut queries = Vec::new();
    for m in mood_words.iter().take(3) {
        for l in language_words.iter().take(2) {
            queries.push(format!("{} {}", m, l));
            queries.push(format!("{} {} {}", years, m, l));
        }
    }
    queries
}

/// Picks the tracks that expansion starts from.
///
/// Audio-feature matches among the first 100 history tracks come first, then
/// keyword matches among the whole history. Falls back to the head of the
/// history when nothing matches.
pub async fn select_seeds(catalog: &CatalogClient, history: &[Track], mood: Mood) -> Vec<Track> {
    let window = &history[..history.len().min(AUDIO_SEED_WINDOW)];
    let with_features = catalog.with_audio_features(window).await;
    let by_audio = with_features
        .into_iter()
        .filter(|t| classify::score_by_audio_features(t, mood) == Some(true));

    let by_keyword = classify::filter_by_keyword(history, mood)
        .into_iter()
        .take(KEYWORD_SEED_LIMIT);

    let mut seeds = utils::dedupe_tracks(by_audio.chain(by_keyword).collect());
    seeds.truncate(SEED_LIMIT);

    if seeds.is_empty() {
        seeds = history.iter().take(SEED_LIMIT).cloned().collect();
    }
    debug!(mood = %mood, seeds = seeds.len(), "seeds selected");
    seeds
}

/// Artist ids of `tracks`, unique, in order of first appearance.
fn artist_ids(tracks: &[Track]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for artist in tracks.iter().flat_map(|t| t.artists.iter()) {
        if !artist.id.is_empty() && !ids.contains(&artist.id) {
            ids.push(artist.id.clone());
        }
    }
    ids
}

/// Seed artists ranked by how many seeds they appear on. Ties keep first
/// appearance order.
pub fn top_artists(seeds: &[Track], limit: usize) -> Vec<String> {
    let order = artist_ids(seeds);
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for artist in seeds.iter().flat_map(|t| t.artists.iter()) {
        *counts.entry(artist.id.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(usize, &String)> = order
        .iter()
        .map(|id| (counts.get(id.as_str()).copied().unwrap_or(0), id))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().take(limit).map(|(_, id)| id.clone()).collect()
}

/// Runs every expansion strategy for one generation.
pub struct Expander<'a> {
    catalog: &'a CatalogClient,
    mood: Mood,
    language: Language,
    market: String,
    markets: Vec<String>,
}

impl<'a> Expander<'a> {
    pub fn new(catalog: &'a CatalogClient, mood: Mood, language: Language, market: &str) -> Self {
        Self {
            catalog,
            mood,
            language,
            market: market.to_string(),
            markets: markets_for(language),
        }
    }

    /// All strategies in order: own-artist top tracks, genre expansion,
    /// free-text search, curated and featured playlists.
    pub async fn expand(&self, seeds: &[Track]) -> CandidatePool {
        let mut pool = CandidatePool::new();

        let added = pool.extend(self.own_artist_top_tracks(seeds).await);
        debug!(added, "own artist top tracks");
        let added = pool.extend(self.genre_expansion(seeds).await);
        debug!(added, "genre expansion");
        let added = pool.extend(self.search_expansion().await);
        debug!(added, "search expansion");
        let added = pool.extend(self.curated_expansion().await);
        debug!(added, "curated expansion");

        pool
    }

    async fn search(&self, query: &str) -> Vec<Track> {
        self.catalog
            .search_tracks(query, SEARCH_PAGE_SIZE, random_search_offset(), &self.market)
            .await
            .items()
    }

    /// Runs up to `cap` queries, stopping once more than `stop_after` unique
    /// tracks were collected.
    async fn run_queries(&self, queries: &[String], cap: usize, stop_after: usize) -> Vec<Track> {
        let mut pool = CandidatePool::new();
        for query in queries.iter().take(cap) {
            pool.extend(self.search(query).await);
            if pool.len() > stop_after {
                break;
            }
        }
        pool.into_tracks()
    }

    pub async fn own_artist_top_tracks(&self, seeds: &[Track]) -> Vec<Track> {
        let mut tracks = Vec::new();
        for artist_id in top_artists(seeds, TOP_ARTISTS) {
            tracks.extend(
                self.catalog
                    .artist_top_tracks(&artist_id, &self.market)
                    .await
                    .items(),
            );
        }
        tracks
    }

    /// Searches `"<keyword> genre:<genre>"` for the seed artists' genres and
    /// narrows the result with the genre heuristic.
    pub async fn genre_expansion(&self, seeds: &[Track]) -> Vec<Track> {
        let ids: Vec<String> = artist_ids(seeds).into_iter().take(GENRE_ARTISTS).collect();
        if ids.is_empty() {
            return Vec::new();
        }

        let genres_by_artist = self.catalog.genres_by_artist(&ids).await;
        let mut genres: Vec<&str> = Vec::new();
        for genre in ids
            .iter()
            .filter_map(|id| genres_by_artist.get(id))
            .flatten()
        {
            if !genre.is_empty() && !genres.contains(&genre.as_str()) {
                genres.push(genre);
            }
        }
        if genres.is_empty() {
            return Vec::new();
        }

        let mut queries = Vec::new();
        for genre in genres.iter().take(GENRE_COUNT) {
            for kw in self.mood.genre_keywords().iter().take(GENRE_KEYWORDS) {
                queries.push(format!("{} genre:{}", kw, genre.replace('"', "")));
            }
        }

        let collected = self
            .run_queries(&queries, GENRE_QUERY_CAP, GENRE_STOP_AFTER)
            .await;
        if collected.is_empty() {
            return collected;
        }

        let result_artists: Vec<String> = artist_ids(&collected)
            .into_iter()
            .take(HEURISTIC_ARTISTS)
            .collect();
        let result_genres = self.catalog.genres_by_artist(&result_artists).await;

        let by_genre = classify::filter_by_genre_heuristic(&collected, self.mood, &result_genres);
        if !by_genre.is_empty() {
            return by_genre;
        }
        let by_keyword = classify::filter_by_mood(&collected, self.mood);
        if !by_keyword.is_empty() {
            return by_keyword;
        }
        collected
    }

    pub async fn search_expansion(&self) -> Vec<Track> {
        let queries =
            mood_language_queries(self.mood.search_keywords(), self.language.search_words());
        self.run_queries(&queries, SEARCH_QUERY_CAP, SEARCH_STOP_AFTER)
            .await
    }

    /// First successful result across the browse markets, then the
    /// market-less global call.
    async fn across_markets<T, F, Fut>(&self, op: F) -> Option<T>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Fetch<T>>,
    {
        for market in &self.markets {
            if let Fetch::Data(value) = op(Some(market.clone())).await {
                return Some(value);
            }
            debug!(%market, "browse call failed, trying next market");
        }
        op(None).await.ok()
    }

    /// Collects tracks from the first few `playlists`, ending early once the
    /// pool holds more than `stop_after` tracks.
    async fn harvest(&self, pool: &mut CandidatePool, playlists: &[Playlist], stop_after: usize) {
        for playlist in playlists.iter().take(PLAYLISTS_PER_SOURCE) {
            pool.extend(
                self.catalog
                    .playlist_tracks(&playlist.id, PLAYLIST_TRACK_LIMIT)
                    .await
                    .items(),
            );
            if pool.len() > stop_after {
                break;
            }
        }
    }

    /// Tracks from mood-matching browse categories and featured playlists,
    /// topped up by [`Expander::random_generation`] when they yield fewer
    /// than ten tracks.
    pub async fn curated_expansion(&self) -> Vec<Track> {
        let catalog = self.catalog;
        let mut pool = CandidatePool::new();

        let categories = self
            .across_markets(|market| async move {
                catalog.categories(market.as_deref(), CATEGORY_LIMIT).await
            })
            .await
            .unwrap_or_default();

        let hints = self.mood.category_hints();
        let relevant = categories
            .iter()
            .filter(|c| {
                let name = c.name.to_lowercase();
                hints.iter().any(|h| name.contains(h))
            })
            .take(CATEGORIES_USED);

        for category in relevant {
            let id = category.id.as_str();
            let mut playlists = self
                .across_markets(|market| async move {
                    catalog
                        .category_playlists(id, market.as_deref(), CATEGORY_PLAYLIST_LIMIT)
                        .await
                })
                .await
                .unwrap_or_default();
            utils::shuffle(&mut playlists);
            self.harvest(&mut pool, &playlists, CATEGORY_STOP_AFTER).await;
        }

        let featured = self
            .across_markets(|market| async move {
                catalog
                    .featured_playlists(market.as_deref(), FEATURED_LIMIT)
                    .await
            })
            .await
            .unwrap_or_default();

        let keywords = self.mood.featured_keywords();
        let mut chosen: Vec<Playlist> = featured
            .iter()
            .filter(|p| {
                let name = p.name.to_lowercase();
                let description = p.description.to_lowercase();
                keywords
                    .iter()
                    .any(|k| name.contains(k) || description.contains(k))
            })
            .cloned()
            .collect();
        if chosen.is_empty() {
            chosen = featured;
        }
        utils::shuffle(&mut chosen);
        self.harvest(&mut pool, &chosen, FEATURED_STOP_AFTER).await;

        if pool.len() < RANDOM_THRESHOLD {
            debug!(
                collected = pool.len(),
                "curated playlists too thin, generating random tracks"
            );
            pool.extend(self.random_generation().await);
        }

        pool.into_tracks()
    }

    /// Searches a shuffled mix of mood/language keyword queries and genre
    /// queries.
    pub async fn random_generation(&self) -> Vec<Track> {
        let mut queries =
            mood_language_queries(self.mood.search_keywords(), self.language.random_words());
        queries.extend(self.mood.genre_queries().iter().map(|q| q.to_string()));
        queries.extend(self.language.genre_queries().iter().map(|q| q.to_string()));
        utils::shuffle(&mut queries);

        self.run_queries(&queries, RANDOM_QUERY_CAP, RANDOM_STOP_AFTER)
            .await
    }
}
