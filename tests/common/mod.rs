#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use moodlist::{
    config::{RetryPolicy, Settings},
    error::CatalogError,
    management::ShownTracks,
    mood::{Display, DisplaySink, Session},
    spotify::{Catalog, CatalogClient},
    types::{
        AlbumRef, Artist, AudioFeatures, Category, Playlist, SimpleArtist, TimeRange, Track,
        TrackAudioFeatures,
    },
};

pub fn track(id: &str, name: &str, artist: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![SimpleArtist {
            id: format!("artist_{}", artist.to_lowercase().replace(' ', "_")),
            name: artist.to_string(),
        }],
        album: AlbumRef {
            id: format!("album_{}", id),
            name: "Album".to_string(),
        },
        ..Default::default()
    }
}

pub fn playlist(id: &str, name: &str, description: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        ..Default::default()
    }
}

pub fn features(valence: f32, energy: f32, danceability: f32, acousticness: f32) -> AudioFeatures {
    AudioFeatures {
        valence,
        energy,
        danceability,
        acousticness,
    }
}

/// Policy without waiting, so rate-limit tests run instantly.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 1,
        backoff: Duration::from_millis(1),
        retry_batch_size: 10,
        request_timeout: Duration::from_millis(200),
    }
}

/// In-memory catalog. Every call is logged as `(endpoint, detail)`; queued
/// errors for an endpoint are returned before any data.
#[derive(Default)]
pub struct FakeCatalog {
    pub recently_played: Vec<Track>,
    pub saved: Vec<Track>,
    pub top: HashMap<TimeRange, Vec<Track>>,
    pub search_results: Vec<Track>,
    pub artists: HashMap<String, Artist>,
    pub artist_top: HashMap<String, Vec<Track>>,
    pub features: HashMap<String, AudioFeatures>,
    pub user_playlists: Vec<Playlist>,
    pub playlist_tracks: HashMap<String, Vec<Track>>,
    pub categories: Vec<Category>,
    pub category_playlists: HashMap<String, Vec<Playlist>>,
    pub featured: Vec<Playlist>,
    /// Markets for which browse endpoints answer; `None` stands for the
    /// global call. Empty means every market answers.
    pub browse_markets: Vec<Option<String>>,
    pub delay: Option<Duration>,
    pub library: Mutex<HashSet<String>>,
    pub errors: Mutex<HashMap<&'static str, VecDeque<CatalogError>>>,
    pub calls: Mutex<Vec<(&'static str, String)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, endpoint: &'static str, error: CatalogError) {
        self.errors
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    pub fn fail_always(&self, endpoint: &'static str, error: CatalogError, times: usize) {
        for _ in 0..times {
            self.fail(endpoint, error.clone());
        }
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, d)| d.clone())
            .collect()
    }

    fn enter(&self, endpoint: &'static str, detail: String) -> Result<(), CatalogError> {
        self.calls.lock().unwrap().push((endpoint, detail));
        match self
            .errors
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(|q| q.pop_front())
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn browse_allowed(&self, market: Option<&str>) -> Result<(), CatalogError> {
        if self.browse_markets.is_empty()
            || self
                .browse_markets
                .iter()
                .any(|m| m.as_deref() == market)
        {
            Ok(())
        } else {
            Err(CatalogError::NotFound)
        }
    }
}

fn market_detail(market: Option<&str>) -> String {
    market.unwrap_or("global").to_string()
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn recently_played(&self, limit: u32) -> Result<Vec<Track>, CatalogError> {
        self.enter("recently_played", limit.to_string())?;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.recently_played.iter().take(limit as usize).cloned().collect())
    }

    async fn saved_tracks(&self, limit: u32) -> Result<Vec<Track>, CatalogError> {
        self.enter("saved_tracks", limit.to_string())?;
        Ok(self.saved.iter().take(limit as usize).cloned().collect())
    }

    async fn top_tracks(&self, range: TimeRange, limit: u32) -> Result<Vec<Track>, CatalogError> {
        self.enter("top_tracks", range.as_str().to_string())?;
        Ok(self
            .top
            .get(&range)
            .map(|t| t.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        _offset: u32,
        _market: &str,
    ) -> Result<Vec<Track>, CatalogError> {
        self.enter("search_tracks", query.to_string())?;
        Ok(self
            .search_results
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn artists(&self, ids: &[String]) -> Result<Vec<Artist>, CatalogError> {
        self.enter("artists", ids.len().to_string())?;
        Ok(ids
            .iter()
            .filter_map(|id| self.artists.get(id).cloned())
            .collect())
    }

    async fn artist_top_tracks(
        &self,
        artist_id: &str,
        _market: &str,
    ) -> Result<Vec<Track>, CatalogError> {
        self.enter("artist_top_tracks", artist_id.to_string())?;
        Ok(self.artist_top.get(artist_id).cloned().unwrap_or_default())
    }

    async fn audio_features(
        &self,
        ids: &[String],
    ) -> Result<Vec<TrackAudioFeatures>, CatalogError> {
        self.enter("audio_features", ids.len().to_string())?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.features.get(id).map(|f| TrackAudioFeatures {
                    id: id.clone(),
                    features: *f,
                })
            })
            .collect())
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<Track>, CatalogError> {
        self.enter("playlist_tracks", playlist_id.to_string())?;
        Ok(self
            .playlist_tracks
            .get(playlist_id)
            .map(|t| t.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn user_playlists(&self, _limit: u32) -> Result<Vec<Playlist>, CatalogError> {
        self.enter("user_playlists", String::new())?;
        Ok(self.user_playlists.clone())
    }

    async fn categories(
        &self,
        market: Option<&str>,
        _limit: u32,
    ) -> Result<Vec<Category>, CatalogError> {
        self.enter("categories", market_detail(market))?;
        self.browse_allowed(market)?;
        Ok(self.categories.clone())
    }

    async fn category_playlists(
        &self,
        category_id: &str,
        market: Option<&str>,
        _limit: u32,
    ) -> Result<Vec<Playlist>, CatalogError> {
        self.enter(
            "category_playlists",
            format!("{}@{}", category_id, market_detail(market)),
        )?;
        self.browse_allowed(market)?;
        Ok(self
            .category_playlists
            .get(category_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn featured_playlists(
        &self,
        market: Option<&str>,
        _limit: u32,
    ) -> Result<Vec<Playlist>, CatalogError> {
        self.enter("featured_playlists", market_detail(market))?;
        self.browse_allowed(market)?;
        Ok(self.featured.clone())
    }

    async fn contains_saved(&self, ids: &[String]) -> Result<Vec<bool>, CatalogError> {
        self.enter("contains_saved", ids.len().to_string())?;
        let library = self.library.lock().unwrap();
        Ok(ids.iter().map(|id| library.contains(id)).collect())
    }

    async fn save_tracks(&self, ids: &[String]) -> Result<(), CatalogError> {
        self.enter("save_tracks", ids.join(","))?;
        self.library.lock().unwrap().extend(ids.iter().cloned());
        Ok(())
    }

    async fn remove_saved_tracks(&self, ids: &[String]) -> Result<(), CatalogError> {
        self.enter("remove_saved_tracks", ids.join(","))?;
        let mut library = self.library.lock().unwrap();
        for id in ids {
            library.remove(id);
        }
        Ok(())
    }
}

pub fn client(fake: &Arc<FakeCatalog>) -> CatalogClient {
    CatalogClient::new(fake.clone(), fast_policy())
}

pub fn session(fake: &Arc<FakeCatalog>, state_dir: &std::path::Path) -> Session {
    let settings = Settings {
        retry: fast_policy(),
        ..Settings::default()
    };
    Session::new(client(fake), ShownTracks::new(state_dir), settings)
}

/// Sink that remembers every display it receives.
#[derive(Default)]
pub struct RecordingSink {
    pub shown: Mutex<Vec<Display>>,
}

impl DisplaySink for RecordingSink {
    fn show(&self, display: &Display) {
        self.shown.lock().unwrap().push(display.clone());
    }
}

pub fn ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}
