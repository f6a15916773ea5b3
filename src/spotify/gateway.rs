use std::{
    collections::{HashMap, HashSet},
    fmt,
    future::Future,
    sync::Arc,
};

use tokio::{
    sync::Mutex,
    time::{sleep, timeout},
};
use tracing::{debug, warn};

use crate::{
    config::{BATCH_SIZE, RetryPolicy},
    error::{CatalogError, Failure},
    spotify::Catalog,
    types::{Artist, AudioFeatures, Category, Playlist, TimeRange, Track},
};

/// One endpoint family whose access a token may or may not hold.
///
/// Each endpoint gets its own entry, so a 403 on one resource never hides
/// another endpoint a later fallback stage depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    RecentlyPlayed,
    SavedTracks,
    TopTracks,
    Search,
    ArtistLookup,
    ArtistTopTracks,
    AudioFeatures,
    PlaylistTracks,
    UserPlaylists,
    Categories,
    CategoryPlaylists,
    FeaturedPlaylists,
    SavedStatus,
    LibraryModify,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::RecentlyPlayed => "recently-played",
            Capability::SavedTracks => "saved-tracks",
            Capability::TopTracks => "top-tracks",
            Capability::Search => "search",
            Capability::ArtistLookup => "artists",
            Capability::ArtistTopTracks => "artist-top-tracks",
            Capability::AudioFeatures => "audio-features",
            Capability::PlaylistTracks => "playlist-tracks",
            Capability::UserPlaylists => "user-playlists",
            Capability::Categories => "browse-categories",
            Capability::CategoryPlaylists => "category-playlists",
            Capability::FeaturedPlaylists => "featured-playlists",
            Capability::SavedStatus => "saved-status",
            Capability::LibraryModify => "library-modify",
        };
        write!(f, "{}", name)
    }
}

/// Result of a fail-soft catalog call.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Data(T),
    Unavailable(Failure),
}

impl<T> Fetch<T> {
    pub fn is_data(&self) -> bool {
        matches!(self, Fetch::Data(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Fetch::Data(value) => Some(value),
            Fetch::Unavailable(_) => None,
        }
    }
}

impl<T: Default> Fetch<T> {
    /// The fetched value, or an empty one when the call failed.
    pub fn items(self) -> T {
        self.ok().unwrap_or_default()
    }
}

/// Capabilities disabled for the lifetime of a session.
#[derive(Debug, Default)]
pub struct Capabilities {
    disabled: Mutex<HashSet<Capability>>,
}

impl Capabilities {
    pub async fn is_enabled(&self, capability: Capability) -> bool {
        !self.disabled.lock().await.contains(&capability)
    }

    pub async fn disable(&self, capability: Capability) {
        self.disabled.lock().await.insert(capability);
    }

    pub async fn disabled(&self) -> Vec<Capability> {
        let mut disabled: Vec<Capability> = self.disabled.lock().await.iter().copied().collect();
        disabled.sort();
        disabled
    }
}

/// Fail-soft front of a [`Catalog`].
///
/// Every call returns a [`Fetch`] instead of an error. A 403 disables the
/// capability for the session, a 429 is retried according to the
/// [`RetryPolicy`], anything else is logged and reported as transient.
pub struct CatalogClient {
    catalog: Arc<dyn Catalog>,
    capabilities: Capabilities,
    policy: RetryPolicy,
}

impl CatalogClient {
    pub fn new(catalog: Arc<dyn Catalog>, policy: RetryPolicy) -> Self {
        Self {
            catalog,
            capabilities: Capabilities::default(),
            policy,
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn attempt<T, Fut>(&self, fut: Fut) -> Result<T, CatalogError>
    where
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        timeout(self.policy.request_timeout, fut)
            .await
            .unwrap_or(Err(CatalogError::Timeout))
    }

    async fn deny(&self, capability: Capability) {
        warn!(%capability, "capability not granted, disabling it for this session");
        self.capabilities.disable(capability).await;
    }

    async fn call<T, F, Fut>(&self, capability: Capability, op: F) -> Fetch<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        if !self.capabilities.is_enabled(capability).await {
            debug!(%capability, "skipping call, capability disabled");
            return Fetch::Unavailable(Failure::CapabilityDenied);
        }

        let mut retries = 0;
        loop {
            let err = match self.attempt(op()).await {
                Ok(value) => return Fetch::Data(value),
                Err(err) => err,
            };

            match err.failure() {
                Failure::CapabilityDenied => {
                    self.deny(capability).await;
                    return Fetch::Unavailable(Failure::CapabilityDenied);
                }
                Failure::RateLimited if retries < self.policy.max_retries => {
                    retries += 1;
                    debug!(%capability, retries, "rate limited, backing off");
                    sleep(self.policy.backoff).await;
                }
                failure => {
                    warn!(%capability, error = %err, "catalog call failed");
                    return Fetch::Unavailable(failure);
                }
            }
        }
    }

    /// Runs `op` over `ids` in chunks of [`BATCH_SIZE`], one chunk at a time.
    ///
    /// A rate-limited chunk is retried with only its first
    /// `retry_batch_size` ids. A failed chunk is skipped, a denied chunk ends
    /// the batch.
    async fn call_batched<'a, T, F, Fut>(
        &self,
        capability: Capability,
        ids: &'a [String],
        op: F,
    ) -> Fetch<Vec<T>>
    where
        F: Fn(&'a [String]) -> Fut,
        Fut: Future<Output = Result<Vec<T>, CatalogError>>,
    {
        if !self.capabilities.is_enabled(capability).await {
            debug!(%capability, "skipping batch, capability disabled");
            return Fetch::Unavailable(Failure::CapabilityDenied);
        }

        let mut collected = Vec::new();
        let mut succeeded = false;
        let mut last_failure = None;

        for chunk in ids.chunks(BATCH_SIZE) {
            let mut slice = chunk;
            let mut retries = 0;
            loop {
                let err = match self.attempt(op(slice)).await {
                    Ok(items) => {
                        collected.extend(items);
                        succeeded = true;
                        break;
                    }
                    Err(err) => err,
                };

                match err.failure() {
                    Failure::CapabilityDenied => {
                        self.deny(capability).await;
                        return Fetch::Unavailable(Failure::CapabilityDenied);
                    }
                    Failure::RateLimited if retries < self.policy.max_retries => {
                        retries += 1;
                        let size = self.policy.retry_batch_size.min(chunk.len());
                        debug!(%capability, size, "rate limited, retrying with a smaller batch");
                        sleep(self.policy.backoff).await;
                        slice = &chunk[..size];
                    }
                    failure => {
                        warn!(%capability, error = %err, "batch chunk failed, skipping it");
                        last_failure = Some(failure);
                        break;
                    }
                }
            }
        }

        match last_failure {
            Some(failure) if !succeeded => Fetch::Unavailable(failure),
            _ => Fetch::Data(collected),
        }
    }

    pub async fn recently_played(&self, limit: u32) -> Fetch<Vec<Track>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::RecentlyPlayed, move || catalog.recently_played(limit))
            .await
    }

    pub async fn saved_tracks(&self, limit: u32) -> Fetch<Vec<Track>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::SavedTracks, move || catalog.saved_tracks(limit))
            .await
    }

    pub async fn top_tracks(&self, range: TimeRange, limit: u32) -> Fetch<Vec<Track>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::TopTracks, move || catalog.top_tracks(range, limit))
            .await
    }

    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        market: &str,
    ) -> Fetch<Vec<Track>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::Search, move || {
            catalog.search_tracks(query, limit, offset, market)
        })
        .await
    }

    pub async fn artists(&self, ids: &[String]) -> Fetch<Vec<Artist>> {
        let catalog = self.catalog.as_ref();
        self.call_batched(Capability::ArtistLookup, ids, move |chunk| catalog.artists(chunk))
            .await
    }

    /// Genre tags per artist id. Artists that could not be looked up are
    /// simply absent from the map.
    pub async fn genres_by_artist(&self, ids: &[String]) -> HashMap<String, Vec<String>> {
        self.artists(ids)
            .await
            .items()
            .into_iter()
            .map(|a| (a.id, a.genres))
            .collect()
    }

    pub async fn artist_top_tracks(&self, artist_id: &str, market: &str) -> Fetch<Vec<Track>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::ArtistTopTracks, move || {
            catalog.artist_top_tracks(artist_id, market)
        })
        .await
    }

    pub async fn audio_features(&self, ids: &[String]) -> Fetch<HashMap<String, AudioFeatures>> {
        let catalog = self.catalog.as_ref();
        match self
            .call_batched(Capability::AudioFeatures, ids, move |chunk| {
                catalog.audio_features(chunk)
            })
            .await
        {
            Fetch::Data(features) => {
                Fetch::Data(features.into_iter().map(|f| (f.id, f.features)).collect())
            }
            Fetch::Unavailable(failure) => Fetch::Unavailable(failure),
        }
    }

    /// Copies of `tracks` carrying their audio features where the lookup
    /// succeeded. Tracks without features keep `audio_features: None`.
    pub async fn with_audio_features(&self, tracks: &[Track]) -> Vec<Track> {
        let ids: Vec<String> = tracks
            .iter()
            .filter(|t| !t.id.is_empty() && t.audio_features.is_none())
            .map(|t| t.id.clone())
            .collect();
        if ids.is_empty() {
            return tracks.to_vec();
        }

        let features = self.audio_features(&ids).await.items();
        tracks
            .iter()
            .map(|t| match features.get(&t.id) {
                Some(f) => t.with_audio_features(*f),
                None => t.clone(),
            })
            .collect()
    }

    pub async fn playlist_tracks(&self, playlist_id: &str, limit: u32) -> Fetch<Vec<Track>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::PlaylistTracks, move || {
            catalog.playlist_tracks(playlist_id, limit)
        })
        .await
    }

    pub async fn user_playlists(&self, limit: u32) -> Fetch<Vec<Playlist>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::UserPlaylists, move || catalog.user_playlists(limit))
            .await
    }

    pub async fn categories(&self, market: Option<&str>, limit: u32) -> Fetch<Vec<Category>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::Categories, move || catalog.categories(market, limit))
            .await
    }

    pub async fn category_playlists(
        &self,
        category_id: &str,
        market: Option<&str>,
        limit: u32,
    ) -> Fetch<Vec<Playlist>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::CategoryPlaylists, move || {
            catalog.category_playlists(category_id, market, limit)
        })
        .await
    }

    pub async fn featured_playlists(&self, market: Option<&str>, limit: u32) -> Fetch<Vec<Playlist>> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::FeaturedPlaylists, move || {
            catalog.featured_playlists(market, limit)
        })
        .await
    }

    /// Saved status per id, in order. Any failure renders every track as
    /// not saved.
    pub async fn saved_status(&self, ids: &[String]) -> Vec<bool> {
        let catalog = self.catalog.as_ref();
        match self
            .call_batched(Capability::SavedStatus, ids, move |chunk| {
                catalog.contains_saved(chunk)
            })
            .await
        {
            Fetch::Data(flags) if flags.len() == ids.len() => flags,
            _ => vec![false; ids.len()],
        }
    }

    pub async fn save_tracks(&self, ids: &[String]) -> Fetch<()> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::LibraryModify, move || catalog.save_tracks(ids))
            .await
    }

    pub async fn remove_saved_tracks(&self, ids: &[String]) -> Fetch<()> {
        let catalog = self.catalog.as_ref();
        self.call(Capability::LibraryModify, move || catalog.remove_saved_tracks(ids))
            .await
    }
}
