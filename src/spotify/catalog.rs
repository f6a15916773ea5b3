use async_trait::async_trait;

use crate::{
    error::CatalogError,
    types::{Artist, Category, Playlist, TimeRange, Track, TrackAudioFeatures},
};

/// Typed read and write access to the Spotify catalog.
///
/// Implementations only translate calls into requests and responses into
/// values; retries, capability tracking and fail-soft behavior live in
/// [`super::CatalogClient`]. Batch methods take at most
/// [`crate::config::BATCH_SIZE`] ids.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn recently_played(&self, limit: u32) -> Result<Vec<Track>, CatalogError>;

    async fn saved_tracks(&self, limit: u32) -> Result<Vec<Track>, CatalogError>;

    async fn top_tracks(&self, range: TimeRange, limit: u32) -> Result<Vec<Track>, CatalogError>;

    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        market: &str,
    ) -> Result<Vec<Track>, CatalogError>;

    async fn artists(&self, ids: &[String]) -> Result<Vec<Artist>, CatalogError>;

    async fn artist_top_tracks(
        &self,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<Track>, CatalogError>;

    async fn audio_features(&self, ids: &[String])
    -> Result<Vec<TrackAudioFeatures>, CatalogError>;

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<Track>, CatalogError>;

    async fn user_playlists(&self, limit: u32) -> Result<Vec<Playlist>, CatalogError>;

    /// `None` as market asks for the global, market-less listing.
    async fn categories(
        &self,
        market: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Category>, CatalogError>;

    async fn category_playlists(
        &self,
        category_id: &str,
        market: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Playlist>, CatalogError>;

    async fn featured_playlists(
        &self,
        market: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Playlist>, CatalogError>;

    async fn contains_saved(&self, ids: &[String]) -> Result<Vec<bool>, CatalogError>;

    async fn save_tracks(&self, ids: &[String]) -> Result<(), CatalogError>;

    async fn remove_saved_tracks(&self, ids: &[String]) -> Result<(), CatalogError>;
}
