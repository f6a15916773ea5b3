use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::CatalogError,
    spotify::Catalog,
    types::{
        Artist, ArtistTopTracksResponse, ArtistsResponse, AudioFeaturesResponse,
        CategoriesResponse, Category, Page, Playlist, PlaylistsResponse, SearchResponse,
        TimeRange, Track, TrackAudioFeatures, TrackItem,
    },
};

/// Maps an HTTP status onto the catalog error taxonomy.
///
/// Returns `Ok(())` for success codes. `retry_after` is the parsed value of the
/// `Retry-After` header and is only kept for 429 responses.
pub fn classify_status(status: StatusCode, retry_after: Option<u64>) -> Result<(), CatalogError> {
    if status.is_success() {
        return Ok(());
    }

    Err(match status {
        StatusCode::UNAUTHORIZED => CatalogError::Unauthorized,
        StatusCode::FORBIDDEN => CatalogError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimited { retry_after },
        StatusCode::NOT_FOUND => CatalogError::NotFound,
        s if s.is_server_error() => CatalogError::Server(s.as_u16()),
        s => CatalogError::Status(s.as_u16()),
    })
}

fn check(response: Response) -> Result<Response, CatalogError> {
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    classify_status(response.status(), retry_after)?;
    Ok(response)
}

fn tracks_from_items(items: Vec<TrackItem>) -> Vec<Track> {
    items.into_iter().filter_map(|i| i.track).collect()
}

fn market_query(market: Option<&str>, limit: u32) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", limit.to_string())];
    if let Some(market) = market {
        query.push(("country", market.to_string()));
    }
    query
}

/// Spotify Web API transport authenticated with a bearer token.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    token: String,
}

impl SpotifyClient {
    /// Builds a client whose requests are bounded by `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let body = check(response)?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn send_ids(&self, method: Method, path: &str, ids: &[String]) -> Result<(), CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "ids": ids }))
            .send()
            .await?;

        check(response)?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn recently_played(&self, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let page: Page<TrackItem> = self
            .get("/me/player/recently-played", &[("limit", limit.to_string())])
            .await?;
        Ok(tracks_from_items(page.items))
    }

    async fn saved_tracks(&self, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let page: Page<TrackItem> = self.get("/me/tracks", &[("limit", limit.to_string())]).await?;
        Ok(tracks_from_items(page.items))
    }

    async fn top_tracks(&self, range: TimeRange, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let page: Page<Track> = self
            .get(
                "/me/top/tracks",
                &[
                    ("limit", limit.to_string()),
                    ("time_range", range.as_str().to_string()),
                ],
            )
            .await?;
        Ok(page.items)
    }

    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        market: &str,
    ) -> Result<Vec<Track>, CatalogError> {
        let res: SearchResponse = self
            .get(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                    ("market", market.to_string()),
                ],
            )
            .await?;
        Ok(res.tracks.map(|p| p.items).unwrap_or_default())
    }

    async fn artists(&self, ids: &[String]) -> Result<Vec<Artist>, CatalogError> {
        let res: ArtistsResponse = self.get("/artists", &[("ids", ids.join(","))]).await?;
        Ok(res.artists.into_iter().flatten().collect())
    }

    async fn artist_top_tracks(
        &self,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<Track>, CatalogError> {
        let res: ArtistTopTracksResponse = self
            .get(
                &format!("/artists/{}/top-tracks", artist_id),
                &[("market", market.to_string())],
            )
            .await?;
        Ok(res.tracks)
    }

    async fn audio_features(
        &self,
        ids: &[String],
    ) -> Result<Vec<TrackAudioFeatures>, CatalogError> {
        let res: AudioFeaturesResponse = self.get("/audio-features", &[("ids", ids.join(","))]).await?;
        Ok(res.audio_features.into_iter().flatten().collect())
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Vec<Track>, CatalogError> {
        let page: Page<TrackItem> = self
            .get(
                &format!("/playlists/{}/tracks", playlist_id),
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(tracks_from_items(page.items))
    }

    async fn user_playlists(&self, limit: u32) -> Result<Vec<Playlist>, CatalogError> {
        let page: Page<Option<Playlist>> = self
            .get("/me/playlists", &[("limit", limit.to_string())])
            .await?;
        Ok(page.items.into_iter().flatten().collect())
    }

    async fn categories(
        &self,
        market: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Category>, CatalogError> {
        let res: CategoriesResponse = self
            .get("/browse/categories", &market_query(market, limit))
            .await?;
        Ok(res.categories.items)
    }

    async fn category_playlists(
        &self,
        category_id: &str,
        market: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Playlist>, CatalogError> {
        let res: PlaylistsResponse = self
            .get(
                &format!("/browse/categories/{}/playlists", category_id),
                &market_query(market, limit),
            )
            .await?;
        Ok(res.playlists.items.into_iter().flatten().collect())
    }

    async fn featured_playlists(
        &self,
        market: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Playlist>, CatalogError> {
        let res: PlaylistsResponse = self
            .get("/browse/featured-playlists", &market_query(market, limit))
            .await?;
        Ok(res.playlists.items.into_iter().flatten().collect())
    }

    async fn contains_saved(&self, ids: &[String]) -> Result<Vec<bool>, CatalogError> {
        self.get("/me/tracks/contains", &[("ids", ids.join(","))]).await
    }

    async fn save_tracks(&self, ids: &[String]) -> Result<(), CatalogError> {
        self.send_ids(Method::PUT, "/me/tracks", ids).await
    }

    async fn remove_saved_tracks(&self, ids: &[String]) -> Result<(), CatalogError> {
        self.send_ids(Method::DELETE, "/me/tracks", ids).await
    }
}
