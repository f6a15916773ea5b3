use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Decodes a JSON `null` as the type's default value.
///
/// Spotify returns `"id": null` for local files and for podcast episodes that
/// slip into track listings. Those tracks decode with an empty id and are
/// dropped before anything is displayed.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleArtist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

/// Provider-computed descriptors of a track, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub valence: f32,
    pub energy: f32,
    pub danceability: f32,
    pub acousticness: f32,
}

/// Audio features as returned by `/audio-features`, keyed by track id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAudioFeatures {
    pub id: String,
    #[serde(flatten)]
    pub features: AudioFeatures,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<SimpleArtist>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub album: AlbumRef,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_urls: ExternalUrls,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_features: Option<AudioFeatures>,
}

impl Track {
    /// Track name, artist names and album name, lower-cased.
    pub fn lexical_text(&self) -> String {
        let artists = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {} {}", self.name, artists, self.album.name).to_lowercase()
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn with_audio_features(&self, features: AudioFeatures) -> Self {
        Self {
            audio_features: Some(features),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tracks: PlaylistTracksRef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Top-track time windows accepted by `/me/top/tracks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

// Wire envelopes. Only the fields the pipeline reads are modelled.

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Page<Track>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistsResponse {
    #[serde(default)]
    pub artists: Vec<Option<Artist>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistTopTracksResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<TrackAudioFeatures>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Page<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistsResponse {
    pub playlists: Page<Option<Playlist>>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub album: String,
    #[tabled(rename = "saved")]
    pub saved: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub description: String,
    pub tracks: u64,
}
