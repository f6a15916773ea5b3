//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify Web API lives here, split in three
//! layers:
//!
//! ```text
//! Playlist pipeline (crate::mood)
//!          ↓
//! CatalogClient   fail-soft gateway: capabilities, retry policy, batching
//!          ↓
//! Catalog         typed transport trait
//!          ↓
//! SpotifyClient   reqwest implementation, status classification
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error Handling Philosophy
//!
//! The transport reports every failure as a [`crate::error::CatalogError`].
//! The gateway turns those into [`Fetch::Unavailable`] markers so that no
//! pipeline stage ever has to propagate an error:
//!
//! - **403 Forbidden**: the capability (audio features, browse, ...) is not
//!   granted to this token. It is disabled for the session and never retried.
//! - **429 Too Many Requests**: retried after a fixed backoff, batch calls
//!   retry with a smaller chunk, then the call is skipped.
//! - **Network errors, timeouts, 404, 5xx, malformed JSON**: logged and
//!   treated as an empty result.
//!
//! ## Authentication
//!
//! [`auth`] implements the OAuth 2.0 PKCE login used by `moodlist auth`. The
//! pipeline itself only ever receives the resulting bearer token.
//!
//! ## API Coverage
//!
//! - `GET /me/player/recently-played`, `GET /me/top/tracks`
//! - `GET|PUT|DELETE /me/tracks`, `GET /me/tracks/contains`
//! - `GET /me/playlists`, `GET /playlists/{id}/tracks`
//! - `GET /search`
//! - `GET /artists`, `GET /artists/{id}/top-tracks`
//! - `GET /audio-features`
//! - `GET /browse/categories`, `GET /browse/categories/{id}/playlists`,
//!   `GET /browse/featured-playlists`

pub mod auth;
mod catalog;
mod client;
mod gateway;

pub use catalog::Catalog;
pub use client::{SpotifyClient, classify_status};
pub use gateway::{Capabilities, Capability, CatalogClient, Fetch};
