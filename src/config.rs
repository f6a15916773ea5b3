//! Configuration management for moodlist.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Spotify endpoints and OAuth settings are plain
//! accessors; everything that tunes the playlist pipeline (timeouts, retry policy,
//! market, display budget) is gathered once into [`Settings`].
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::error::AppError;

/// Maximum number of ids accepted by Spotify's batch endpoints.
pub const BATCH_SIZE: usize = 50;

/// Page size used for every track search.
pub const SEARCH_PAGE_SIZE: u32 = 10;

/// Page size used for every history read.
pub const HISTORY_PAGE_SIZE: u32 = 50;

/// Upper bound for the number of tracks shown per generation.
pub const MAX_DISPLAY_LIMIT: usize = 20;

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_SCOPE: &str = "user-read-recently-played user-top-read user-library-read user-library-modify playlist-read-private";

/// Returns the moodlist directory inside the platform's local data directory.
///
/// - Linux: `~/.local/share/moodlist`
/// - macOS: `~/Library/Application Support/moodlist`
/// - Windows: `%LOCALAPPDATA%/moodlist`
///
/// `MOODLIST_DATA_DIR` overrides the location.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var("MOODLIST_DATA_DIR") {
        return PathBuf::from(dir);
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodlist");
    path
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist. A missing `.env` file is not
/// an error: every setting has a default except the Spotify client id, which is
/// only needed for `moodlist auth`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), AppError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| AppError::Config(e.to_string()))?;
    }
    Ok(())
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Returns the address the local OAuth callback server binds to.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID for authentication.
///
/// # Errors
///
/// Returns [`AppError::Config`] when `SPOTIFY_API_AUTH_CLIENT_ID` is not set.
pub fn spotify_client_id() -> Result<String, AppError> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .map_err(|_| AppError::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string()))
}

/// Returns the Spotify OAuth redirect URI. It must match the redirect URI
/// registered in the Spotify application settings.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the scopes requested during login. The playlist pipeline needs read
/// access to history, top tracks and the library; `like`/`unlike` need
/// `user-library-modify`.
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Retry behavior shared by every catalog call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after a 429 before the call is given up.
    pub max_retries: u32,
    /// Fixed wait before each retry.
    pub backoff: Duration,
    /// Number of ids a batch chunk shrinks to when it is retried.
    pub retry_batch_size: usize,
    /// Upper bound for a single catalog call, retries excluded.
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: Duration::from_millis(1000),
            retry_batch_size: 10,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Runtime settings for the playlist pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    /// Market used for searches and artist top tracks.
    pub market: String,
    /// Maximum number of tracks shown per generation, at most
    /// [`MAX_DISPLAY_LIMIT`].
    pub display_limit: usize,
    pub retry: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            market: "US".to_string(),
            display_limit: MAX_DISPLAY_LIMIT,
            retry: RetryPolicy::default(),
        }
    }
}

impl Settings {
    /// Reads the `MOODLIST_*` variables, falling back to defaults for anything
    /// unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Settings::default();
        let retry = RetryPolicy {
            max_retries: parse_or("MOODLIST_MAX_RETRIES", defaults.retry.max_retries),
            backoff: Duration::from_millis(parse_or(
                "MOODLIST_RETRY_BACKOFF_MS",
                defaults.retry.backoff.as_millis() as u64,
            )),
            retry_batch_size: parse_or(
                "MOODLIST_RETRY_BATCH_SIZE",
                defaults.retry.retry_batch_size,
            )
            .max(1),
            request_timeout: Duration::from_secs(parse_or(
                "MOODLIST_REQUEST_TIMEOUT_SECS",
                defaults.retry.request_timeout.as_secs(),
            )),
        };

        Self {
            api_url: spotify_apiurl(),
            market: var_or("MOODLIST_MARKET", &defaults.market).to_uppercase(),
            display_limit: parse_or("MOODLIST_DISPLAY_LIMIT", defaults.display_limit)
                .clamp(1, MAX_DISPLAY_LIMIT),
            retry,
        }
    }
}
