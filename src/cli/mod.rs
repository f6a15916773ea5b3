//! # CLI Module
//!
//! Command implementations behind the `moodlist` binary. Each command sets up
//! what it needs (token, catalog gateway, session), calls into the library and
//! prints the outcome with the crate's output macros.
//!
//! ## Commands
//!
//! - [`auth`] - PKCE login, stores the token under the local data directory
//! - [`generate`] - runs the mood pipeline and prints the resulting playlist
//! - [`liked`], [`like`], [`unlike`] - the user's saved tracks
//! - [`shown`] - inspects or resets the per-mood shown-track state
//! - [`info`] - history counts, detected language and shown-track totals
//!
//! ## Usage
//!
//! ```bash
//! moodlist auth
//! moodlist generate chill
//! moodlist generate happy --shuffle
//! moodlist shown chill --clear
//! ```

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Settings,
    error,
    management::{ShownTracks, TokenManager},
    mood::Session,
    spotify::{CatalogClient, SpotifyClient},
    types::{Track, TrackTableRow},
    utils,
};

mod auth;
mod generate;
mod info;
mod library;
mod shown;

pub use auth::auth;
pub use generate::generate;
pub use info::info;
pub use library::{like, liked, unlike};
pub use shown::shown;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Catalog gateway authenticated with the stored token. Exits when no token
/// is available.
async fn catalog(settings: &Settings) -> CatalogClient {
    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => error!("{}", e),
    };
    let token = token_mgr.get_valid_token().await;

    let client = match SpotifyClient::new(
        settings.api_url.clone(),
        token,
        settings.retry.request_timeout,
    ) {
        Ok(c) => c,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    CatalogClient::new(Arc::new(client), settings.retry.clone())
}

async fn session() -> Session {
    let settings = Settings::from_env();
    let catalog = catalog(&settings).await;
    Session::new(catalog, ShownTracks::from_data_dir(), settings)
}

/// Prints `tracks` as a table, marking the ones in the user's library.
async fn print_tracks(catalog: &CatalogClient, tracks: &[Track]) {
    let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let saved = catalog.saved_status(&ids).await;

    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .zip(saved)
        .enumerate()
        .map(|(i, (t, is_saved))| TrackTableRow {
            position: i + 1,
            name: utils::truncate(&t.name, 40),
            artists: utils::truncate(&t.artist_names(), 30),
            album: utils::truncate(&t.album.name, 30),
            saved: if is_saved { "♥".to_string() } else { String::new() },
            id: t.id.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
