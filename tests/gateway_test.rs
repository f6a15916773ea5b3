mod common;

use std::{sync::Arc, time::Duration};

use common::{FakeCatalog, client, features, playlist, track};
use moodlist::{
    error::{CatalogError, Failure},
    spotify::{Capability, CatalogClient, Fetch, classify_status},
};
use reqwest::StatusCode;

fn track_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("t{}", i)).collect()
}

#[test]
fn test_classify_status() {
    assert_eq!(classify_status(StatusCode::OK, None), Ok(()));
    assert_eq!(classify_status(StatusCode::NO_CONTENT, None), Ok(()));
    assert_eq!(
        classify_status(StatusCode::UNAUTHORIZED, None),
        Err(CatalogError::Unauthorized)
    );
    assert_eq!(
        classify_status(StatusCode::FORBIDDEN, None),
        Err(CatalogError::Forbidden)
    );
    assert_eq!(
        classify_status(StatusCode::TOO_MANY_REQUESTS, Some(3)),
        Err(CatalogError::RateLimited {
            retry_after: Some(3)
        })
    );
    assert_eq!(
        classify_status(StatusCode::NOT_FOUND, None),
        Err(CatalogError::NotFound)
    );
    assert_eq!(
        classify_status(StatusCode::BAD_GATEWAY, None),
        Err(CatalogError::Server(502))
    );
    assert_eq!(
        classify_status(StatusCode::BAD_REQUEST, None),
        Err(CatalogError::Status(400))
    );
}

#[test]
fn test_failure_taxonomy() {
    assert_eq!(CatalogError::Forbidden.failure(), Failure::CapabilityDenied);
    assert_eq!(
        CatalogError::RateLimited { retry_after: None }.failure(),
        Failure::RateLimited
    );
    assert_eq!(CatalogError::Unauthorized.failure(), Failure::Unauthorized);
    assert_eq!(CatalogError::Server(500).failure(), Failure::Transient);
    assert_eq!(CatalogError::Decode("eof".into()).failure(), Failure::Transient);
    assert_eq!(CatalogError::Timeout.failure(), Failure::Transient);
}

#[tokio::test]
async fn test_successful_call_returns_data() {
    let mut fake = FakeCatalog::new();
    fake.recently_played = vec![track("t1", "Song", "A")];
    let fake = Arc::new(fake);

    let result = client(&fake).recently_played(50).await;
    assert!(result.is_data());
    assert_eq!(result.items().len(), 1);
}

#[tokio::test]
async fn test_forbidden_disables_capability_for_the_session() {
    let mut fake = FakeCatalog::new();
    fake.features.insert("t0".to_string(), features(0.5, 0.5, 0.5, 0.5));
    let fake = Arc::new(fake);
    fake.fail("audio_features", CatalogError::Forbidden);

    let catalog = client(&fake);
    let first = catalog.audio_features(&track_ids(3)).await;
    assert_eq!(first, Fetch::Unavailable(Failure::CapabilityDenied));
    assert!(!catalog.capabilities().is_enabled(Capability::AudioFeatures).await);

    // The second call must not reach the transport.
    let second = catalog.audio_features(&track_ids(3)).await;
    assert_eq!(second, Fetch::Unavailable(Failure::CapabilityDenied));
    assert_eq!(fake.calls_to("audio_features").len(), 1);

    // Other capabilities are unaffected.
    assert!(catalog.capabilities().is_enabled(Capability::Search).await);
    assert_eq!(
        catalog.capabilities().disabled().await,
        vec![Capability::AudioFeatures]
    );
}

#[tokio::test]
async fn test_forbidden_playlist_tracks_keep_user_playlists() {
    let mut fake = FakeCatalog::new();
    fake.user_playlists = vec![playlist("p1", "My Mix", "")];
    let fake = Arc::new(fake);
    fake.fail("playlist_tracks", CatalogError::Forbidden);
    let catalog = client(&fake);

    assert_eq!(
        catalog.playlist_tracks("other", 20).await,
        Fetch::Unavailable(Failure::CapabilityDenied)
    );
    assert_eq!(catalog.user_playlists(20).await.items().len(), 1);
    assert_eq!(
        catalog.capabilities().disabled().await,
        vec![Capability::PlaylistTracks]
    );
}

#[tokio::test]
async fn test_forbidden_category_playlists_keep_featured() {
    let mut fake = FakeCatalog::new();
    fake.featured = vec![playlist("f1", "Hits", "")];
    let fake = Arc::new(fake);
    fake.fail("category_playlists", CatalogError::Forbidden);
    let catalog = client(&fake);

    assert!(!catalog.category_playlists("pop", Some("US"), 10).await.is_data());
    assert_eq!(
        catalog.featured_playlists(Some("US"), 20).await.items().len(),
        1
    );
    assert!(catalog.categories(Some("US"), 20).await.is_data());
}

#[tokio::test]
async fn test_forbidden_artist_top_tracks_keep_genre_lookup() {
    let mut fake = FakeCatalog::new();
    fake.artists.insert(
        "a1".to_string(),
        moodlist::types::Artist {
            id: "a1".to_string(),
            name: "A".to_string(),
            genres: vec!["indie".to_string()],
        },
    );
    let fake = Arc::new(fake);
    fake.fail("artist_top_tracks", CatalogError::Forbidden);
    let catalog = client(&fake);

    assert!(!catalog.artist_top_tracks("a1", "US").await.is_data());
    let genres = catalog.genres_by_artist(&["a1".to_string()]).await;
    assert_eq!(genres["a1"], vec!["indie"]);
}

#[tokio::test]
async fn test_forbidden_is_never_retried() {
    let fake = Arc::new(FakeCatalog::new());
    fake.fail("recently_played", CatalogError::Forbidden);

    let result = client(&fake).recently_played(50).await;
    assert_eq!(result, Fetch::Unavailable(Failure::CapabilityDenied));
    assert_eq!(fake.calls_to("recently_played").len(), 1);
}

#[tokio::test]
async fn test_rate_limited_batch_retries_once_with_smaller_batch() {
    let mut fake = FakeCatalog::new();
    for id in track_ids(50) {
        fake.features.insert(id, features(0.5, 0.5, 0.5, 0.5));
    }
    let fake = Arc::new(fake);
    fake.fail(
        "audio_features",
        CatalogError::RateLimited { retry_after: None },
    );

    let result = client(&fake).audio_features(&track_ids(50)).await;

    assert_eq!(fake.calls_to("audio_features"), vec!["50", "10"]);
    assert_eq!(result.items().len(), 10);
}

#[tokio::test]
async fn test_rate_limited_twice_gives_up_silently() {
    let fake = Arc::new(FakeCatalog::new());
    fake.fail_always(
        "search_tracks",
        CatalogError::RateLimited { retry_after: None },
        2,
    );

    let result = client(&fake).search_tracks("happy pop", 10, 0, "US").await;

    assert_eq!(result, Fetch::Unavailable(Failure::RateLimited));
    assert_eq!(fake.calls_to("search_tracks").len(), 2);
}

#[tokio::test]
async fn test_batches_are_chunked_by_fifty() {
    let fake = Arc::new(FakeCatalog::new());

    let flags = client(&fake).saved_status(&track_ids(120)).await;

    assert_eq!(flags.len(), 120);
    assert_eq!(fake.calls_to("contains_saved"), vec!["50", "50", "20"]);
}

#[tokio::test]
async fn test_failed_chunk_is_skipped() {
    let mut fake = FakeCatalog::new();
    for id in track_ids(60) {
        fake.features.insert(id, features(0.5, 0.5, 0.5, 0.5));
    }
    let fake = Arc::new(fake);
    fake.fail("audio_features", CatalogError::Server(503));

    let result = client(&fake).audio_features(&track_ids(60)).await;

    // First chunk of 50 failed, the remaining 10 made it.
    assert!(result.is_data());
    assert_eq!(result.items().len(), 10);
}

#[tokio::test]
async fn test_saved_status_all_false_on_failure() {
    let fake = Arc::new(FakeCatalog::new());
    fake.library.lock().unwrap().insert("t1".to_string());
    fake.fail("contains_saved", CatalogError::Network("reset".into()));

    let flags = client(&fake).saved_status(&track_ids(3)).await;
    assert_eq!(flags, vec![false, false, false]);
}

#[tokio::test]
async fn test_saved_status_in_order() {
    let fake = Arc::new(FakeCatalog::new());
    fake.library.lock().unwrap().insert("t1".to_string());

    let flags = client(&fake).saved_status(&track_ids(3)).await;
    assert_eq!(flags, vec![false, true, false]);
}

#[tokio::test]
async fn test_stalled_transport_times_out() {
    let mut fake = FakeCatalog::new();
    fake.recently_played = vec![track("t1", "Song", "A")];
    fake.delay = Some(Duration::from_secs(5));
    let fake = Arc::new(fake);

    let result = client(&fake).recently_played(50).await;
    assert_eq!(result, Fetch::Unavailable(Failure::Transient));
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let fake = Arc::new(FakeCatalog::new());
    fake.fail("saved_tracks", CatalogError::Unauthorized);

    let catalog: CatalogClient = client(&fake);
    let result = catalog.saved_tracks(50).await;

    assert_eq!(result, Fetch::Unavailable(Failure::Unauthorized));
    assert_eq!(fake.calls_to("saved_tracks").len(), 1);
    assert!(catalog.capabilities().is_enabled(Capability::SavedTracks).await);
}

#[tokio::test]
async fn test_with_audio_features_attaches_where_available() {
    let mut fake = FakeCatalog::new();
    fake.features.insert("t1".to_string(), features(0.9, 0.9, 0.9, 0.1));
    let fake = Arc::new(fake);

    let tracks = vec![track("t1", "A", "X"), track("t2", "B", "Y")];
    let enriched = client(&fake).with_audio_features(&tracks).await;

    assert!(enriched[0].audio_features.is_some());
    assert!(enriched[1].audio_features.is_none());
}

#[tokio::test]
async fn test_like_and_unlike() {
    let fake = Arc::new(FakeCatalog::new());
    let catalog = client(&fake);

    assert!(catalog.save_tracks(&["t1".to_string()]).await.is_data());
    assert_eq!(catalog.saved_status(&["t1".to_string()]).await, vec![true]);

    assert!(catalog.remove_saved_tracks(&["t1".to_string()]).await.is_data());
    assert_eq!(catalog.saved_status(&["t1".to_string()]).await, vec![false]);
}
