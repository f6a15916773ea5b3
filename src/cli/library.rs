use crate::{
    cli, config::Settings, error, info, spotify::Fetch, success, utils::dedupe_tracks,
};

const LIKED_LIMIT: u32 = 50;

/// Lists the most recently saved tracks.
pub async fn liked() {
    let settings = Settings::from_env();
    let catalog = cli::catalog(&settings).await;

    let pb = cli::spinner("Fetching liked songs...");
    let tracks = dedupe_tracks(catalog.saved_tracks(LIKED_LIMIT).await.items());
    pb.finish_and_clear();

    if tracks.is_empty() {
        info!("No liked songs yet.");
        return;
    }
    info!("Your Liked Songs");
    cli::print_tracks(&catalog, &tracks).await;
}

pub async fn like(id: String) {
    let settings = Settings::from_env();
    let catalog = cli::catalog(&settings).await;

    match catalog.save_tracks(&[id.clone()]).await {
        Fetch::Data(()) => success!("Added {} to your liked songs.", id),
        Fetch::Unavailable(f) => error!("Failed to like {}: {:?}", id, f),
    }
}

pub async fn unlike(id: String) {
    let settings = Settings::from_env();
    let catalog = cli::catalog(&settings).await;

    match catalog.remove_saved_tracks(&[id.clone()]).await {
        Fetch::Data(()) => success!("Removed {} from your liked songs.", id),
        Fetch::Unavailable(f) => error!("Failed to unlike {}: {:?}", id, f),
    }
}
