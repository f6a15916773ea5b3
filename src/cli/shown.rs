use crate::{error, info, management::ShownTracks, mood::Mood, success};

/// Prints how many tracks were already shown for `mood`, or forgets them
/// with `clear`.
pub async fn shown(mood: Mood, clear: bool) {
    let store = ShownTracks::from_data_dir();

    if clear {
        if let Err(e) = store.clear(mood).await {
            error!("Failed to reset shown tracks for {}: {}", mood, e);
        }
        success!("Shown tracks for {} were reset.", mood);
        return;
    }

    let count = store.count(mood).await;
    info!("{} tracks shown for {}.", count, mood);
    info!("State file: {}", store.path(mood).display());
}
