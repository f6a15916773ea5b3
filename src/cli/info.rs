use crate::{
    cli, info,
    mood::{Mood, classify, history},
    warning,
};

/// Summarises what the pipeline would work with: history per source, the
/// detected language and the shown-track totals per mood.
pub async fn info() {
    let session = cli::session().await;

    let pb = cli::spinner("Reading listening history...");
    let (tracks, summary) = history::collect_with_summary(session.catalog()).await;
    pb.finish_and_clear();

    info!("Recently played: {}", summary.recently_played);
    info!("Liked songs: {}", summary.saved);
    info!(
        "Top tracks (short/medium/long term): {}/{}/{}",
        summary.top_short_term, summary.top_medium_term, summary.top_long_term
    );
    info!("Unique history tracks: {}", summary.unique);

    if tracks.is_empty() {
        warning!("No listening history yet, playlists will fall back to generic sources.");
    } else {
        info!("Detected language: {}", classify::detect_language(&tracks));
    }

    for mood in Mood::ALL {
        info!("Shown {}: {}", mood, session.shown().count(mood).await);
    }

    let disabled = session.catalog().capabilities().disabled().await;
    if !disabled.is_empty() {
        let names: Vec<String> = disabled.iter().map(|c| c.to_string()).collect();
        warning!("Not available for this account: {}", names.join(", "));
    }
}
