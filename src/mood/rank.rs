use std::collections::HashSet;

use tracing::debug;

use crate::{
    mood::{Language, Mood, classify},
    spotify::CatalogClient,
    types::Track,
    utils,
};

/// Deduplicates `tracks`, attaches audio features where the catalog grants
/// them and keeps the tracks that fit both mood and language.
pub async fn score_candidates(
    catalog: &CatalogClient,
    tracks: Vec<Track>,
    mood: Mood,
    language: Language,
) -> Vec<Track> {
    let unique = utils::dedupe_tracks(tracks);
    let enriched = catalog.with_audio_features(&unique).await;
    let ranked = classify::filter_by_mood_and_language(&enriched, mood, language);
    debug!(
        candidates = unique.len(),
        matched = ranked.len(),
        "candidates scored"
    );
    ranked
}

/// Drops tracks already shown for the mood, unless that would leave nothing.
pub fn exclude_shown(tracks: Vec<Track>, shown: &HashSet<String>) -> Vec<Track> {
    let unseen: Vec<Track> = tracks
        .iter()
        .filter(|t| !shown.contains(&t.id))
        .cloned()
        .collect();

    if unseen.is_empty() {
        debug!("every candidate was shown before, ignoring shown tracks");
        tracks
    } else {
        unseen
    }
}

/// Final display selection: shown-track exclusion, shuffle, budget.
pub fn select_for_display(tracks: Vec<Track>, shown: &HashSet<String>, limit: usize) -> Vec<Track> {
    let mut selected = exclude_shown(utils::dedupe_tracks(tracks), shown);
    utils::shuffle(&mut selected);
    selected.truncate(limit);
    selected
}
