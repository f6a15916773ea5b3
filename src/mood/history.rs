use tracing::debug;

use crate::{
    config::HISTORY_PAGE_SIZE,
    spotify::CatalogClient,
    types::{TimeRange, Track},
    utils,
};

/// Top-track windows read by [`collect`], in order.
pub const HISTORY_RANGES: [TimeRange; 3] =
    [TimeRange::ShortTerm, TimeRange::MediumTerm, TimeRange::LongTerm];

/// Per-source track counts of one history read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub recently_played: usize,
    pub saved: usize,
    pub top_short_term: usize,
    pub top_medium_term: usize,
    pub top_long_term: usize,
    /// Unique tracks after deduplication.
    pub unique: usize,
}

/// The user's listening history: recently played, saved, then top tracks for
/// each time range, deduplicated by id.
///
/// Every source is read independently; a failing source contributes nothing.
/// An empty result is a valid outcome.
pub async fn collect(catalog: &CatalogClient) -> Vec<Track> {
    collect_with_summary(catalog).await.0
}

pub async fn collect_with_summary(catalog: &CatalogClient) -> (Vec<Track>, HistorySummary) {
    let mut summary = HistorySummary::default();
    let mut all = Vec::new();

    let recent = catalog.recently_played(HISTORY_PAGE_SIZE).await.items();
    summary.recently_played = recent.len();
    all.extend(recent);

    let saved = catalog.saved_tracks(HISTORY_PAGE_SIZE).await.items();
    summary.saved = saved.len();
    all.extend(saved);

    for range in HISTORY_RANGES {
        let top = catalog.top_tracks(range, HISTORY_PAGE_SIZE).await.items();
        match range {
            TimeRange::ShortTerm => summary.top_short_term = top.len(),
            TimeRange::MediumTerm => summary.top_medium_term = top.len(),
            TimeRange::LongTerm => summary.top_long_term = top.len(),
        }
        all.extend(top);
    }

    let tracks = utils::dedupe_tracks(all);
    summary.unique = tracks.len();
    debug!(?summary, "history collected");

    (tracks, summary)
}
