use std::fmt;

use tracing::debug;

use crate::{
    mood::{
        Language, Mood, Session, classify,
        expand::{self, Expander},
        history, rank,
    },
    types::{Playlist, TimeRange, Track},
};

const STAGE_PAGE_SIZE: u32 = 20;
const DIRECT_TOP_LIMIT: u32 = 10;

/// Ranges tried by [`Stage::TopTracksForMood`], in order.
const MOOD_TOP_RANGES: [TimeRange; 3] =
    [TimeRange::MediumTerm, TimeRange::ShortTerm, TimeRange::LongTerm];

pub const GUIDANCE: &str = "Not enough listening data to build a playlist yet. \
Listen to more music, like the songs you enjoy, use Spotify for a few days or \
create a few playlists, then come back later.";

/// What a generation hands to the user.
#[derive(Debug, Clone)]
pub enum Display {
    Tracks { title: String, tracks: Vec<Track> },
    Playlists { title: String, playlists: Vec<Playlist> },
    Guidance { message: String },
}

impl Display {
    pub fn title(&self) -> &str {
        match self {
            Display::Tracks { title, .. } | Display::Playlists { title, .. } => title,
            Display::Guidance { .. } => "No playlist available",
        }
    }
}

/// Outcome of [`generate`].
#[derive(Debug, Clone)]
pub enum Generated {
    /// `stage` is `None` for the guidance message.
    Shown {
        stage: Option<Stage>,
        display: Display,
    },
    /// A newer generation started before this one finished.
    Stale,
}

/// Receives the display of every committed generation.
pub trait DisplaySink: Send + Sync {
    fn show(&self, display: &Display);
}

/// Fallback stages, tried in [`Stage::ORDER`] until one has something to
/// show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MoodSimilarFromHistory,
    UserPlaylistsMatchingMood,
    RecentlyPlayedForMood,
    SavedTracksForMood,
    TopTracksForMood,
    TopTracksDirect,
    SavedTracksFallback,
}

impl Stage {
    pub const ORDER: [Stage; 7] = [
        Stage::MoodSimilarFromHistory,
        Stage::UserPlaylistsMatchingMood,
        Stage::RecentlyPlayedForMood,
        Stage::SavedTracksForMood,
        Stage::TopTracksForMood,
        Stage::TopTracksDirect,
        Stage::SavedTracksFallback,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::MoodSimilarFromHistory => "mood-similar-from-history",
            Stage::UserPlaylistsMatchingMood => "user-playlists-matching-mood",
            Stage::RecentlyPlayedForMood => "recently-played-for-mood",
            Stage::SavedTracksForMood => "saved-tracks-for-mood",
            Stage::TopTracksForMood => "top-tracks-for-mood",
            Stage::TopTracksDirect => "top-tracks-direct",
            Stage::SavedTracksFallback => "saved-tracks-fallback",
        }
    }

    /// `None` when the stage does not apply or found nothing to show.
    ///
    /// A language detected along the way is stored in `detected`; it only
    /// reaches the session when the generation commits.
    pub async fn run(
        &self,
        session: &Session,
        mood: Mood,
        detected: &mut Option<Language>,
    ) -> Option<Display> {
        match self {
            Stage::MoodSimilarFromHistory => {
                mood_similar_from_history(session, mood, detected).await
            }
            Stage::UserPlaylistsMatchingMood => user_playlists_matching_mood(session, mood).await,
            Stage::RecentlyPlayedForMood => {
                let recent = session
                    .catalog()
                    .recently_played(STAGE_PAGE_SIZE)
                    .await
                    .items();
                let matches = classify::filter_by_keyword(&recent, mood);
                tracks_display(session, mood, "Recently Played Tracks for Your Mood", matches).await
            }
            Stage::SavedTracksForMood => {
                let saved = session.catalog().saved_tracks(STAGE_PAGE_SIZE).await.items();
                let matches = classify::filter_by_keyword(&saved, mood);
                tracks_display(session, mood, "Your Liked Songs for This Mood", matches).await
            }
            Stage::TopTracksForMood => {
                for range in MOOD_TOP_RANGES {
                    let top = session
                        .catalog()
                        .top_tracks(range, STAGE_PAGE_SIZE)
                        .await
                        .items();
                    let matches = classify::filter_by_keyword(&top, mood);
                    if !matches.is_empty() {
                        let title = format!("Your Top {} Tracks", mood.title());
                        return tracks_display(session, mood, &title, matches).await;
                    }
                }
                None
            }
            Stage::TopTracksDirect => {
                let top = session
                    .catalog()
                    .top_tracks(TimeRange::MediumTerm, DIRECT_TOP_LIMIT)
                    .await
                    .items();
                tracks_display(session, mood, "Your Top Tracks", top).await
            }
            Stage::SavedTracksFallback => {
                let saved = session.catalog().saved_tracks(STAGE_PAGE_SIZE).await.items();
                let matches = classify::filter_by_keyword(&saved, mood);
                if matches.is_empty() {
                    tracks_display(session, mood, "Your Liked Songs", saved).await
                } else {
                    tracks_display(session, mood, "Your Liked Songs for This Mood", matches).await
                }
            }
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shown-track exclusion, shuffle and display budget. `None` when nothing
/// is left.
async fn tracks_display(
    session: &Session,
    mood: Mood,
    title: &str,
    tracks: Vec<Track>,
) -> Option<Display> {
    let shown = session.shown().snapshot(mood).await;
    let tracks = rank::select_for_display(tracks, &shown, session.settings().display_limit);
    if tracks.is_empty() {
        return None;
    }
    Some(Display::Tracks {
        title: title.to_string(),
        tracks,
    })
}

async fn mood_similar_from_history(
    session: &Session,
    mood: Mood,
    detected: &mut Option<Language>,
) -> Option<Display> {
    let catalog = session.catalog();
    let history = history::collect(catalog).await;
    if history.is_empty() {
        debug!("no listening history");
        return None;
    }

    let language = classify::detect_language(&history);
    *detected = Some(language);
    debug!(%language, "language detected");

    let seeds = expand::select_seeds(catalog, &history, mood).await;
    let pool = Expander::new(catalog, mood, language, &session.settings().market)
        .expand(&seeds)
        .await;
    if pool.is_empty() {
        return None;
    }

    let ranked = rank::score_candidates(catalog, pool.into_tracks(), mood, language).await;
    let title = format!("Similar {} Songs Based On Your Taste", mood.title());
    tracks_display(session, mood, &title, ranked).await
}

async fn user_playlists_matching_mood(session: &Session, mood: Mood) -> Option<Display> {
    let playlists = session
        .catalog()
        .user_playlists(STAGE_PAGE_SIZE)
        .await
        .items();
    let name = mood.as_str();
    let matching: Vec<Playlist> = playlists
        .into_iter()
        .filter(|p| {
            p.name.to_lowercase().contains(name) || p.description.to_lowercase().contains(name)
        })
        .collect();

    if matching.is_empty() {
        return None;
    }
    Some(Display::Playlists {
        title: "Your Mood Playlists".to_string(),
        playlists: matching,
    })
}

/// Runs the fallback chain for `mood` and commits the first display.
///
/// Ends with [`Display::Guidance`] when every stage comes up empty. Returns
/// [`Generated::Stale`] when another generation started in the meantime.
pub async fn generate(session: &Session, mood: Mood, sink: &dyn DisplaySink) -> Generated {
    let token = session.begin_generation();
    let mut language = None;

    for stage in Stage::ORDER {
        if !session.is_current(token) {
            return Generated::Stale;
        }
        if let Some(display) = stage.run(session, mood, &mut language).await {
            debug!(%stage, %mood, "stage produced a result");
            return session
                .commit(token, mood, Some(stage), display, language, sink)
                .await;
        }
        debug!(%stage, %mood, "stage had nothing to show");
    }

    let guidance = Display::Guidance {
        message: GUIDANCE.to_string(),
    };
    session
        .commit(token, mood, None, guidance, language, sink)
        .await
}
