use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    config::Settings,
    management::ShownTracks,
    mood::{Display, DisplaySink, Generated, Language, Mood, PlaybackQueue, Stage, classify},
    spotify::CatalogClient,
    types::Track,
};

/// Identifies one generation request. Only the latest token may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationToken(u64);

#[derive(Debug, Default)]
struct SessionState {
    mood: Option<Mood>,
    language: Language,
    all_tracks: Vec<Track>,
    current_tracks: Vec<Track>,
    queue: PlaybackQueue,
}

/// Everything one user session shares across generations: the catalog
/// gateway with its capability flags, the shown-track store, pipeline
/// settings and the last displayed result.
pub struct Session {
    catalog: CatalogClient,
    shown: ShownTracks,
    settings: Settings,
    generation: AtomicU64,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(catalog: CatalogClient, shown: ShownTracks, settings: Settings) -> Self {
        Self {
            catalog,
            shown,
            settings,
            generation: AtomicU64::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn shown(&self) -> &ShownTracks {
        &self.shown
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Starts a new generation. Every earlier token becomes stale.
    pub fn begin_generation(&self) -> GenerationToken {
        GenerationToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }

    pub async fn language(&self) -> Language {
        self.state.lock().await.language
    }

    pub async fn mood(&self) -> Option<Mood> {
        self.state.lock().await.mood
    }

    pub async fn current_tracks(&self) -> Vec<Track> {
        self.state.lock().await.current_tracks.clone()
    }

    /// Publishes the result of generation `token`.
    ///
    /// Under the session lock: a stale token is discarded, otherwise the
    /// displayed ids are recorded as shown for `mood`, the session state
    /// (including a newly detected `language`) is updated and `sink`
    /// receives the display.
    pub async fn commit(
        &self,
        token: GenerationToken,
        mood: Mood,
        stage: Option<Stage>,
        display: Display,
        language: Option<Language>,
        sink: &dyn DisplaySink,
    ) -> Generated {
        let mut state = self.state.lock().await;
        if !self.is_current(token) {
            debug!(token = token.0, "discarding result of a stale generation");
            return Generated::Stale;
        }

        if let Display::Tracks { tracks, .. } = &display {
            let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
            if let Err(e) = self.shown.record(mood, &ids).await {
                warn!(%mood, error = %e, "failed to persist shown tracks");
            }
            state.all_tracks = tracks.clone();
            state.current_tracks = tracks.clone();
        }
        if let Some(language) = language {
            state.language = language;
        }
        state.mood = Some(mood);
        state.queue.stop();

        sink.show(&display);
        Generated::Shown { stage, display }
    }

    /// Re-filters the last fetched tracks by keyword for `mood` without
    /// calling the catalog.
    pub async fn refilter(&self, mood: Mood) -> Vec<Track> {
        let mut state = self.state.lock().await;
        let filtered = classify::filter_by_keyword(&state.all_tracks, mood);
        state.mood = Some(mood);
        state.current_tracks = filtered.clone();
        filtered
    }

    /// Builds a shuffled preview queue from the current tracks and returns
    /// its order.
    pub async fn start_shuffle(&self) -> Vec<Track> {
        let mut state = self.state.lock().await;
        let current = state.current_tracks.clone();
        state.queue.start(&current);
        state.queue.tracks().to_vec()
    }

    pub async fn next_in_queue(&self) -> Option<Track> {
        self.state.lock().await.queue.advance().cloned()
    }

    pub async fn stop_shuffle(&self) {
        self.state.lock().await.queue.stop();
    }
}
