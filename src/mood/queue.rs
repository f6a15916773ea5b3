use crate::{types::Track, utils};

/// Shuffled preview queue over the displayed tracks.
///
/// Only tracks with a preview URL are queued. Nothing is played; the queue
/// only tracks position.
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    tracks: Vec<Track>,
    position: Option<usize>,
}

impl PlaybackQueue {
    /// Replaces the queue with a shuffled copy of the playable `tracks` and
    /// positions it on the first one. Returns the number of queued tracks.
    pub fn start(&mut self, tracks: &[Track]) -> usize {
        let mut playable: Vec<Track> = utils::dedupe_tracks(
            tracks
                .iter()
                .filter(|t| t.preview_url.as_deref().is_some_and(|u| !u.is_empty()))
                .cloned()
                .collect(),
        );
        utils::shuffle(&mut playable);

        self.position = if playable.is_empty() { None } else { Some(0) };
        self.tracks = playable;
        self.tracks.len()
    }

    /// Moves to the next track, wrapping around at the end.
    pub fn advance(&mut self) -> Option<&Track> {
        let next = (self.position? + 1) % self.tracks.len();
        self.position = Some(next);
        self.tracks.get(next)
    }

    pub fn stop(&mut self) {
        self.tracks.clear();
        self.position = None;
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
