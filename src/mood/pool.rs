use std::collections::HashSet;

use crate::types::Track;

/// Insertion-ordered accumulator of candidate tracks for one generation.
///
/// The first track seen for an id wins. Tracks without an id are dropped.
#[derive(Debug, Default)]
pub struct CandidatePool {
    tracks: Vec<Track>,
    seen: HashSet<String>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the track was added.
    pub fn push(&mut self, track: Track) -> bool {
        if track.id.is_empty() || !self.seen.insert(track.id.clone()) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Adds every track and returns how many were new.
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        let before = self.tracks.len();
        for track in tracks {
            self.push(track);
        }
        self.tracks.len() - before
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }
}
