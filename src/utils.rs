use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric, seq::SliceRandom};
use sha2::{Digest, Sha256};

use crate::types::Track;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Drops tracks without an id and every repeated id after its first
/// occurrence.
pub fn dedupe_tracks(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen_ids = HashSet::new();
    tracks
        .into_iter()
        .filter(|t| !t.id.is_empty() && seen_ids.insert(t.id.clone()))
        .collect()
}

/// Uniform in-place shuffle.
pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut rand::rng());
}

/// Cuts `text` to at most `max` characters, marking the cut with "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
