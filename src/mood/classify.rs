//! Keyword, audio-feature and genre heuristics.
//!
//! All functions here are pure: they never touch the catalog and never
//! reorder their input. Filters keep the original order and drop duplicate
//! ids.

use std::collections::{HashMap, HashSet};

use crate::{
    mood::{Language, Mood},
    types::{AudioFeatures, Track},
};

/// Below this many language matches, [`filter_by_mood_and_language`] widens
/// its result with the remaining mood matches.
const LANGUAGE_WIDEN_THRESHOLD: usize = 10;

/// Whether the track's name, artists or album mention one of the mood's
/// keywords.
pub fn score_by_keyword(track: &Track, mood: Mood) -> bool {
    let text = track.lexical_text();
    mood.keywords().iter().any(|kw| text.contains(kw))
}

/// Audio-feature thresholds for a mood.
pub fn matches_audio(features: &AudioFeatures, mood: Mood) -> bool {
    let AudioFeatures {
        valence,
        energy,
        danceability,
        acousticness,
    } = *features;

    match mood {
        Mood::Happy => valence >= 0.6 && energy >= 0.5 && danceability >= 0.5 && acousticness <= 0.7,
        Mood::Sad => valence <= 0.4 && energy <= 0.5 && acousticness >= 0.3,
        Mood::Chill => energy <= 0.5 && acousticness >= 0.4 && (0.3..=0.7).contains(&valence),
        Mood::Angry => energy >= 0.7 && valence <= 0.5 && acousticness <= 0.3 && danceability >= 0.4,
    }
}

/// `None` when the track carries no audio features.
pub fn score_by_audio_features(track: &Track, mood: Mood) -> Option<bool> {
    track.audio_features.as_ref().map(|f| matches_audio(f, mood))
}

/// Infers the dominant language of `tracks`.
///
/// Each track adds one vote to every language it shows evidence for. The
/// strictly highest count wins, anything else resolves to English.
pub fn detect_language(tracks: &[Track]) -> Language {
    let mut counts: HashMap<Language, usize> = HashMap::new();
    for track in tracks {
        let text = track.lexical_text();
        for language in Language::ALL {
            if language.matches(&text) {
                *counts.entry(language).or_default() += 1;
            }
        }
    }

    let best = counts.values().copied().max().unwrap_or(0);
    if best == 0 {
        return Language::default();
    }

    let mut leaders = counts.iter().filter(|(_, count)| **count == best);
    match (leaders.next(), leaders.next()) {
        (Some((language, _)), None) => *language,
        _ => Language::default(),
    }
}

fn retain_unique<'a>(tracks: impl Iterator<Item = &'a Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .filter(|t| !t.id.is_empty() && seen.insert(t.id.as_str()))
        .cloned()
        .collect()
}

/// Tracks matching the mood either by keyword or by audio features.
pub fn filter_by_mood(tracks: &[Track], mood: Mood) -> Vec<Track> {
    retain_unique(tracks.iter().filter(|t| {
        score_by_keyword(t, mood) || score_by_audio_features(t, mood).unwrap_or(false)
    }))
}

/// Keyword-only mood filter, used where audio features are never fetched.
pub fn filter_by_keyword(tracks: &[Track], mood: Mood) -> Vec<Track> {
    retain_unique(tracks.iter().filter(|t| score_by_keyword(t, mood)))
}

pub fn filter_by_language(tracks: &[Track], language: Language) -> Vec<Track> {
    retain_unique(
        tracks
            .iter()
            .filter(|t| language.matches(&t.lexical_text())),
    )
}

/// Mood filter narrowed by language.
///
/// When fewer than ten tracks match the language, the remaining mood matches
/// are appended after the language matches.
pub fn filter_by_mood_and_language(tracks: &[Track], mood: Mood, language: Language) -> Vec<Track> {
    let by_mood = filter_by_mood(tracks, mood);
    let by_language = filter_by_language(&by_mood, language);

    if by_language.len() >= LANGUAGE_WIDEN_THRESHOLD {
        return by_language;
    }

    retain_unique(by_language.iter().chain(by_mood.iter()))
}

/// Genre-aware mood filter.
///
/// A track is dropped when its name, album or any of its artists' genres
/// contains an exclusion term, and kept when one of them contains an
/// inclusion term.
pub fn filter_by_genre_heuristic(
    tracks: &[Track],
    mood: Mood,
    genres_by_artist: &HashMap<String, Vec<String>>,
) -> Vec<Track> {
    let include = mood.genre_include();
    let exclude = mood.genre_exclude();

    retain_unique(tracks.iter().filter(|t| {
        let text = format!("{} {}", t.name, t.album.name).to_lowercase();
        let genres: Vec<String> = t
            .artists
            .iter()
            .filter_map(|a| genres_by_artist.get(&a.id))
            .flatten()
            .map(|g| g.to_lowercase())
            .collect();

        let hit = |term: &&str| text.contains(term) || genres.iter().any(|g| g.contains(term));

        !exclude.iter().any(hit) && include.iter().any(hit)
    }))
}
