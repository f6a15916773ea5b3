mod common;

use std::collections::HashMap;

use common::{features, ids, track};
use moodlist::mood::{Language, Mood, classify::*};
use moodlist::types::Track;

fn with_album(mut t: Track, album: &str) -> Track {
    t.album.name = album.to_string();
    t
}

#[test]
fn test_mood_parses_case_insensitively() {
    assert_eq!("happy".parse::<Mood>(), Ok(Mood::Happy));
    assert_eq!(" Chill ".parse::<Mood>(), Ok(Mood::Chill));
    assert_eq!("ANGRY".parse::<Mood>(), Ok(Mood::Angry));
    assert!("bored".parse::<Mood>().is_err());
    assert_eq!(Mood::Sad.to_string(), "sad");
    assert_eq!(Mood::Sad.title(), "Sad");
}

#[test]
fn test_score_by_keyword_matches_name_artist_and_album() {
    assert!(score_by_keyword(&track("t1", "Sunny Afternoon", "Someone"), Mood::Happy));
    assert!(score_by_keyword(&track("t2", "Song", "The Lonely Hearts"), Mood::Sad));
    assert!(score_by_keyword(
        &with_album(track("t3", "Song", "Someone"), "Mellow Evenings"),
        Mood::Chill
    ));
    assert!(!score_by_keyword(&track("t4", "Song", "Someone"), Mood::Angry));
}

#[test]
fn test_score_by_keyword_is_case_insensitive() {
    assert!(score_by_keyword(&track("t1", "RAGE Against", "X"), Mood::Angry));
}

#[test]
fn test_audio_predicate_happy() {
    let t = track("t1", "Song", "X").with_audio_features(features(0.8, 0.7, 0.7, 0.2));
    assert_eq!(score_by_audio_features(&t, Mood::Happy), Some(true));
    assert_eq!(score_by_audio_features(&t, Mood::Sad), Some(false));
}

#[test]
fn test_audio_predicate_boundaries_are_inclusive() {
    // happy: valence >= 0.6, energy >= 0.5, danceability >= 0.5, acousticness <= 0.7
    assert!(matches_audio(&features(0.6, 0.5, 0.5, 0.7), Mood::Happy));
    assert!(!matches_audio(&features(0.59, 0.5, 0.5, 0.7), Mood::Happy));

    // chill: valence within [0.3, 0.7]
    assert!(matches_audio(&features(0.3, 0.5, 0.0, 0.4), Mood::Chill));
    assert!(matches_audio(&features(0.7, 0.2, 0.0, 0.9), Mood::Chill));
    assert!(!matches_audio(&features(0.71, 0.2, 0.0, 0.9), Mood::Chill));

    // sad and angry
    assert!(matches_audio(&features(0.4, 0.5, 0.1, 0.3), Mood::Sad));
    assert!(matches_audio(&features(0.5, 0.7, 0.4, 0.3), Mood::Angry));
    assert!(!matches_audio(&features(0.5, 0.69, 0.4, 0.3), Mood::Angry));
}

#[test]
fn test_score_by_audio_features_without_features() {
    let t = track("t1", "Song", "X");
    assert_eq!(score_by_audio_features(&t, Mood::Happy), None);
}

#[test]
fn test_detect_language_bollywood_is_hindi() {
    let tracks = vec![
        with_album(track("t1", "Tum Hi Ho", "Arijit Singh"), "Bollywood Love"),
        with_album(track("t2", "Kesariya", "Arijit Singh"), "Hindi Hits"),
        with_album(track("t3", "Song", "Someone"), "Desi Nights"),
        track("t4", "Rock Anthem", "Band"),
    ];
    assert_eq!(detect_language(&tracks), Language::Hindi);
}

#[test]
fn test_detect_language_defaults_to_english() {
    assert_eq!(detect_language(&[]), Language::English);
    assert_eq!(detect_language(&[track("t1", "Song", "X")]), Language::English);
}

#[test]
fn test_detect_language_tie_resolves_to_english() {
    let tracks = vec![
        track("t1", "Samba de Janeiro", "X"),
        track("t2", "Deutsch Lied", "Y"),
    ];
    assert_eq!(detect_language(&tracks), Language::English);
}

#[test]
fn test_filter_by_mood_is_union_in_original_order() {
    let tracks = vec![
        track("t1", "Plain", "X").with_audio_features(features(0.9, 0.9, 0.9, 0.1)),
        track("t2", "Nothing", "Y"),
        track("t3", "Happy Song", "Z"),
        track("t1", "Plain", "X"),
        track("t4", "Still Nothing", "W").with_audio_features(features(0.1, 0.1, 0.1, 0.9)),
    ];

    let happy = filter_by_mood(&tracks, Mood::Happy);
    assert_eq!(ids(&happy), vec!["t1", "t3"]);
}

#[test]
fn test_filter_by_language() {
    let tracks = vec![
        track("t1", "K-Pop Star", "X"),
        track("t2", "Song", "Y"),
        track("t3", "Korean Nights", "Z"),
    ];
    assert_eq!(
        ids(&filter_by_language(&tracks, Language::Korean)),
        vec!["t1", "t3"]
    );
}

#[test]
fn test_filter_by_mood_and_language_widens_when_few_language_matches() {
    let tracks = vec![
        track("t1", "Happy", "X"),
        track("t2", "Happy Bollywood", "Y"),
        track("t3", "Joy", "Z"),
        track("t4", "Nothing", "W"),
        track("t5", "Party Hindi", "V"),
    ];

    let result = filter_by_mood_and_language(&tracks, Mood::Happy, Language::Hindi);
    assert_eq!(ids(&result), vec!["t2", "t5", "t1", "t3"]);
}

#[test]
fn test_filter_by_mood_and_language_keeps_language_only_when_enough() {
    let mut tracks: Vec<Track> = (0..12)
        .map(|i| track(&format!("h{}", i), "Happy Bollywood", "X"))
        .collect();
    tracks.push(track("plain", "Happy", "Y"));

    let result = filter_by_mood_and_language(&tracks, Mood::Happy, Language::Hindi);
    assert_eq!(result.len(), 12);
    assert!(result.iter().all(|t| t.id != "plain"));
}

#[test]
fn test_genre_heuristic_exclusion_wins() {
    let mut genres: HashMap<String, Vec<String>> = HashMap::new();
    genres.insert("artist_dj".to_string(), vec!["edm".to_string()]);
    genres.insert("artist_crooner".to_string(), vec!["dance pop".to_string()]);
    genres.insert("artist_nobody".to_string(), vec!["polka".to_string()]);

    let tracks = vec![
        track("t1", "Floor Filler", "DJ"),
        track("t2", "Sad Goodbye", "Crooner"),
        track("t3", "Tune", "Nobody"),
        track("t4", "Feel Good Inc", "Nobody"),
    ];

    let result = filter_by_genre_heuristic(&tracks, Mood::Happy, &genres);
    assert_eq!(ids(&result), vec!["t1", "t4"]);
}

#[test]
fn test_genre_heuristic_angry_excludes_piano() {
    let mut genres: HashMap<String, Vec<String>> = HashMap::new();
    genres.insert("artist_a".to_string(), vec!["metal".to_string()]);

    let tracks = vec![
        track("t1", "Riff", "A"),
        track("t2", "Piano Interlude", "A"),
    ];

    let result = filter_by_genre_heuristic(&tracks, Mood::Angry, &genres);
    assert_eq!(ids(&result), vec!["t1"]);
}
