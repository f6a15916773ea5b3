mod common;

use std::collections::BTreeSet;

use common::track;
use moodlist::types::Track;
use moodlist::utils::*;

fn track_without_id(name: &str) -> Track {
    Track {
        name: name.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    assert_eq!(verifier.len(), 128);
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert!(!challenge.is_empty());
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA-256 digest, base64url without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_code_challenge_known_vector() {
    // RFC 7636 appendix B
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn test_dedupe_tracks_keeps_first_occurrence() {
    let tracks = vec![
        track("t1", "First", "A"),
        track("t2", "Second", "B"),
        track("t1", "First again", "C"),
        track("t3", "Third", "D"),
        track("t2", "Second again", "E"),
    ];

    let unique = dedupe_tracks(tracks);

    assert_eq!(unique.len(), 3);
    assert_eq!(unique[0].name, "First");
    assert_eq!(unique[1].name, "Second");
    assert_eq!(unique[2].name, "Third");
}

#[test]
fn test_dedupe_tracks_drops_missing_ids() {
    let tracks = vec![
        track_without_id("local file"),
        track("t1", "Song", "A"),
        track_without_id("another local file"),
    ];

    let unique = dedupe_tracks(tracks);

    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].id, "t1");
}

#[test]
fn test_dedupe_tracks_empty() {
    assert!(dedupe_tracks(Vec::new()).is_empty());
}

#[test]
fn test_shuffle_is_a_permutation() {
    let mut items: Vec<u32> = (0..50).collect();
    shuffle(&mut items);

    assert_eq!(items.len(), 50);
    let set: BTreeSet<u32> = items.iter().copied().collect();
    assert_eq!(set, (0..50).collect::<BTreeSet<u32>>());
}

#[test]
fn test_shuffle_handles_small_inputs() {
    let mut empty: Vec<u32> = Vec::new();
    shuffle(&mut empty);
    assert!(empty.is_empty());

    let mut single = vec![7];
    shuffle(&mut single);
    assert_eq!(single, vec![7]);
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is far too long", 10), "this is...");

    // Counts characters, not bytes
    assert_eq!(truncate("français über alles", 8), "franç...");
}
