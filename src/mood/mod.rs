//! # Mood Playlist Pipeline
//!
//! Turns a user's listening history into a ranked, deduplicated list of tracks
//! for one [`Mood`]:
//!
//! ```text
//! orchestrator ─→ history ─→ classify ─→ expand ─→ pool ─→ rank ─→ DisplaySink
//!      │                                                     ↑
//!      └── fallback stages (playlists, recently played, ... , guidance)
//! ```
//!
//! Every stage is fail-soft: catalog failures turn into empty results through
//! [`crate::spotify::CatalogClient`], and the orchestrator moves on to the next
//! stage until one produces something to show.

use std::{fmt, str::FromStr};

pub mod classify;
pub mod expand;
pub mod history;
pub mod language;
pub mod orchestrator;
pub mod pool;
pub mod queue;
pub mod rank;
pub mod session;

pub use language::Language;
pub use orchestrator::{Display, DisplaySink, Generated, Stage, generate};
pub use pool::CandidatePool;
pub use queue::PlaybackQueue;
pub use session::{GenerationToken, Session};

/// The target emotional category of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mood {
    Happy,
    Sad,
    Chill,
    Angry,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Sad, Mood::Chill, Mood::Angry];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Chill => "chill",
            Mood::Angry => "angry",
        }
    }

    /// "happy" -> "Happy", used in display titles.
    pub fn title(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Chill => "Chill",
            Mood::Angry => "Angry",
        }
    }

    /// Words matched against a track's name, artists and album.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &[
                "happy", "joy", "upbeat", "cheerful", "bright", "sunny", "dance", "party",
            ],
            Mood::Sad => &[
                "sad", "melancholy", "blue", "lonely", "heartbreak", "tears", "cry", "miss",
            ],
            Mood::Chill => &[
                "chill", "relax", "calm", "peaceful", "ambient", "soft", "gentle", "mellow",
            ],
            Mood::Angry => &[
                "angry", "rage", "furious", "intense", "heavy", "aggressive", "loud", "power",
            ],
        }
    }

    /// Words paired with artist genres when expanding by genre.
    pub fn genre_keywords(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["happy", "joy", "upbeat", "cheerful", "party"],
            Mood::Sad => &["sad", "melancholy", "heartbreak", "blue", "lonely"],
            Mood::Chill => &["chill", "relax", "calm", "ambient", "lofi"],
            Mood::Angry => &["angry", "rage", "heavy", "aggressive", "intense"],
        }
    }

    /// Words paired with language words in free-text and random searches.
    pub fn search_keywords(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["happy", "joy", "upbeat", "cheerful", "party", "dance"],
            Mood::Sad => &["sad", "melancholy", "heartbreak", "blue", "lonely"],
            Mood::Chill => &["chill", "relax", "calm", "ambient", "lofi"],
            Mood::Angry => &["angry", "rage", "heavy", "aggressive", "intense"],
        }
    }

    /// Terms that make a track a candidate in the genre heuristic.
    pub fn genre_include(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &[
                "happy",
                "dance",
                "party",
                "pop",
                "dance pop",
                "bollywood dance",
                "edm",
                "house",
                "funk",
                "feel good",
            ],
            Mood::Sad => &[
                "sad",
                "melancholy",
                "romance",
                "acoustic",
                "piano",
                "singer-songwriter",
                "ballad",
            ],
            Mood::Chill => &["chill", "relax", "lofi", "ambient", "soft", "acoustic", "indie"],
            Mood::Angry => &[
                "metal",
                "hard rock",
                "aggressive",
                "trap metal",
                "industrial",
                "hardcore",
                "grunge",
            ],
        }
    }

    /// Terms that rule a track out in the genre heuristic. Checked first.
    pub fn genre_exclude(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["sad", "melancholy", "heartbreak", "breakup", "cry", "tears"],
            Mood::Sad => &["party", "edm", "festival"],
            Mood::Chill => &["metal", "hardcore", "aggressive"],
            Mood::Angry => &["lullaby", "ambient", "piano"],
        }
    }

    /// Browse category names that fit the mood.
    pub fn category_hints(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["pop", "dance", "party", "workout", "summer"],
            Mood::Sad => &["indie", "acoustic", "singer-songwriter", "folk"],
            Mood::Chill => &["chill", "ambient", "lounge", "study", "focus"],
            Mood::Angry => &["rock", "metal", "punk", "alternative", "grunge"],
        }
    }

    /// Words looked for in featured playlist names and descriptions.
    pub fn featured_keywords(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["happy", "party", "dance", "upbeat", "summer"],
            Mood::Sad => &["sad", "melancholy", "acoustic", "indie"],
            Mood::Chill => &["chill", "relax", "ambient", "study", "focus"],
            Mood::Angry => &["rock", "metal", "punk", "alternative"],
        }
    }

    /// Genre-scoped queries used by the random generation fallback.
    pub fn genre_queries(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["genre:pop genre:dance", "genre:disco"],
            Mood::Sad => &["genre:indie genre:acoustic", "genre:singer-songwriter"],
            Mood::Chill => &["genre:ambient genre:chill", "genre:lofi"],
            Mood::Angry => &["genre:rock genre:metal", "genre:punk"],
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "sad" => Ok(Mood::Sad),
            "chill" => Ok(Mood::Chill),
            "angry" => Ok(Mood::Angry),
            other => Err(format!(
                "unknown mood '{}', expected one of: happy, sad, chill, angry",
                other
            )),
        }
    }
}
