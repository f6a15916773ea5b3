use std::{fmt, str::FromStr};

/// Language inferred from the user's history. Drives search words and the
/// preferred market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Hindi,
    #[default]
    English,
    Spanish,
    Korean,
    Japanese,
    French,
    German,
    Portuguese,
}

impl Language {
    /// Detection order. Only used to iterate, a tie always resolves to
    /// [`Language::English`].
    pub const ALL: [Language; 8] = [
        Language::Hindi,
        Language::English,
        Language::Spanish,
        Language::Korean,
        Language::Japanese,
        Language::French,
        Language::German,
        Language::Portuguese,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hindi => "hindi",
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::Korean => "korean",
            Language::Japanese => "japanese",
            Language::French => "french",
            Language::German => "german",
            Language::Portuguese => "portuguese",
        }
    }

    /// Evidence words looked for in a track's lexical text.
    pub fn detection_keywords(&self) -> &'static [&'static str] {
        match self {
            Language::Hindi => &["hindi", "bollywood", "indian", "desi"],
            Language::English => &["english", "pop", "rock", "hip hop", "rap"],
            Language::Spanish => &["spanish", "latin", "reggaeton", "flamenco"],
            Language::Korean => &["korean", "k-pop", "korean pop"],
            Language::Japanese => &["japanese", "j-pop", "anime"],
            Language::French => &["french", "français"],
            Language::German => &["german", "deutsch"],
            Language::Portuguese => &["portuguese", "brazilian", "samba", "bossa nova"],
        }
    }

    /// Words combined with mood keywords in free-text search.
    pub fn search_words(&self) -> &'static [&'static str] {
        match self {
            Language::Hindi => &["hindi", "bollywood"],
            Language::English => &["pop", "rock"],
            Language::Spanish => &["latin", "spanish"],
            Language::Korean => &["k-pop"],
            Language::Japanese => &["j-pop"],
            Language::French => &["french"],
            Language::German => &["german"],
            Language::Portuguese => &["brazilian"],
        }
    }

    /// Words combined with mood keywords by the random generation fallback.
    pub fn random_words(&self) -> &'static [&'static str] {
        match self {
            Language::Hindi => &["hindi", "bollywood", "indian"],
            Language::English => &["pop", "rock", "english"],
            Language::Spanish => &["latin", "spanish", "reggaeton"],
            Language::Korean => &["k-pop", "korean"],
            Language::Japanese => &["j-pop", "japanese", "anime"],
            Language::French => &["french", "français"],
            Language::German => &["german", "deutsch"],
            Language::Portuguese => &["brazilian", "portuguese"],
        }
    }

    /// Market tried first when harvesting curated playlists.
    pub fn market(&self) -> &'static str {
        match self {
            Language::Hindi => "IN",
            Language::English => "US",
            Language::Spanish => "ES",
            Language::Korean => "KR",
            Language::Japanese => "JP",
            Language::French => "FR",
            Language::German => "DE",
            Language::Portuguese => "BR",
        }
    }

    pub fn genre_queries(&self) -> &'static [&'static str] {
        match self {
            Language::Hindi => &["genre:bollywood", "genre:indian"],
            Language::Korean => &["genre:k-pop"],
            Language::Japanese => &["genre:j-pop", "genre:anime"],
            _ => &[],
        }
    }

    /// Whether `text` (already lower-cased) carries evidence of this language.
    pub fn matches(&self, text: &str) -> bool {
        self.detection_keywords().iter().any(|kw| text.contains(kw))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.as_str() == needle)
            .ok_or_else(|| format!("unknown language '{}'", s))
    }
}
