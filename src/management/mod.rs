//! Local persistence: the OAuth token and the per-mood shown-track sets.

mod auth;
mod shown;

pub use auth::TokenManager;
pub use shown::ShownTracks;
