//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that `moodlist auth`
//! starts:
//!
//! - [`callback`] receives the redirect from Spotify's authorize page and
//!   exchanges the authorization code for a token (PKCE, no client secret).
//! - [`health`] reports that the server is up, with the crate version.
//!
//! The playlist pipeline never goes through this module; it only consumes the
//! token that the callback stores.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
