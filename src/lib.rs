//! moodlist library
//!
//! Builds mood playlists (happy, sad, chill, angry) from a Spotify user's
//! listening history. The library holds the playlist pipeline and everything
//! the `moodlist` binary needs around it.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command implementations behind the `moodlist` binary
//! - `config` - Environment, `.env` loading and pipeline [`config::Settings`]
//! - `error` - Catalog and application error types
//! - `management` - Persisted token and shown-track state
//! - `mood` - Classification, expansion, ranking and the fallback orchestrator
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API transport and fail-soft gateway
//! - `types` - Data structures decoded from the Web API
//! - `utils` - PKCE helpers, deduplication and shuffling
//!
//! # Example
//!
//! ```ignore
//! use moodlist::{config, cli, mood::Mood};
//!
//! #[tokio::main]
//! async fn main() -> moodlist::Res<()> {
//!     config::load_env().await?;
//!     cli::generate(Mood::Chill, false).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod mood;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Boxed error alias for CLI glue code where the concrete error type does not
/// matter.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

// User-facing output. Diagnostics inside the pipeline go through `tracing`
// instead and are only visible with RUST_LOG set.

/// Prints `[o] message` to stdout.
///
/// ```ignore
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints `[✓] message` to stdout.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints `[!] message` in red to stderr and exits with code 1.
///
/// Only for failures the command cannot continue from, such as a missing
/// token or an unparsable configuration.
///
/// ```ignore
/// error!("Unknown mood: {}", mood);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints `[!] message` in yellow to stderr and carries on.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
