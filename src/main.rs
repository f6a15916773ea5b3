use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use moodlist::{cli, config, error, mood::Mood, types::PkceToken};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moodlist=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Build a playlist for a mood
    Generate(GenerateOptions),

    /// List your liked songs
    Liked,

    /// Add a track to your liked songs
    Like(TrackOption),

    /// Remove a track from your liked songs
    Unlike(TrackOption),

    /// Show or reset the tracks already shown for a mood
    Shown(ShownOptions),

    /// Listening history and state overview
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// happy, sad, chill or angry
    pub mood: Mood,

    /// Print a shuffled preview queue after the playlist
    #[clap(long)]
    pub shuffle: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOption {
    /// Spotify track id
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ShownOptions {
    pub mood: Mood,

    /// Forget every track shown for this mood
    #[clap(long)]
    pub clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Generate(opt) => cli::generate(opt.mood, opt.shuffle).await,
        Command::Liked => cli::liked().await,
        Command::Like(opt) => cli::like(opt.id).await,
        Command::Unlike(opt) => cli::unlike(opt.id).await,
        Command::Shown(opt) => cli::shown(opt.mood, opt.clear).await,
        Command::Info => cli::info().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
