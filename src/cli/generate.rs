use indicatif::ProgressBar;
use tabled::Table;

use crate::{
    cli, info,
    mood::{self, Display, DisplaySink, Generated, Mood},
    success,
    types::PlaylistTableRow,
    utils, warning,
};

/// Clears the spinner and announces the title as soon as a stage commits.
struct SpinnerSink {
    spinner: ProgressBar,
}

impl DisplaySink for SpinnerSink {
    fn show(&self, display: &Display) {
        self.spinner.finish_and_clear();
        success!("{}", display.title());
    }
}

/// Generates a playlist for `mood`. With `shuffle`, also prints a shuffled
/// preview queue of the tracks that have a preview clip.
pub async fn generate(mood: Mood, shuffle: bool) {
    let session = cli::session().await;
    let sink = SpinnerSink {
        spinner: cli::spinner(&format!("Building a {} playlist...", mood)),
    };

    let display = match mood::generate(&session, mood, &sink).await {
        Generated::Shown { display, .. } => display,
        Generated::Stale => {
            sink.spinner.finish_and_clear();
            warning!("A newer generation replaced this one.");
            return;
        }
    };

    match display {
        Display::Tracks { tracks, .. } => {
            cli::print_tracks(session.catalog(), &tracks).await;
        }
        Display::Playlists { playlists, .. } => {
            let rows: Vec<PlaylistTableRow> = playlists
                .iter()
                .map(|p| PlaylistTableRow {
                    name: p.name.clone(),
                    description: utils::truncate(&p.description, 60),
                    tracks: p.tracks.total,
                })
                .collect();
            println!("{}", Table::new(rows));
            return;
        }
        Display::Guidance { message } => {
            warning!("{}", message);
            return;
        }
    }

    let disabled = session.catalog().capabilities().disabled().await;
    if !disabled.is_empty() {
        let names: Vec<String> = disabled.iter().map(|c| c.to_string()).collect();
        warning!("Not available for this account: {}", names.join(", "));
    }

    if shuffle {
        let queue = session.start_shuffle().await;
        if queue.is_empty() {
            warning!("None of these tracks has a preview clip.");
            return;
        }
        info!("Shuffle queue:");
        for (i, track) in queue.iter().enumerate() {
            println!(
                "{:>3}. {} - {}  {}",
                i + 1,
                track.name,
                track.artist_names(),
                track.preview_url.as_deref().unwrap_or_default()
            );
        }
    }
}
