use std::{
    collections::{HashMap, HashSet},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::sync::Mutex;
use tracing::warn;

use crate::{config, error::AppError, mood::Mood};

/// Per-mood record of track ids already displayed.
///
/// Each mood is stored as a JSON array at
/// `<dir>/shown_track_ids_<mood>.json`. Ids are loaded lazily and cached; every
/// update reads, extends and writes the file while holding one lock, so
/// concurrent commits for the same mood never lose ids.
pub struct ShownTracks {
    dir: PathBuf,
    cache: Mutex<HashMap<Mood, Vec<String>>>,
}

impl ShownTracks {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Store rooted at `<data dir>/state`.
    pub fn from_data_dir() -> Self {
        Self::new(config::data_dir().join("state"))
    }

    pub fn path(&self, mood: Mood) -> PathBuf {
        self.dir.join(format!("shown_track_ids_{}.json", mood))
    }

    async fn read(path: &Path) -> Vec<String> {
        match async_fs::read_to_string(path).await {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unreadable shown-track state");
                Vec::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read shown-track state");
                Vec::new()
            }
        }
    }

    async fn write(&self, mood: Mood, ids: &[String]) -> Result<(), AppError> {
        async_fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(ids)?;
        async_fs::write(self.path(mood), json).await?;
        Ok(())
    }

    /// Ids shown so far for `mood`, in display order.
    pub async fn ids(&self, mood: Mood) -> Vec<String> {
        let mut cache = self.cache.lock().await;
        if !cache.contains_key(&mood) {
            let ids = Self::read(&self.path(mood)).await;
            cache.insert(mood, ids);
        }
        cache.get(&mood).cloned().unwrap_or_default()
    }

    pub async fn snapshot(&self, mood: Mood) -> HashSet<String> {
        self.ids(mood).await.into_iter().collect()
    }

    pub async fn count(&self, mood: Mood) -> usize {
        self.ids(mood).await.len()
    }

    /// Appends the ids not yet recorded for `mood` and persists the set.
    /// Returns how many ids were new.
    ///
    /// # Errors
    ///
    /// Fails when the state file cannot be written. The in-memory set is
    /// updated regardless.
    pub async fn record(&self, mood: Mood, ids: &[String]) -> Result<usize, AppError> {
        let mut cache = self.cache.lock().await;
        if !cache.contains_key(&mood) {
            let loaded = Self::read(&self.path(mood)).await;
            cache.insert(mood, loaded);
        }
        let shown = cache.entry(mood).or_default();

        let mut added = 0;
        for id in ids {
            if !id.is_empty() && !shown.contains(id) {
                shown.push(id.clone());
                added += 1;
            }
        }

        if added > 0 {
            let snapshot = shown.clone();
            self.write(mood, &snapshot).await?;
        }
        Ok(added)
    }

    /// Forgets every shown id for `mood` and removes its state file.
    pub async fn clear(&self, mood: Mood) -> Result<(), AppError> {
        let mut cache = self.cache.lock().await;
        cache.insert(mood, Vec::new());
        match async_fs::remove_file(self.path(mood)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
