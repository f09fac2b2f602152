use crate::domain::tts::AudioFormat;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Scratch and results areas on local disk
#[derive(Debug, Clone)]
pub struct Storage {
    temp_dir: PathBuf,
    result_dir: PathBuf,
}

impl Storage {
    pub fn new(temp_dir: PathBuf, result_dir: PathBuf) -> Self {
        Self {
            temp_dir,
            result_dir,
        }
    }

    /// Create both storage areas if they do not exist yet
    pub async fn bootstrap(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.temp_dir).await?;
        tokio::fs::create_dir_all(&self.result_dir).await?;
        Ok(())
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    pub fn scratch_dir(&self, run_id: &Uuid) -> PathBuf {
        self.temp_dir.join(run_id.to_string())
    }

    pub fn result_path(&self, run_id: &Uuid, format: AudioFormat) -> PathBuf {
        self.result_dir
            .join(format!("{}.{}", run_id, format.extension()))
    }

    /// Delete every top-level entry of both areas last modified more than
    /// `retention` before `now`. Returns how many entries were removed.
    pub async fn remove_stale(&self, now: SystemTime, retention: Duration) -> usize {
        let mut removed = 0;
        for dir in [&self.temp_dir, &self.result_dir] {
            removed += remove_stale_entries(dir, now, retention).await;
        }
        removed
    }
}

/// Remove a file or a whole directory. A missing path is not an error.
/// Returns whether something was deleted.
pub async fn remove_path(path: &Path) -> io::Result<bool> {
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

async fn remove_stale_entries(dir: &Path, now: SystemTime, retention: Duration) -> usize {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Cannot scan storage area");
            return 0;
        }
    };

    let mut removed = 0;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Storage scan interrupted");
                break;
            }
        };

        let path = entry.path();
        let modified = match entry.metadata().await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read modification time");
                continue;
            }
        };

        let is_stale = now
            .duration_since(modified)
            .map(|age| age > retention)
            .unwrap_or(false);
        if !is_stale {
            continue;
        }

        match remove_path(&path).await {
            Ok(true) => {
                tracing::debug!(path = %path.display(), "Removed stale artifact");
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale artifact"),
        }
    }

    removed
}
