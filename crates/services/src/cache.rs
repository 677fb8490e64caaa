use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::jobs::ResultBundle;

/// Durable result cache on local disk. One JSON file per content hash of the
/// uploaded filename, so re-uploading the same video skips the pipeline.
/// Unlike the job store, entries survive process restarts.
pub struct ResultCache {
    dir: PathBuf,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, filename: &str) -> PathBuf {
        let digest = Sha256::digest(filename.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    /// Returns the cached bundle for this filename, or None. A corrupt or
    /// unreadable entry is a miss, never a failure.
    pub async fn lookup(&self, filename: &str) -> Option<ResultBundle> {
        let path = self.entry_path(filename);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(%filename, error = %e, "Failed to read cache entry, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(bundle) => {
                info!(%filename, "Retrieved cached results");
                Some(bundle)
            }
            Err(e) => {
                warn!(%filename, error = %e, "Corrupt cache entry, treating as miss");
                None
            }
        }
    }

    /// Writes (or overwrites) the cache entry for this filename.
    /// Last write wins; errors are logged and swallowed since a failed cache
    /// write only costs a future reprocessing.
    pub async fn store(&self, filename: &str, bundle: &ResultBundle) {
        if let Err(e) = self.try_store(filename, bundle).await {
            warn!(%filename, error = %e, "Failed to write cache entry");
        } else {
            info!(%filename, "Saved results to cache");
        }
    }

    async fn try_store(&self, filename: &str, bundle: &ResultBundle) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec(bundle)?;
        tokio::fs::write(self.entry_path(filename), json).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
