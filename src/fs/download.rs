//! Local save mechanism for downloaded bytes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{FmError, Result};

/// Receives downloaded bytes under a suggested filename.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Persist `bytes` as `filename` and return where they ended up.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes downloads into a local directory.
#[derive(Debug, Clone)]
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for LocalDirSink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        // Only the final component is honoured; names never escape `dir`.
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| FmError::Custom(format!("Invalid download name: {}", filename)))?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.dir.join(name);
        tokio::fs::write(&target, bytes).await?;
        debug!("saved {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDownload {
    /// Filename suggested to the sink.
    pub filename: String,
    /// Number of bytes received.
    pub size: u64,
    /// Where the sink stored them.
    pub location: PathBuf,
}
