//! Scoped batch output directory
//!
//! An [`OutputContext`] is the destination every retrieval in a batch writes
//! into. It is passed explicitly to the provider; the process working directory
//! is never changed, so concurrent batches cannot disturb one another.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output directory held for the duration of one batch
///
/// Acquired once per batch and released when dropped, on normal completion,
/// early return or unwind alike.
#[derive(Debug)]
pub struct OutputContext {
    path: PathBuf,
}

impl OutputContext {
    /// Make sure `dir` exists as a directory and open a batch context on it
    ///
    /// Creation is idempotent: an existing directory is reused as-is, contents
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputDirectory`] if the directory cannot be created or
    /// the path exists but is not a directory.
    pub async fn acquire(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().to_path_buf();

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| Error::OutputDirectory {
                path: path.clone(),
                source,
            })?;

        let metadata =
            tokio::fs::metadata(&path)
                .await
                .map_err(|source| Error::OutputDirectory {
                    path: path.clone(),
                    source,
                })?;
        if !metadata.is_dir() {
            return Err(Error::OutputDirectory {
                path,
                source: std::io::Error::other("path exists but is not a directory"),
            });
        }

        info!(output_dir = %path.display(), "batch output context acquired");

        Ok(Self { path })
    }

    /// Destination directory for this batch
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OutputContext {
    fn drop(&mut self) {
        debug!(output_dir = %self.path.display(), "batch output context released");
    }
}
