//! Append-only failure log shared by every batch
//!
//! One line per failed item:
//!
//! ```text
//! processing URL failed: <locator>, error: <description>
//! ```
//!
//! The file lives outside the output directory and accumulates across runs.

use crate::error::{Error, Result};
use crate::types::Locator;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// Format one failure record, newline included
///
/// Line breaks inside the description are flattened to spaces so every failure
/// occupies exactly one line.
#[must_use]
pub fn format_failure_line(locator: &Locator, description: &str) -> String {
    let description: String = description
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("processing URL failed: {}, error: {}\n", locator, description)
}

/// Process-wide failure log sink
///
/// Every record opens the file in append mode, writes one line and closes it,
/// so a log that is removed or rotated between batches is simply recreated.
/// Appends are serialized through an async mutex so lines never interleave.
#[derive(Debug)]
pub struct FailureLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FailureLog {
    /// Create a sink for `path` without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check that the log can be opened for appending, creating it if needed
    ///
    /// The handle is not kept; [`record`](Self::record) reopens the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FailureLog`] if the file cannot be created or opened.
    pub async fn ensure_open(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.open().await?;
        Ok(())
    }

    /// Append one failure record and flush it
    ///
    /// # Errors
    ///
    /// Returns [`Error::FailureLog`] if the file cannot be opened or written.
    pub async fn record(&self, locator: &Locator, description: &str) -> Result<()> {
        let line = format_failure_line(locator, description);

        let _guard = self.lock.lock().await;
        let mut file = self.open().await?;
        write_line(&mut file, line.as_bytes())
            .await
            .map_err(|e| self.write_error(e))?;

        warn!(locator = %locator, error = %description, "item failed, recorded in failure log");
        Ok(())
    }

    async fn open(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::FailureLog {
            path: self.path.clone(),
            source,
        }
    }
}

async fn write_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await
}
