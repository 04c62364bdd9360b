//! Core types for zhihu-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

/// A single content item URL submitted for retrieval
///
/// Always non-empty and free of surrounding whitespace; build one with
/// [`Locator::new`] or through [`normalize_locators`](crate::normalize::normalize_locators).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Trim `raw` and wrap it, or return `None` if nothing is left
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The locator text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque session cookie string handed to the retrieval provider
///
/// The value is never inspected. `Debug` is redacted so the cookie cannot leak
/// into logs through a stray `{:?}`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wrap a cookie string unmodified
    pub fn new(cookie: impl Into<String>) -> Self {
        Self(cookie.into())
    }

    /// The raw cookie string
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether no cookie was supplied
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

/// Result of dispatching one locator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The provider returned without error
    Success {
        /// The locator that was retrieved
        locator: Locator,
    },
    /// The provider reported a failure
    Failure {
        /// The locator that failed
        locator: Locator,
        /// Human-readable description of the failure
        message: String,
    },
}

/// Confirmation returned once a batch has run
///
/// Failed locators are not listed here; they are recorded in the failure log.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchSummary {
    /// Human-readable confirmation
    pub message: String,
    /// Directory the batch wrote into
    #[schema(value_type = String)]
    pub output_dir: PathBuf,
    /// Number of locators dispatched
    pub total: usize,
    /// Number of locators retrieved
    pub succeeded: usize,
    /// Number of locators recorded in the failure log
    pub failed: usize,
    /// When the batch finished
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    pub(crate) fn new(output_dir: PathBuf, total: usize, failed: usize) -> Self {
        Self {
            message: format!("files saved to the {} directory", output_dir.display()),
            output_dir,
            total,
            succeeded: total - failed,
            failed,
            finished_at: Utc::now(),
        }
    }
}
