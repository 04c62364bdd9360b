//! Batch retrieval orchestration
//!
//! One batch is a single sequential pass:
//!
//! 1. normalize the raw locator block ([`normalize_locators`])
//! 2. acquire the output directory ([`OutputContext`]) and open the failure log
//! 3. dispatch every locator in input order, recording each failure as it happens
//! 4. release the output directory
//! 5. return a [`BatchSummary`]
//!
//! Item failures never stop the loop. Only a failure to prepare the output
//! directory or to write the failure log aborts a batch.

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::error::Result;
use crate::failure_log::FailureLog;
use crate::normalize::normalize_locators;
use crate::output::OutputContext;
use crate::provider::{RetrievalProvider, ZhihuProvider};
use crate::types::{BatchSummary, Credential, Locator, Outcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Runs batches against a retrieval provider (cloneable - all fields are Arc-wrapped or cheap)
///
/// Clones share the provider and the failure log, so batches started from
/// different clones (e.g. concurrent HTTP requests) append to the same log
/// without interleaving.
#[derive(Clone)]
pub struct BatchOrchestrator {
    provider: Arc<dyn RetrievalProvider>,
    failure_log: Arc<FailureLog>,
    output_dir: PathBuf,
    item_timeout: Option<Duration>,
}

impl BatchOrchestrator {
    /// Create an orchestrator using `provider` for every item
    pub fn new(config: &Config, provider: Arc<dyn RetrievalProvider>) -> Self {
        Self {
            provider,
            failure_log: Arc::new(FailureLog::new(config.output.failure_log.clone())),
            output_dir: config.output.output_dir.clone(),
            item_timeout: config.provider.item_timeout,
        }
    }

    /// Create an orchestrator backed by the built-in [`ZhihuProvider`]
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = ZhihuProvider::new(&config.provider)?;
        Ok(Self::new(config, Arc::new(provider)))
    }

    /// Directory every batch writes into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Shared failure log sink
    pub fn failure_log(&self) -> &FailureLog {
        &self.failure_log
    }

    /// Run one batch from a raw multi-line locator block
    ///
    /// A blank block is a valid no-op batch: nothing is dispatched and neither
    /// the output directory nor the failure log is touched.
    ///
    /// # Errors
    ///
    /// - [`Error::OutputDirectory`](crate::Error::OutputDirectory) if the output
    ///   directory cannot be prepared; no item is dispatched.
    /// - [`Error::FailureLog`](crate::Error::FailureLog) if the failure log cannot
    ///   be opened (before any dispatch) or appended to.
    pub async fn run_batch(&self, raw: &str, credential: &Credential) -> Result<BatchSummary> {
        let locators = normalize_locators(raw);
        self.run_locators(&locators, credential).await
    }

    /// Run one batch over already-normalized locators
    ///
    /// # Errors
    ///
    /// Same as [`run_batch`](Self::run_batch).
    pub async fn run_locators(
        &self,
        locators: &[Locator],
        credential: &Credential,
    ) -> Result<BatchSummary> {
        if locators.is_empty() {
            info!("empty batch, nothing to dispatch");
            return Ok(BatchSummary::new(self.output_dir.clone(), 0, 0));
        }

        let started = Instant::now();
        let context = OutputContext::acquire(&self.output_dir).await?;
        self.failure_log.ensure_open().await?;

        info!(
            items = locators.len(),
            provider = self.provider.name(),
            output_dir = %context.path().display(),
            "batch started"
        );

        let mut failed = 0usize;
        for locator in locators {
            let outcome = dispatch(
                self.provider.as_ref(),
                locator,
                credential,
                context.path(),
                self.item_timeout,
            )
            .await;

            if let Outcome::Failure { locator, message } = outcome {
                failed += 1;
                self.failure_log.record(&locator, &message).await?;
            }
        }

        drop(context);

        info!(
            items = locators.len(),
            failed,
            duration_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );

        Ok(BatchSummary::new(
            self.output_dir.clone(),
            locators.len(),
            failed,
        ))
    }
}

impl std::fmt::Debug for BatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOrchestrator")
            .field("provider", &self.provider.name())
            .field("failure_log", &self.failure_log.path())
            .field("output_dir", &self.output_dir)
            .field("item_timeout", &self.item_timeout)
            .finish()
    }
}
