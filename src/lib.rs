//! # zhihu-dl
//!
//! Batch retrieval of Zhihu content (questions, answers, articles, columns,
//! collections, pins) to local storage.
//!
//! A batch takes a block of URLs, one per line, plus a session cookie. Every URL
//! is retrieved in order into a shared output directory. A URL that cannot be
//! retrieved is recorded in an append-only failure log and the batch moves on;
//! only a failure to prepare the output directory or the failure log aborts it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use zhihu_dl::{BatchOrchestrator, Config, Credential};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let orchestrator = BatchOrchestrator::from_config(&config)?;
//!
//!     let urls = "https://www.zhihu.com/question/19550225\n\
//!                 https://zhuanlan.zhihu.com/p/19818046";
//!     let summary = orchestrator
//!         .run_batch(urls, &Credential::new("z_c0=..."))
//!         .await?;
//!
//!     println!("{} ({} failed, see error.log)", summary.message, summary.failed);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Single-item dispatch
pub mod dispatch;
/// Error types
pub mod error;
/// Append-only failure log
pub mod failure_log;
/// Locator block normalization
pub mod normalize;
/// Batch orchestration
pub mod orchestrator;
/// Batch output directory context
pub mod output;
/// Retrieval providers
pub mod provider;
/// Core types
pub mod types;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, ProviderError, Result, ToHttpStatus};
pub use failure_log::FailureLog;
pub use orchestrator::BatchOrchestrator;
pub use provider::{ContentKind, RetrievalProvider, ZhihuProvider};
pub use types::{BatchSummary, Credential, Locator, Outcome};

/// Wait for a termination signal (SIGTERM/SIGINT on Unix, Ctrl+C elsewhere)
///
/// Used as the graceful-shutdown trigger for the API server.
pub async fn shutdown_signal() {
    wait_for_signal().await;
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register unix signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
