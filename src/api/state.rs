//! Application state for the API server

use crate::{BatchOrchestrator, Config};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request; the orchestrator's provider and failure log are
/// shared between clones.
#[derive(Clone)]
pub struct AppState {
    /// Runs the submitted batches
    pub orchestrator: BatchOrchestrator,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(orchestrator: BatchOrchestrator, config: Arc<Config>) -> Self {
        Self {
            orchestrator,
            config,
        }
    }
}
