//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`batches`]: Batch submission (form and JSON)
//! - [`pages`]: Static HTML pages
//! - [`system`]: Health and OpenAPI

use serde::{Deserialize, Serialize};

mod batches;
mod pages;
mod system;

pub use batches::*;
pub use pages::*;
pub use system::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Fields posted by the HTML form on `/`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FormSubmission {
    /// Session cookie string copied from the browser
    #[serde(default)]
    pub cookies: String,
    /// One URL per line
    pub url: String,
}

/// Request body for POST /api/v1/batches
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SubmitBatchRequest {
    /// One URL per line; blank lines are ignored
    pub urls: String,
    /// Session cookie string (may be empty for public content)
    #[serde(default)]
    pub cookies: String,
}

/// Confirmation returned by POST /
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FormResponse {
    /// Where the output went
    pub message: String,
    /// Where failed URLs are recorded
    pub failure_log: String,
}
