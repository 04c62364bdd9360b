//! Single-item dispatch to a retrieval provider

use crate::error::ProviderError;
use crate::provider::RetrievalProvider;
use crate::types::{Credential, Locator, Outcome};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Retrieve one locator and report the result as an [`Outcome`]
///
/// Provider errors (and an elapsed `item_timeout`) become
/// [`Outcome::Failure`] carrying the error's message; nothing item-level
/// propagates out of this call. Panics inside the provider are defects and are
/// not caught.
pub async fn dispatch(
    provider: &dyn RetrievalProvider,
    locator: &Locator,
    credential: &Credential,
    destination: &Path,
    item_timeout: Option<Duration>,
) -> Outcome {
    debug!(provider = provider.name(), locator = %locator, "dispatching item");

    let call = provider.retrieve(locator, credential, destination);
    let result = match item_timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::TimedOut(limit)),
        },
        None => call.await,
    };

    match result {
        Ok(()) => Outcome::Success {
            locator: locator.clone(),
        },
        Err(e) => Outcome::Failure {
            locator: locator.clone(),
            message: e.to_string(),
        },
    }
}
