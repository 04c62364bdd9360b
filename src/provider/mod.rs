//! Retrieval providers
//!
//! A provider takes one locator and the session credential, works out what kind
//! of content the locator points at, fetches it, and saves it into the
//! destination directory it is handed. The orchestrator only cares whether the
//! call returned `Ok(())`.
//!
//! [`ZhihuProvider`] is the built-in HTTP implementation. Anything else that
//! implements [`RetrievalProvider`] can be plugged into a
//! [`BatchOrchestrator`](crate::orchestrator::BatchOrchestrator).

use crate::error::ProviderError;
use crate::types::{Credential, Locator};
use async_trait::async_trait;
use std::path::Path;

mod kind;
mod zhihu;

pub use kind::ContentKind;
pub use zhihu::ZhihuProvider;

/// Trait for content retrieval
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use std::path::Path;
/// use zhihu_dl::error::ProviderError;
/// use zhihu_dl::provider::RetrievalProvider;
/// use zhihu_dl::types::{Credential, Locator};
///
/// struct Touch;
///
/// #[async_trait]
/// impl RetrievalProvider for Touch {
///     async fn retrieve(
///         &self,
///         locator: &Locator,
///         _credential: &Credential,
///         destination: &Path,
///     ) -> Result<(), ProviderError> {
///         let name = locator.as_str().replace('/', "_");
///         tokio::fs::write(destination.join(name), b"").await?;
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "touch"
///     }
/// }
/// ```
#[async_trait]
pub trait RetrievalProvider: Send + Sync {
    /// Fetch `locator` using `credential` and save the result under `destination`
    ///
    /// `destination` already exists when this is called.
    ///
    /// # Errors
    ///
    /// Any [`ProviderError`]; the batch records it and moves on.
    async fn retrieve(
        &self,
        locator: &Locator,
        credential: &Credential,
        destination: &Path,
    ) -> Result<(), ProviderError>;

    /// Short name used in log output
    fn name(&self) -> &'static str;
}
