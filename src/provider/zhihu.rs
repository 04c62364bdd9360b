//! HTTP retrieval of Zhihu content pages

use super::{ContentKind, RetrievalProvider};
use crate::config::ProviderConfig;
use crate::error::{Error, ProviderError};
use crate::types::{Credential, Locator};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Built-in provider: classifies the locator, fetches the page with the session
/// cookie attached, and saves the body as `<kind>_<id>.html`
#[derive(Debug, Clone)]
pub struct ZhihuProvider {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl ZhihuProvider {
    /// Build a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is malformed or the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> crate::Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| Error::Config {
                message: format!("invalid base_url: {}", e),
                key: Some("base_url".to_string()),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// URL actually requested for `url`, after the optional base override
    fn request_url(&self, url: &Url) -> Url {
        match &self.base_url {
            Some(base) => {
                let mut target = base.clone();
                target.set_path(url.path());
                target.set_query(url.query());
                target
            }
            None => url.clone(),
        }
    }
}

/// File name a retrieved item is saved under
///
/// The id is percent-encoded: distinct ids always give distinct names and no
/// path separator survives.
pub(crate) fn output_file_name(kind: ContentKind, id: &str) -> String {
    format!("{}_{}.html", kind, urlencoding::encode(id))
}

fn status_error(status: StatusCode, url: &Url) -> ProviderError {
    if status == StatusCode::NOT_FOUND {
        ProviderError::NotFound(url.to_string())
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ProviderError::PermissionDenied {
            status: status.as_u16(),
            url: url.to_string(),
        }
    } else {
        ProviderError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl RetrievalProvider for ZhihuProvider {
    async fn retrieve(
        &self,
        locator: &Locator,
        credential: &Credential,
        destination: &Path,
    ) -> Result<(), ProviderError> {
        let url = Url::parse(locator.as_str()).map_err(|e| ProviderError::InvalidUrl {
            locator: locator.to_string(),
            reason: e.to_string(),
        })?;

        let (kind, id) = ContentKind::classify(&url)
            .ok_or_else(|| ProviderError::UnsupportedUrl(locator.to_string()))?;

        let target = self.request_url(&url);
        debug!(locator = %locator, kind = %kind, id = %id, url = %target, "fetching content");

        let mut request = self.client.get(target.clone());
        if !credential.is_empty() {
            request = request.header(COOKIE, credential.expose());
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, &target));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(ProviderError::Parse(format!(
                "empty response body from {}",
                target
            )));
        }

        let path: PathBuf = destination.join(output_file_name(kind, &id));
        tokio::fs::write(&path, &body).await?;

        info!(
            locator = %locator,
            kind = %kind,
            bytes = body.len(),
            path = %path.display(),
            "content saved"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "zhihu"
    }
}
