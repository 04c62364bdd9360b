//! Shared test helpers: a scripted in-memory retrieval provider.

use crate::error::ProviderError;
use crate::provider::RetrievalProvider;
use crate::types::{Credential, Locator};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// What the scripted provider does for a given locator
#[derive(Clone, Debug)]
pub(crate) enum Script {
    /// Write a file named after the locator
    Succeed,
    /// Fail with `ProviderError::NotFound`
    NotFound,
    /// Fail with `ProviderError::Parse(message)`
    Fail(String),
    /// Sleep, then succeed
    Delay(Duration),
    /// Panic (a defect, not a provider failure)
    Panic,
}

/// One recorded provider invocation
#[derive(Clone, Debug)]
pub(crate) struct Call {
    pub(crate) locator: String,
    pub(crate) credential: String,
    pub(crate) destination: PathBuf,
}

/// Provider whose behaviour is scripted per locator; unscripted locators succeed
pub(crate) struct ScriptedProvider {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with(mut self, locator: &str, script: Script) -> Self {
        self.scripts.insert(locator.to_string(), script);
        self
    }

    /// Provider that fails every locator with the given message
    pub(crate) fn always_failing(message: &str) -> AlwaysFailing {
        AlwaysFailing {
            message: message.to_string(),
            calls: Mutex::new(0),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

/// File name the scripted provider writes for a successful locator
pub(crate) fn saved_name(locator: &str) -> String {
    let safe: String = locator
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.html", safe)
}

#[async_trait]
impl RetrievalProvider for ScriptedProvider {
    async fn retrieve(
        &self,
        locator: &Locator,
        credential: &Credential,
        destination: &Path,
    ) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(Call {
            locator: locator.to_string(),
            credential: credential.expose().to_string(),
            destination: destination.to_path_buf(),
        });

        let script = self
            .scripts
            .get(locator.as_str())
            .cloned()
            .unwrap_or(Script::Succeed);

        match script {
            Script::Succeed => {}
            Script::NotFound => return Err(ProviderError::NotFound(locator.to_string())),
            Script::Fail(message) => return Err(ProviderError::Parse(message)),
            Script::Delay(d) => tokio::time::sleep(d).await,
            Script::Panic => panic!("scripted provider defect for {}", locator),
        }

        tokio::fs::write(destination.join(saved_name(locator.as_str())), b"ok").await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Provider that fails every call
pub(crate) struct AlwaysFailing {
    message: String,
    calls: Mutex<usize>,
}

impl AlwaysFailing {
    pub(crate) fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RetrievalProvider for AlwaysFailing {
    async fn retrieve(
        &self,
        _locator: &Locator,
        _credential: &Credential,
        _destination: &Path,
    ) -> Result<(), ProviderError> {
        *self.calls.lock().unwrap() += 1;
        Err(ProviderError::Parse(self.message.clone()))
    }

    fn name(&self) -> &'static str {
        "always-failing"
    }
}
