//! Configuration types for zhihu-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    path::{Component, Path, PathBuf},
    time::Duration,
};

/// Where a batch writes its output and its failure records
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Batch output directory (default: "./downloads")
    ///
    /// Created on first use and reused across runs; contents accumulate.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Append-only failure log (default: "./error.log")
    ///
    /// Must live outside `output_dir`.
    #[serde(default = "default_failure_log")]
    pub failure_log: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            failure_log: default_failure_log(),
        }
    }
}

/// Settings for the built-in HTTP retrieval provider
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Override for scheme, host and port of every request (None = use the locator as-is)
    ///
    /// Content classification still uses the submitted locator. Mostly useful for
    /// pointing the provider at a mirror or a mock server.
    #[serde(default)]
    pub base_url: Option<String>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Upper bound for one item's retrieval (None = unbounded)
    ///
    /// A timed-out item is recorded as a failure; the batch carries on.
    #[serde(default, with = "optional_duration_serde")]
    pub item_timeout: Option<Duration>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
            item_timeout: None,
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0:5000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: any)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve Swagger UI at /swagger-ui
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerIntegrationConfig {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Main configuration
///
/// Every section has sensible defaults, so `{}` is a valid configuration file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output directory and failure log locations
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP retrieval provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// API server settings
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Load a configuration from a JSON file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read config file {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.output.output_dir.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "output_dir must not be empty".to_string(),
                key: Some("output_dir".to_string()),
            });
        }

        if self.output.failure_log.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "failure_log must not be empty".to_string(),
                key: Some("failure_log".to_string()),
            });
        }

        // Lexical check only; the directory may not exist yet.
        let output_dir = normalize_path(&self.output.output_dir);
        if normalize_path(&self.output.failure_log).starts_with(&output_dir) {
            return Err(Error::Config {
                message: format!(
                    "failure_log {} must live outside output_dir {}",
                    self.output.failure_log.display(),
                    self.output.output_dir.display()
                ),
                key: Some("failure_log".to_string()),
            });
        }

        if self.provider.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request_timeout must be greater than zero".to_string(),
                key: Some("request_timeout".to_string()),
            });
        }

        if let Some(base) = &self.provider.base_url
            && let Err(e) = url::Url::parse(base)
        {
            return Err(Error::Config {
                message: format!("base_url '{}' is not a valid URL: {}", base, e),
                key: Some("base_url".to_string()),
            });
        }

        Ok(())
    }
}

/// Absolute form of `path` with `.` and `..` components resolved lexically
fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_failure_log() -> PathBuf {
    PathBuf::from("error.log")
}

fn default_user_agent() -> String {
    concat!(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) ",
        "Chrome/124.0 Safari/537.36"
    )
    .to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
