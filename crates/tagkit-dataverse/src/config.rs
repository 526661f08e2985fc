//! Dataverse connection configuration.
//!
//! Loaded from environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | DATAVERSE_URL | (required) | Organization URL, e.g. `https://org.crm.dynamics.com` |
//! | DATAVERSE_TOKEN | (none) | Bearer token |
//! | DATAVERSE_API_VERSION | v9.2 | Web API version segment |
//! | DATAVERSE_TIMEOUT_SECS | 30 | Request timeout (seconds) |
//! | TAGKIT_SCHEMA_PREFIX | evergrn | Publisher prefix of the tag schema |

use tagkit_core::{defaults, Error, Result, SchemaNames};

/// Configuration for the Dataverse Web API client.
#[derive(Debug, Clone)]
pub struct DataverseConfig {
    /// Organization base URL.
    pub base_url: String,
    /// Bearer token (optional for local proxies that inject auth).
    pub token: Option<String>,
    /// Web API version segment, e.g. `v9.2`.
    pub api_version: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Entity and field naming.
    pub schema: SchemaNames,
}

impl DataverseConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            api_version: defaults::API_VERSION.to_string(),
            timeout_seconds: defaults::HTTP_TIMEOUT_SECS,
            schema: SchemaNames::default(),
        }
    }

    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("DATAVERSE_URL")
            .map_err(|_| Error::Config("DATAVERSE_URL is not set".to_string()))?;

        let config = Self {
            base_url,
            token: std::env::var("DATAVERSE_TOKEN").ok().filter(|t| !t.is_empty()),
            api_version: std::env::var("DATAVERSE_API_VERSION")
                .unwrap_or_else(|_| defaults::API_VERSION.to_string()),
            timeout_seconds: std::env::var("DATAVERSE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::HTTP_TIMEOUT_SECS),
            schema: std::env::var("TAGKIT_SCHEMA_PREFIX")
                .map(SchemaNames::new)
                .unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("Dataverse base_url cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Dataverse base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.api_version.is_empty() {
            return Err(Error::Config("Dataverse api_version cannot be empty".to_string()));
        }

        if self.timeout_seconds == 0 {
            return Err(Error::Config("Dataverse timeout must be positive".to_string()));
        }

        self.schema.validate()
    }

    /// Root of the Web API, e.g. `https://org.crm.dynamics.com/api/data/v9.2`.
    pub fn api_root(&self) -> String {
        format!(
            "{}/api/data/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }
}
