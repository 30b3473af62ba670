use crate::error::ConfigError;
use core_types::{Credential, Endpoints, Network};
use serde::Deserialize;
use std::fmt;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

impl Settings {
    /// Checks the invariants that deserialization alone can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accounts.is_empty() {
            return Err(ConfigError::NoAccounts);
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }
        for (idx, account) in self.accounts.iter().enumerate() {
            account.validate(idx)?;
        }
        Ok(())
    }
}

/// Settings for the shared HTTP client.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How many times a retryable failure is retried before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Linear backoff base; attempt `n` waits `n * retry_backoff_ms`.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// How the report is produced and printed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Adds the spot balance table to each account section.
    #[serde(default)]
    pub include_spot: bool,
    /// Fetch accounts concurrently. Output order is unchanged.
    #[serde(default)]
    pub concurrent: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to a daily rolling file here.
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

/// One `[[accounts]]` entry.
#[derive(Clone, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default)]
    pub testnet: bool,
    /// Overrides the network's spot base URL.
    #[serde(default)]
    pub spot_url: Option<String>,
    /// Overrides the network's futures base URL.
    #[serde(default)]
    pub futures_url: Option<String>,
}

impl AccountConfig {
    fn validate(&self, idx: usize) -> Result<(), ConfigError> {
        let missing = [
            ("name", self.name.as_str()),
            ("api_key", self.api_key.as_str()),
            ("api_secret", self.api_secret.as_str()),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match missing {
            Some((field, _)) => Err(ConfigError::ValidationError(format!(
                "accounts[{}].{} must not be empty",
                idx, field
            ))),
            None => Ok(()),
        }
    }

    pub fn network(&self) -> Network {
        Network::from_testnet_flag(self.testnet)
    }

    pub fn credential(&self) -> Result<Credential, ConfigError> {
        Ok(Credential::new(
            self.name.clone(),
            self.api_key.clone(),
            self.api_secret.clone(),
            self.network(),
        )?)
    }

    pub fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::for_network(self.network());
        if let Some(url) = &self.spot_url {
            endpoints.spot_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = &self.futures_url {
            endpoints.futures_url = url.trim_end_matches('/').to_string();
        }
        endpoints
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("name", &self.name)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("testnet", &self.testnet)
            .field("spot_url", &self.spot_url)
            .field("futures_url", &self.futures_url)
            .finish()
    }
}
