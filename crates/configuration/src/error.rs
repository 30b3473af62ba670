use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("No accounts configured. Add at least one [[accounts]] entry.")]
    NoAccounts,

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

impl From<core_types::CoreError> for ConfigError {
    fn from(err: core_types::CoreError) -> Self {
        ConfigError::ValidationError(err.to_string())
    }
}
