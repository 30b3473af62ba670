use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No accounts configured. Add at least one [[accounts]] entry.")]
    NoAccounts,

    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::ConfigError),

    #[error("Failed to write the report: {0}")]
    Output(#[from] std::io::Error),

    #[error("Serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl EngineError {
    /// Setup problems stop the run before any request is made.
    pub fn is_setup_error(&self) -> bool {
        matches!(self, EngineError::NoAccounts | EngineError::Configuration(_))
    }
}
