use config::{Environment, File, FileFormat};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    AccountConfig, HttpConfig, LoggingConfig, OutputFormat, ReportConfig, Settings,
};
pub use telemetry::init_tracing;

/// Default accounts file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "accounts.toml";

/// Prefix for environment overrides, e.g. `PORTFOLIO__HTTP__TIMEOUT_SECS=5`.
const ENV_PREFIX: &str = "PORTFOLIO";

/// Loads and validates the application configuration from a TOML file.
///
/// Environment variables prefixed with `PORTFOLIO__` are layered on top of the
/// file. A missing file, an empty account list, or a blank credential field is
/// a setup error for the caller to report.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let builder = config::Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Parses configuration from an in-memory TOML document. No environment layer.
pub fn parse_config(toml: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Settings, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;
    tracing::debug!(accounts = settings.accounts.len(), "Configuration loaded.");
    Ok(settings)
}
