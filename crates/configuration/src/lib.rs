use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{AnalyticsSettings, Config, LoggingSettings, ReportFormat, ReportSettings};

/// Prefix of environment overrides, e.g. `JOURNAL__ANALYTICS__UTC_OFFSET_MINUTES=120`.
pub const ENV_PREFIX: &str = "JOURNAL";

/// Loads the application configuration from `config.toml` in the working directory.
///
/// The file is optional; every setting has a default. Environment variables with the
/// `JOURNAL__` prefix override file values.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"), false)
}

/// Loads the configuration from an explicit file. When `required` is true a missing
/// file is an error.
pub fn load_config_from(path: &Path, required: bool) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
    finish(builder)
}

/// Deserializes and validates whatever sources the builder was given.
fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
