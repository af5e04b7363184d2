use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    Config, ContextSettings, Defaults, DisplaySettings, LoggingSettings, OutputFormat, Theme,
};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

/// Prefix for environment overrides, e.g. `TALLY__DISPLAY__CURRENCY_SYMBOL=€`.
pub const ENV_PREFIX: &str = "TALLY";

/// Loads the application configuration.
///
/// Sources are layered in this order, later ones winning:
/// 1. Built-in defaults.
/// 2. The given file, or `tally.toml` in the working directory. A missing default
///    file is fine; an explicitly requested file must exist.
/// 3. `TALLY__SECTION__KEY` environment variables.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_layers(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_layers(path: Option<&Path>, environment: config::Environment) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

/// Rejects settings that would make every calculator output meaningless.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.display.decimal_places > 10 {
        return Err(ConfigError::ValidationError(
            "display.decimal_places must be at most 10".to_string(),
        ));
    }
    if config.defaults.declining_factor <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "defaults.declining_factor must be greater than 0".to_string(),
        ));
    }
    if config.logging.file_prefix.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "logging.file_prefix must not be empty".to_string(),
        ));
    }
    Ok(())
}
