use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty or missing `tally.toml` is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
    pub defaults: Defaults,
    pub context: ContextSettings,
}

/// How monetary results are formatted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Prefix placed in front of every currency amount (e.g., "$", "€").
    pub currency_symbol: String,
    /// Grouping separator for the integer part. Empty disables grouping.
    pub thousands_separator: String,
    /// Number of decimal places shown for currency. Results are rounded
    /// half away from zero, the way a receipt would show them.
    pub decimal_places: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_places: 2,
        }
    }
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when neither `RUST_LOG` nor `-v` flags are given.
    pub level: String,
    /// When set, logs are additionally written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    /// File name prefix for the rolling log files.
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
            file_prefix: "tally.log".to_string(),
        }
    }
}

/// Fallback values used when a calculator flag is omitted on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub output_format: OutputFormat,
    pub theme: Theme,
    /// Multiplier for declining-balance depreciation. 2 is double-declining.
    pub declining_factor: Decimal,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Table,
            theme: Theme::Light,
            declining_factor: dec!(2),
        }
    }
}

/// Where the application context persists user preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// JSON file holding the persisted theme. `None` keeps the theme in memory only.
    pub theme_store: Option<PathBuf>,
}

/// The rendering format for calculator results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// The visual theme used by the table renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the other theme.
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
