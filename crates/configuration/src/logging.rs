use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "tally",
    "configuration",
    "context",
    "conversions",
    "finance",
    "health",
    "report",
    "schedules",
    "validation",
];

/// Maps `-v` repetitions to a level. Zero falls back to the configured level.
fn level_for(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` overrides both the configured level and the `-v` flags. Console
/// output always goes to stderr so stdout stays clean for rendered results.
/// When `settings.directory` is set, a daily rolling file layer is added; the
/// returned guard must be held until shutdown so buffered lines are flushed.
pub fn init_tracing(
    settings: &LoggingSettings,
    verbosity: u8,
) -> Result<Option<WorkerGuard>, ConfigError> {
    let level = level_for(verbosity, &settings.level);
    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &settings.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(level_for(0, "warn"), "warn");
        assert_eq!(level_for(1, "warn"), "info");
        assert_eq!(level_for(2, "warn"), "debug");
        assert_eq!(level_for(7, "warn"), "trace");
    }
}
