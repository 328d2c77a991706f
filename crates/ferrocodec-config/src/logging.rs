//! Tracing subscriber initialisation

use crate::{ConfigError, ConfigResult, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Build the level filter; `RUST_LOG` wins over the configured level
pub fn env_filter(config: &LoggingConfig) -> ConfigResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ConfigError::invalid_value("logging.level".to_string(), e.to_string()))
}

/// Install the global `tracing` subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> ConfigResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_ansi(config.colored_output)
        .with_target(false);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ConfigError::logging(e.to_string()))
}
