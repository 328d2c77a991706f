//! Configuration management for ferrocodec
//!
//! Codec options are validated at this edge so that adapters only ever see
//! well-formed values. Sources are layered in order:
//!
//! - **Defaults**: built-in values for every option
//! - **Files**: YAML, TOML or JSON, detected from the extension
//! - **Environment**: `FERROCODEC__SECTION__KEY` overrides
//!
//! # Examples
//!
//! ```rust
//! use ferrocodec_config::{Config, ConfigBuilder};
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_source_file("ferrocodec.yaml")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! let options = config.compression_options()?;
//! assert_eq!(options.brotli_window.get(), 22);
//! # Ok::<(), ferrocodec_config::ConfigError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use ferrocodec_types::{
    BrotliWindow, BufferSize, CompressionAlgorithm, CompressionLevel, CompressionOptions,
};
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod error;
pub mod loader;
pub mod logging;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use logging::init_logging;

/// Main configuration structure for ferrocodec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Codec configuration
    #[serde(default)]
    pub compression: CompressionSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Options handed to the codec registry
    ///
    /// The Brotli window is clamped into its valid range here.
    pub fn compression_options(&self) -> ConfigResult<CompressionOptions> {
        let buffer_size = BufferSize::new(self.compression.buffer_size).map_err(|e| {
            ConfigError::invalid_value("compression.buffer_size".to_string(), e.to_string())
        })?;

        Ok(CompressionOptions::default()
            .with_level(self.compression.level)
            .with_buffer_size(buffer_size)
            .with_brotli_window(self.compression.brotli_window))
    }
}

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionSettings {
    /// Algorithm used when a caller does not name one
    #[serde(default)]
    pub default_algorithm: CompressionAlgorithm,
    /// Default compression level
    #[serde(default)]
    pub level: CompressionLevel,
    /// Streaming buffer size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Brotli window bits; out-of-range values are clamped, not rejected
    #[serde(default = "default_brotli_window")]
    pub brotli_window: u32,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            default_algorithm: CompressionAlgorithm::None,
            level: CompressionLevel::default(),
            buffer_size: BufferSize::DEFAULT,
            brotli_window: BrotliWindow::DEFAULT,
        }
    }
}

fn default_buffer_size() -> usize {
    BufferSize::DEFAULT
}

fn default_brotli_window() -> u32 {
    BrotliWindow::DEFAULT
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatting
    #[serde(default)]
    pub json_format: bool,
    /// Enable colored output
    #[serde(default = "default_colored_output")]
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            colored_output: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_colored_output() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Config::default().compression_options().unwrap();
        assert_eq!(options, CompressionOptions::default());
    }

    #[test]
    fn test_brotli_window_clamped_at_edge() {
        let mut config = Config::default();

        config.compression.brotli_window = 5;
        assert_eq!(config.compression_options().unwrap().brotli_window.get(), 10);

        config.compression.brotli_window = 99;
        assert_eq!(config.compression_options().unwrap().brotli_window.get(), 24);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let mut config = Config::default();
        config.compression.buffer_size = 0;

        let err = config.compression_options().unwrap_err();
        assert!(err.to_string().contains("compression.buffer_size"));
    }
}
