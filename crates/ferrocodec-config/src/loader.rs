//! Configuration loader utilities

use crate::{Config, ConfigBuilder, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `FERROCODEC__COMPRESSION__LEVEL`
pub const ENV_PREFIX: &str = "FERROCODEC";

/// Configuration loader with common loading patterns
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the first file found in the working directory,
    /// then apply environment overrides
    pub fn load_default() -> ConfigResult<Config> {
        let mut builder = ConfigBuilder::new().add_defaults();

        if let Some(path) = Self::config_exists() {
            builder = builder.add_source_file(path);
        }

        builder.add_env_prefix(ENV_PREFIX).build()
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Configuration file not found",
                ),
            });
        }

        ConfigBuilder::new()
            .add_defaults()
            .add_source_file(path)
            .add_env_prefix(ENV_PREFIX)
            .build()
    }

    /// Save configuration to a file, format chosen by extension
    pub fn save_to_file<P: AsRef<Path>>(config: &Config, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(config)?,
            Some("json") => serde_json::to_string_pretty(config)?,
            _ => serde_yaml::to_string(config)?,
        };

        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the default configuration to a file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> ConfigResult<()> {
        Self::save_to_file(&Config::default(), path)
    }

    /// First configuration file present in the working directory
    pub fn config_exists() -> Option<PathBuf> {
        [
            "ferrocodec.yaml",
            "ferrocodec.yml",
            "ferrocodec.toml",
            "ferrocodec.json",
        ]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrocodec_types::{CompressionAlgorithm, CompressionLevel};
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_load_default() {
        let config = ConfigLoader::load_default().unwrap();
        assert!(config.compression.buffer_size > 0);
    }

    #[rstest]
    #[case("test.yaml")]
    #[case("test.toml")]
    #[case("test.json")]
    fn test_save_and_load(#[case] file_name: &str) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(file_name);

        let mut original = Config::default();
        original.compression.default_algorithm = CompressionAlgorithm::Brotli;
        original.compression.level = CompressionLevel::Fastest;
        original.compression.brotli_window = 18;
        original.logging.json_format = true;

        ConfigLoader::save_to_file(&original, &config_path).unwrap();
        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigLoader::load_from_file(temp_dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_generate_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("default.yaml");

        ConfigLoader::generate_default_config(&config_path).unwrap();
        assert!(config_path.exists());

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config, Config::default());
    }
}
