//! Layered configuration: CLI overrides > environment > TOML file > defaults.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::catalog_service::CatalogSettings;
use crate::domain::RatingPolicy;
use crate::storage::{validate_key, DEFAULT_STORAGE_KEY};

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    pub rating_policy: RatingPolicy,
    pub channel_capacity: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{}`", other)),
        }
    }
}

/// Values supplied on the command line.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub rating_policy: Option<RatingPolicy>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from(".catalog"),
                key: DEFAULT_STORAGE_KEY.to_string(),
            },
            catalog: CatalogConfig {
                rating_policy: RatingPolicy::Lenient,
                channel_capacity: 32,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Compact,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    storage: FileStorage,
    #[serde(default)]
    catalog: FileCatalog,
    #[serde(default)]
    logging: FileLogging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileStorage {
    data_dir: Option<PathBuf>,
    key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileCatalog {
    rating_policy: Option<RatingPolicy>,
    channel_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLogging {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        Self::load_with_env(options, |key| std::env::var(key).ok())
    }

    /// Loads configuration with `env` standing in for the environment.
    pub fn load_with_env(
        options: LoadOptions,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        let explicit_path = options
            .config_path
            .clone()
            .or_else(|| env("CATALOG_CONFIG").map(PathBuf::from));
        match explicit_path {
            Some(path) => config.apply_file(&read_file_config(&path)?),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config.apply_file(&read_file_config(path)?);
                }
            }
        }

        config.apply_env(&env)?;
        config.apply_overrides(options.overrides);
        config.validate()?;
        Ok(config)
    }

    /// Settings handed to the catalog service.
    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            storage_key: self.storage.key.clone(),
            rating_policy: self.catalog.rating_policy,
            channel_capacity: self.catalog.channel_capacity,
        }
    }

    fn apply_file(&mut self, file: &FileConfig) {
        if let Some(dir) = &file.storage.data_dir {
            self.storage.data_dir = dir.clone();
        }
        if let Some(key) = &file.storage.key {
            self.storage.key = key.clone();
        }
        if let Some(policy) = file.catalog.rating_policy {
            self.catalog.rating_policy = policy;
        }
        if let Some(capacity) = file.catalog.channel_capacity {
            self.catalog.channel_capacity = capacity;
        }
        if let Some(level) = &file.logging.level {
            self.logging.level = level.clone();
        }
        if let Some(format) = file.logging.format {
            self.logging.format = format;
        }
    }

    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(dir) = env("CATALOG_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = env("CATALOG_STORAGE_KEY") {
            self.storage.key = key;
        }
        if let Some(value) = env("CATALOG_RATING_POLICY") {
            self.catalog.rating_policy = parse_env("CATALOG_RATING_POLICY", value)?;
        }
        if let Some(value) = env("CATALOG_CHANNEL_CAPACITY") {
            self.catalog.channel_capacity = parse_env("CATALOG_CHANNEL_CAPACITY", value)?;
        }
        if let Some(level) = env("CATALOG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(value) = env("CATALOG_LOG_FORMAT") {
            self.logging.format = parse_env("CATALOG_LOG_FORMAT", value)?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(dir) = overrides.data_dir {
            self.storage.data_dir = dir;
        }
        if let Some(policy) = overrides.rating_policy {
            self.catalog.rating_policy = policy;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_key(&self.storage.key).map_err(|e| ConfigError::Validation(e.to_string()))?;
        if self.catalog.channel_capacity == 0 {
            return Err(ConfigError::Validation(
                "catalog.channel_capacity must be greater than zero".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("catalog.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let options = LoadOptions {
            config_path: Some(PathBuf::from("/definitely/not/here/catalog.toml")),
            ..LoadOptions::default()
        };
        assert!(matches!(
            AppConfig::load_with_env(options, env_from(&[])),
            Err(ConfigError::ReadFile { .. })
        ));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[storage]
data_dir = "/var/lib/catalog"
key = "shop"

[catalog]
rating_policy = "strict"

[logging]
format = "json"
"#,
        );

        let options = LoadOptions { config_path: Some(path), ..LoadOptions::default() };
        let config = AppConfig::load_with_env(options, env_from(&[])).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/catalog"));
        assert_eq!(config.storage.key, "shop");
        assert_eq!(config.catalog.rating_policy, RatingPolicy::Strict);
        assert_eq!(config.catalog.channel_capacity, 32);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn env_beats_file_and_flags_beat_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[storage]\ndata_dir = \"from-file\"\n");

        let options = LoadOptions {
            config_path: Some(path),
            overrides: ConfigOverrides {
                log_level: Some("debug".to_string()),
                ..ConfigOverrides::default()
            },
        };
        let env = env_from(&[
            ("CATALOG_DATA_DIR", "from-env"),
            ("CATALOG_LOG_LEVEL", "warn"),
            ("CATALOG_CHANNEL_CAPACITY", "8"),
        ]);
        let config = AppConfig::load_with_env(options, env).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("from-env"));
        assert_eq!(config.catalog.channel_capacity, 8);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn bad_env_values_are_reported() {
        let err = AppConfig::load_with_env(
            LoadOptions::default(),
            env_from(&[("CATALOG_RATING_POLICY", "sometimes")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvOverride { ref key, .. } if key == "CATALOG_RATING_POLICY"));
    }

    #[test]
    fn validation_rejects_unusable_values() {
        let err = AppConfig::load_with_env(
            LoadOptions::default(),
            env_from(&[("CATALOG_STORAGE_KEY", "../products")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = AppConfig::load_with_env(
            LoadOptions::default(),
            env_from(&[("CATALOG_CHANNEL_CAPACITY", "0")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn unknown_file_keys_fail_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[storage]\ndirectory = \"x\"\n");
        let options = LoadOptions { config_path: Some(path), ..LoadOptions::default() };
        assert!(matches!(
            AppConfig::load_with_env(options, env_from(&[])),
            Err(ConfigError::ParseFile { .. })
        ));
    }
}
