//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::render::links::{StorageLinks, DEFAULT_LOCAL_ROOT, DEFAULT_S3_PUBLIC_BASE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub links: LinksConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 0 disables the timeout
    #[serde(default)]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: 0,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Storage URL rewriting
#[derive(Debug, Clone, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_s3_public_base")]
    pub s3_public_base: String,

    #[serde(default = "default_local_root")]
    pub local_root: String,
}

fn default_s3_public_base() -> String {
    DEFAULT_S3_PUBLIC_BASE.to_string()
}

fn default_local_root() -> String {
    DEFAULT_LOCAL_ROOT.to_string()
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            s3_public_base: default_s3_public_base(),
            local_root: default_local_root(),
        }
    }
}

impl LinksConfig {
    pub fn storage_links(&self) -> StorageLinks {
        StorageLinks::new(&self.s3_public_base, &self.local_root)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("policy-dashboard").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("POLICY_DASHBOARD_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(secs) = std::env::var("POLICY_DASHBOARD_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.api.request_timeout_secs = s;
            }
        }

        if let Ok(level) = std::env::var("POLICY_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("POLICY_DASHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Policy Dashboard Configuration
#
# Environment variables override these settings:
# - POLICY_DASHBOARD_API_URL
# - POLICY_DASHBOARD_TIMEOUT_SECS
# - POLICY_DASHBOARD_LOG_LEVEL
# - POLICY_DASHBOARD_LOG_FORMAT

[api]
# Backend base URL
base_url = "http://localhost:8000"

# Request timeout in seconds (0 = wait forever)
request_timeout_secs = 0

[links]
# Public endpoint that s3:// file locations are rewritten to
s3_public_base = "https://s3.amazonaws.com/"

# Root that local:// file locations are rewritten to
local_root = "/"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.request_timeout(), None);
        assert_eq!(config.links.s3_public_base, "https://s3.amazonaws.com/");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.links.local_root, "/");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://api.internal:9000\"\nrequest_timeout_secs = 15"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://api.internal:9000");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(15)));
        // Missing sections fall back to defaults
        assert_eq!(config.links.local_root, "/");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/policy-dashboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_storage_links_from_config() {
        let links = LinksConfig {
            s3_public_base: "https://mirror.example.com".to_string(),
            local_root: "/files".to_string(),
        }
        .storage_links();
        assert_eq!(links.rewrite("local://a.pdf"), "/files/a.pdf");
    }
}
