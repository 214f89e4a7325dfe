//! Client configuration.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Origin the client assumes it is served from when nothing else is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// Fixed path of the API relative to the origin.
pub const API_PATH: &str = "/api";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// API URL baked in at build time through the `CAMPUS_API_URL` env var.
///
/// Blank values count as unset.
pub fn compile_time_api_url() -> Option<&'static str> {
    option_env!("CAMPUS_API_URL")
        .map(str::trim)
        .filter(|url| !url.is_empty())
}

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Origin the API is co-hosted with.
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Explicit API base URL. Takes precedence over `origin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            origin: default_origin(),
            api_url: None,
        }
    }
}

impl Config {
    /// Load configuration from the config file if present, then apply
    /// environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn load_from_env(&mut self) {
        if let Some(level) = env_value("CAMPUS_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(origin) = env_value("CAMPUS_ORIGIN") {
            self.origin = origin;
        }
        if let Some(url) = env_value("CAMPUS_API_URL") {
            self.api_url = Some(url);
        }
    }

    /// Resolve the API base URL, without a trailing slash.
    ///
    /// Order: explicit `api_url` (file or runtime env), the build-time
    /// `CAMPUS_API_URL`, then `<origin>/api`.
    pub fn api_base_url(&self) -> CoreResult<String> {
        let explicit = self
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .or_else(|| compile_time_api_url());

        let base = match explicit {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let origin = self.origin.trim();
                if origin.is_empty() {
                    return Err(CoreError::Config("origin must not be empty".to_string()));
                }
                format!("{}{}", origin.trim_end_matches('/'), API_PATH)
            }
        };

        Url::parse(&base)?;
        Ok(base)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert!(config.api_url.is_none());
    }

    #[test]
    fn test_default_base_url_is_same_origin_api() {
        if compile_time_api_url().is_some() {
            return;
        }
        let config = Config::default();
        assert_eq!(config.api_base_url().unwrap(), "http://localhost:5173/api");
    }

    #[test]
    fn test_origin_trailing_slash_is_trimmed() {
        if compile_time_api_url().is_some() {
            return;
        }
        let config = Config {
            origin: "https://events.example.edu/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.api_base_url().unwrap(),
            "https://events.example.edu/api"
        );
    }

    #[test]
    fn test_explicit_api_url_wins() {
        let config = Config {
            api_url: Some("http://127.0.0.1:5000/api/".to_string()),
            ..Config::default()
        };
        assert_eq!(config.api_base_url().unwrap(), "http://127.0.0.1:5000/api");
    }

    #[test]
    fn test_blank_api_url_falls_back_to_origin() {
        if compile_time_api_url().is_some() {
            return;
        }
        let config = Config {
            api_url: Some("   ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.api_base_url().unwrap(), "http://localhost:5173/api");
    }

    #[test]
    fn test_invalid_api_url() {
        let config = Config {
            api_url: Some("not a valid url".to_string()),
            ..Config::default()
        };
        assert!(config.api_base_url().is_err());
    }

    #[test]
    fn test_config_load_from_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn test_config_load_reads_file_under_base_dir() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        std::fs::write(
            paths.config_file(),
            r#"{ "origin": "https://campus.example.edu" }"#,
        )
        .unwrap();

        let config = Config::load(&paths).unwrap();
        if std::env::var_os("CAMPUS_ORIGIN").is_none() {
            assert_eq!(config.origin, "https://campus.example.edu");
        }
    }

    #[test]
    fn test_padded_api_url_is_trimmed() {
        let config = Config {
            api_url: Some("  https://events.example.edu/api/  ".to_string()),
            ..Config::default()
        };
        let base = config.api_base_url().unwrap();
        drop(config);
        assert_eq!(base, "https://events.example.edu/api");
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        assert!(Config::load(&paths).is_ok());
        assert!(!paths.config_file().exists());
    }
}
