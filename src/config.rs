//! Configuration management for the Chinook MCP Server.
//!
//! Configuration is loaded from environment variables following the 12-factor app pattern.
//! The dataset path is resolved once at startup and threaded into every
//! component that touches the database; nothing reads it from a global.

use crate::constants::{
    DEFAULT_DB_FILE, DEFAULT_DB_URL, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_DOWNLOAD_TIMEOUT_SECS,
    DEFAULT_MAX_QUERY_LENGTH,
};
use crate::error::ServerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Dataset location and bootstrap configuration
    pub dataset: DatasetConfig,

    /// Query gateway limits
    pub security: SecurityConfig,
}

/// Dataset location and bootstrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path of the SQLite dataset file
    pub path: PathBuf,

    /// Archive URL used when the file is missing
    pub source_url: String,

    /// Download the archive when the file is missing
    pub auto_download: bool,

    /// Timeout for the whole download
    pub download_timeout: Duration,
}

/// Query gateway limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Maximum query length (bytes)
    pub max_query_length: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// All optional:
    /// - `CHINOOK_DB_PATH`: Dataset file path (default: Chinook.db)
    /// - `CHINOOK_DB_URL`: Archive URL for bootstrap (default: sqlitetutorial.net chinook.zip)
    /// - `CHINOOK_AUTO_DOWNLOAD`: Download when the file is missing (default: true)
    /// - `CHINOOK_DOWNLOAD_TIMEOUT`: Download timeout in seconds (default: 60)
    /// - `CHINOOK_MAX_QUERY_LENGTH`: Maximum SELECT length in bytes (default: 1000000)
    pub fn from_env() -> Result<Self, ServerError> {
        let path = match std::env::var("CHINOOK_DB_PATH") {
            Ok(p) if p.trim().is_empty() => {
                return Err(ServerError::config("CHINOOK_DB_PATH cannot be empty"))
            }
            Ok(p) => PathBuf::from(p),
            Err(_) => PathBuf::from(DEFAULT_DB_FILE),
        };

        let source_url = match std::env::var("CHINOOK_DB_URL") {
            Ok(u) if u.trim().is_empty() => {
                return Err(ServerError::config("CHINOOK_DB_URL cannot be empty"))
            }
            Ok(u) => u,
            Err(_) => DEFAULT_DB_URL.to_string(),
        };

        let auto_download = std::env::var("CHINOOK_AUTO_DOWNLOAD")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        let download_timeout_secs = std::env::var("CHINOOK_DOWNLOAD_TIMEOUT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT_SECS);

        let max_query_length = std::env::var("CHINOOK_MAX_QUERY_LENGTH")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_MAX_QUERY_LENGTH);

        Ok(Config {
            dataset: DatasetConfig {
                path,
                source_url,
                auto_download,
                download_timeout: Duration::from_secs(download_timeout_secs),
            },
            security: SecurityConfig { max_query_length },
        })
    }

    /// Build a configuration for an explicit dataset path with default limits.
    ///
    /// Auto-download is disabled: the caller owns the file.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Config {
            dataset: DatasetConfig {
                path: path.into(),
                auto_download: false,
                ..DatasetConfig::default()
            },
            security: SecurityConfig::default(),
        }
    }

    /// Path of the dataset file.
    pub fn dataset_path(&self) -> &std::path::Path {
        &self.dataset.path
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE),
            source_url: DEFAULT_DB_URL.to_string(),
            auto_download: true,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "CHINOOK_DB_PATH",
        "CHINOOK_DB_URL",
        "CHINOOK_AUTO_DOWNLOAD",
        "CHINOOK_DOWNLOAD_TIMEOUT",
        "CHINOOK_MAX_QUERY_LENGTH",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.dataset.path, PathBuf::from("Chinook.db"));
        assert_eq!(config.dataset.source_url, DEFAULT_DB_URL);
        assert!(config.dataset.auto_download);
        assert_eq!(config.dataset.download_timeout, Duration::from_secs(60));
        assert_eq!(config.security.max_query_length, 1_000_000);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("CHINOOK_DB_PATH", "/tmp/other.db");
        std::env::set_var("CHINOOK_AUTO_DOWNLOAD", "0");
        std::env::set_var("CHINOOK_DOWNLOAD_TIMEOUT", "5");
        std::env::set_var("CHINOOK_MAX_QUERY_LENGTH", "not-a-number");

        let config = Config::from_env().unwrap();
        assert_eq!(config.dataset_path(), std::path::Path::new("/tmp/other.db"));
        assert!(!config.dataset.auto_download);
        assert_eq!(config.dataset.download_timeout, Duration::from_secs(5));
        // Unparseable values fall back to the default
        assert_eq!(config.security.max_query_length, DEFAULT_MAX_QUERY_LENGTH);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_path_is_rejected() {
        clear_env();
        std::env::set_var("CHINOOK_DB_PATH", "  ");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
        clear_env();
    }

    #[test]
    fn test_for_path_disables_download() {
        let config = Config::for_path("fixture.db");
        assert_eq!(config.dataset.path, PathBuf::from("fixture.db"));
        assert!(!config.dataset.auto_download);
        assert_eq!(config.security.max_query_length, DEFAULT_MAX_QUERY_LENGTH);
    }
}
