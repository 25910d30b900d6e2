//! Application configuration loaded from environment variables.
//!
//! Everything here is non-sensitive except the purchases API key, which the
//! embedding app ships the same way the rest of its client config ships.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API
    pub api_base_url: String,
    /// Fixed timeout for outbound API calls, in seconds
    pub api_timeout_secs: u64,
    /// Path of the durable key-value store file
    pub storage_path: PathBuf,
    /// Public API key for the purchases provider
    pub purchases_api_key: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_timeout_secs: 10,
            storage_path: PathBuf::from("medtrack-test-storage.json"),
            purchases_api_key: "test_purchases_key".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_base_url: env::var("MEDTRACK_API_URL")
                .unwrap_or_else(|_| "https://admin.medworld.online/api".to_string()),
            api_timeout_secs: env::var("MEDTRACK_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            storage_path: env::var("MEDTRACK_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_storage_path()),
            purchases_api_key: env::var("PURCHASES_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("PURCHASES_API_KEY"))?,
        })
    }
}

/// Default storage file under the platform data directory.
fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medtrack")
        .join("storage.json")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: env vars are process-global and tests run in parallel.
    #[test]
    fn test_config_from_env() {
        env::set_var("PURCHASES_API_KEY", "test_key");
        env::set_var("MEDTRACK_API_URL", "http://localhost:9999/api");
        env::set_var("MEDTRACK_API_TIMEOUT_SECS", "5");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.purchases_api_key, "test_key");
        assert_eq!(config.api_base_url, "http://localhost:9999/api");
        assert_eq!(config.api_timeout_secs, 5);

        env::set_var("MEDTRACK_API_TIMEOUT_SECS", "not-a-number");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.api_timeout_secs, 10);
    }
}
