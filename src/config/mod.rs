use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub goodreads: GoodreadsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string, e.g. `sqlite://bookden.db?mode=rwc`
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: None }
    }
}

impl DatabaseConfig {
    /// The connection string from the config file, falling back to the
    /// DATABASE_URL environment variable. Startup refuses to continue
    /// without one.
    pub fn resolve_url(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                return Ok(url);
            }
        }
        anyhow::bail!("no database configured: set [database] url or DATABASE_URL")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoodreadsConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_goodreads_base_url")]
    pub base_url: String,
}

impl Default for GoodreadsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_goodreads_base_url(),
        }
    }
}

fn default_goodreads_base_url() -> String {
    "https://www.goodreads.com".to_string()
}

impl GoodreadsConfig {
    /// The API key from the config file, falling back to the GOODREADS_KEY
    /// environment variable.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        if let Ok(key) = std::env::var("GOODREADS_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }
        anyhow::bail!("no Goodreads API key configured: set [goodreads] api_key or GOODREADS_KEY")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            goodreads: GoodreadsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, None);
        assert_eq!(config.goodreads.api_key, None);
        assert_eq!(config.goodreads.base_url, "https://www.goodreads.com");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "sqlite://test.db?mode=rwc"

            [goodreads]
            api_key = "abc123"
            base_url = "http://localhost:4000"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url.as_deref(), Some("sqlite://test.db?mode=rwc"));
        assert_eq!(config.goodreads.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.goodreads.base_url, "http://localhost:4000");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_configured_values_win_over_env() {
        let config = DatabaseConfig {
            url: Some("sqlite://from-file.db".to_string()),
        };
        assert_eq!(config.resolve_url().unwrap(), "sqlite://from-file.db");

        let config = GoodreadsConfig {
            api_key: Some("file-key".to_string()),
            base_url: default_goodreads_base_url(),
        };
        assert_eq!(config.resolve_api_key().unwrap(), "file-key");
    }
}
