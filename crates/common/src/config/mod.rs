//! Configuration management for the back-office service
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration (three logical databases)
    pub databases: DatabasesConfig,

    /// Wikidata lookup configuration
    #[serde(default)]
    pub wikidata: WikidataConfig,

    /// ROR registry configuration
    #[serde(default)]
    pub ror: RorConfig,

    /// Zendesk support-desk configuration
    pub zendesk: ZendeskConfig,

    /// Heroku hosting-platform configuration
    pub heroku: HerokuConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

/// The service talks to three logical databases: reference data
/// (publishers, journals), API keys, and the read-only warehouse
/// (concepts, paper counts).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabasesConfig {
    /// Reference-data database URL
    pub url: String,

    /// API-keys database URL
    pub api_keys_url: String,

    /// Warehouse database URL (read-only from this service)
    pub warehouse_url: String,

    /// Maximum number of connections per pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections per pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WikidataConfig {
    /// Wikidata API endpoint
    #[serde(default = "default_wikidata_api_base")]
    pub api_base: String,
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            api_base: default_wikidata_api_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RorConfig {
    /// ROR API base URL
    #[serde(default = "default_ror_api_base")]
    pub api_base: String,
}

impl Default for RorConfig {
    fn default() -> Self {
        Self {
            api_base: default_ror_api_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZendeskConfig {
    /// Zendesk API base URL, e.g. https://example.zendesk.com/api/v2
    pub api_base: String,

    /// Account email used for token auth
    pub user_account: String,

    /// API token
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HerokuConfig {
    /// Heroku platform API base URL
    #[serde(default = "default_heroku_api_base")]
    pub api_base: String,

    /// Platform API key
    pub api_key: String,

    /// Name of the API proxy app that consumes the exemption list
    pub proxy_app_name: String,

    /// Config var holding the semicolon-joined exempt emails
    #[serde(default = "default_exempt_config_var")]
    pub exempt_config_var: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT secret for token signing
    pub jwt_secret: String,

    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_max_connections() -> u32 { 20 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 600 }
fn default_wikidata_api_base() -> String { "https://www.wikidata.org/w/api.php".to_string() }
fn default_ror_api_base() -> String { "https://api.ror.org".to_string() }
fn default_heroku_api_base() -> String { "https://api.heroku.com".to_string() }
fn default_exempt_config_var() -> String { "RATE_LIMIT_EXEMPTIONS".to_string() }
fn default_jwt_expiration() -> u64 { 3600 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 9090 }
fn default_service_name() -> String { "openalex-backoffice".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                shutdown_timeout_secs: default_shutdown_timeout(),
            },
            databases: DatabasesConfig {
                url: "postgres://localhost/backoffice".to_string(),
                api_keys_url: "postgres://localhost/api_keys".to_string(),
                warehouse_url: "postgres://localhost/openalex".to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
            },
            wikidata: WikidataConfig::default(),
            ror: RorConfig::default(),
            zendesk: ZendeskConfig {
                api_base: "https://example.zendesk.com/api/v2".to_string(),
                user_account: String::new(),
                api_token: String::new(),
            },
            heroku: HerokuConfig {
                api_base: default_heroku_api_base(),
                api_key: String::new(),
                proxy_app_name: "openalex-api-proxy".to_string(),
                exempt_config_var: default_exempt_config_var(),
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_expiration_secs: default_jwt_expiration(),
            },
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logging: default_json_logging(),
                metrics_port: default_metrics_port(),
                service_name: default_service_name(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.wikidata.api_base, "https://www.wikidata.org/w/api.php");
        assert_eq!(config.heroku.exempt_config_var, "RATE_LIMIT_EXEMPTIONS");
    }

    #[test]
    fn test_three_database_urls() {
        let config = AppConfig::default();
        assert_ne!(config.databases.url, config.databases.api_keys_url);
        assert_ne!(config.databases.api_keys_url, config.databases.warehouse_url);
    }
}
