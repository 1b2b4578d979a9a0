//! Database layer for the back-office
//!
//! Provides:
//! - SeaORM entity models
//! - Repository pattern for data access
//! - Connection pool management for the three logical databases

pub mod models;
mod repository;

pub use repository::{
    ApiKeyRecord, JournalRecord, PublisherRecord, RatelimitExemptRecord, Repository,
};

use crate::config::DatabasesConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// Connection pools for the three logical databases.
///
/// Reference data (concepts, publishers, journals) and API keys live in
/// separate databases; the warehouse holds the full corpus and is never
/// written by this service.
#[derive(Clone)]
pub struct DbPools {
    /// Reference-data connection (concept, publisher, journal)
    pub reference: DatabaseConnection,

    /// API-keys connection (api_key, ratelimit_exempt)
    pub api_keys: DatabaseConnection,

    /// Warehouse connection (paper counts) - read-only
    pub warehouse: DatabaseConnection,
}

impl DbPools {
    /// Create the pools from configuration
    pub async fn new(config: &DatabasesConfig) -> Result<Self> {
        let reference = connect("reference", &config.url, config).await?;
        let api_keys = connect("api_keys", &config.api_keys_url, config).await?;
        let warehouse = connect("warehouse", &config.warehouse_url, config).await?;

        info!("Database connections established");

        Ok(Self {
            reference,
            api_keys,
            warehouse,
        })
    }

    /// Ping all three databases to check connectivity
    pub async fn ping(&self) -> Result<()> {
        use sea_orm::ConnectionTrait;

        for (name, conn) in [
            ("reference", &self.reference),
            ("api_keys", &self.api_keys),
            ("warehouse", &self.warehouse),
        ] {
            conn.execute_unprepared("SELECT 1")
                .await
                .map_err(|e| AppError::DatabaseConnection {
                    message: format!("{} ping failed: {}", name, e),
                })?;
        }

        Ok(())
    }
}

async fn connect(
    name: &str,
    url: &str,
    config: &DatabasesConfig,
) -> Result<DatabaseConnection> {
    info!(database = name, "Connecting...");

    let mut opts = ConnectOptions::new(url);
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .sqlx_logging(true);

    Database::connect(opts)
        .await
        .map_err(|e| AppError::DatabaseConnection {
            message: format!("Failed to connect to {}: {}", name, e),
        })
}
