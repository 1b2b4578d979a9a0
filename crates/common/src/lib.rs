//! OpenAlex Back-office Common Library
//!
//! Shared code for the back-office service including:
//! - Database pools, entity models and repository
//! - External API clients (Wikidata, ROR, Zendesk, Heroku)
//! - Error types and handling
//! - Configuration management
//! - Authorization context and JWT utilities
//! - Metrics

pub mod auth;
pub mod clients;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPools, Repository};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tag applied to support-desk contacts that hold a paid API key
pub const PREMIUM_TAG: &str = "premium";
