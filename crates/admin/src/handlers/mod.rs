//! Admin API handlers module

pub mod api_keys;
pub mod concepts;
pub mod health;
pub mod journals;
pub mod publishers;
pub mod ratelimit;

use serde::Deserialize;

/// Shared pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: u64,

    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Display-name search filter, where a listing supports it
    pub q: Option<String>,
}

impl ListQuery {
    /// Page size clamped to a sane range
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, 200)
    }
}

fn default_limit() -> u64 {
    50
}
