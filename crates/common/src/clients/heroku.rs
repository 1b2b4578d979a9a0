//! Heroku platform API client (config vars)

use crate::errors::Result;
use async_trait::async_trait;
use std::collections::HashMap;

const HEROKU_ACCEPT: &str = "application/vnd.heroku+json; version=3";

/// Hosting-platform configuration operations
#[async_trait]
pub trait PlatformConfig: Send + Sync {
    /// Read an app's config vars
    async fn config_vars(&self, app_name: &str) -> Result<HashMap<String, String>>;

    /// Patch an app's config vars, returning the raw response status.
    /// The status is intentionally not checked here; callers surface it.
    async fn update_config_vars(
        &self,
        app_name: &str,
        vars: &HashMap<String, String>,
    ) -> Result<u16>;
}

/// Heroku REST client
pub struct HerokuClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl HerokuClient {
    /// Create a new client with the given platform API key
    pub fn new(api_base: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
        }
    }

    fn config_vars_url(&self, app_name: &str) -> String {
        format!("{}/apps/{}/config-vars", self.api_base, app_name)
    }
}

#[async_trait]
impl PlatformConfig for HerokuClient {
    async fn config_vars(&self, app_name: &str) -> Result<HashMap<String, String>> {
        let response = self
            .client
            .get(self.config_vars_url(app_name))
            .header(reqwest::header::ACCEPT, HEROKU_ACCEPT)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn update_config_vars(
        &self,
        app_name: &str,
        vars: &HashMap<String, String>,
    ) -> Result<u16> {
        let response = self
            .client
            .patch(self.config_vars_url(app_name))
            .header(reqwest::header::ACCEPT, HEROKU_ACCEPT)
            .bearer_auth(&self.api_key)
            .json(vars)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::info!(app = app_name, status, "Patched platform config vars");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_vars_url() {
        let client = HerokuClient::new(
            "https://api.heroku.com".to_string(),
            "secret".to_string(),
        );
        assert_eq!(
            client.config_vars_url("openalex-api-proxy"),
            "https://api.heroku.com/apps/openalex-api-proxy/config-vars"
        );
    }
}
