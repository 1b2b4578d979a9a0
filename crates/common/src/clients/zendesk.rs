//! Zendesk support-desk client
//!
//! One quirk is deliberate: user search with more than one match is a
//! structured error, while write failures (create, update, tag) are
//! reported as a failure bucket and never raised.

use crate::errors::{AppError, Result};
use crate::PREMIUM_TAG;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Support-desk contact record
#[derive(Debug, Clone, Deserialize)]
pub struct SupportDeskUser {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub organization_id: Option<i64>,
}

/// Fields for creating a support-desk contact
#[derive(Debug, Clone, Serialize)]
pub struct NewSupportDeskUser {
    pub email: String,
    pub name: String,

    /// Attach an organization by name (only when no external org id is known)
    pub organization_name: Option<String>,
}

/// Support-desk operations used by the API-key sync
#[async_trait]
pub trait SupportDesk: Send + Sync {
    /// Exact-match user lookup by email. Zero matches is `None`; more
    /// than one match is an error.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<SupportDeskUser>>;

    /// Create a contact with the premium tag. `Ok(None)` is the write
    /// failure bucket (unexpected status).
    async fn create_user(&self, user: &NewSupportDeskUser) -> Result<Option<SupportDeskUser>>;

    /// Update a contact's display name. `Ok(false)` is the failure bucket.
    async fn update_user_name(&self, user_id: i64, name: &str) -> Result<bool>;

    /// Ensure the premium tag on a contact. `Ok(false)` is the failure bucket.
    async fn add_premium_tag(&self, user_id: i64) -> Result<bool>;
}

/// Zendesk REST client
pub struct ZendeskClient {
    client: reqwest::Client,
    api_base: String,
    user_account: String,
    api_token: String,
}

#[derive(Deserialize)]
struct UserSearchResponse {
    count: u64,

    #[serde(default)]
    users: Vec<SupportDeskUser>,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: SupportDeskUser,
}

impl ZendeskClient {
    /// Create a new client with token auth credentials
    pub fn new(api_base: String, user_account: String, api_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            user_account,
            api_token,
        }
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(format!("{}/token", self.user_account), Some(&self.api_token))
    }
}

/// Resolve a search result per the uniqueness contract: one hit is the
/// user, zero is unknown, anything else is a programming-visible error.
fn resolve_search(email: &str, count: u64, users: Vec<SupportDeskUser>) -> Result<Option<SupportDeskUser>> {
    match count {
        0 => Ok(None),
        1 => Ok(users.into_iter().next()),
        n => Err(AppError::MultipleUsersFound {
            email: email.to_string(),
            count: n,
        }),
    }
}

#[async_trait]
impl SupportDesk for ZendeskClient {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<SupportDeskUser>> {
        let url = format!("{}/users/search.json", self.api_base);

        let response = self
            .request(reqwest::Method::GET, url)
            .query(&[("query", format!("email:{}", email))])
            .send()
            .await?
            .error_for_status()?;

        let body: UserSearchResponse = response.json().await?;
        resolve_search(email, body.count, body.users)
    }

    async fn create_user(&self, user: &NewSupportDeskUser) -> Result<Option<SupportDeskUser>> {
        let url = format!("{}/users.json", self.api_base);

        let mut payload = json!({
            "email": user.email,
            "name": user.name,
            "tags": [PREMIUM_TAG],
        });
        if let Some(ref org_name) = user.organization_name {
            payload["organization"] = json!({ "name": org_name });
        }

        let response = self
            .request(reqwest::Method::POST, url)
            .query(&[("skip_verify_email", "true")])
            .json(&json!({ "user": payload }))
            .send()
            .await?;

        if response.status().as_u16() > 299 {
            return Ok(None);
        }

        let body: UserEnvelope = response.json().await?;
        Ok(Some(body.user))
    }

    async fn update_user_name(&self, user_id: i64, name: &str) -> Result<bool> {
        let url = format!("{}/users/{}.json", self.api_base, user_id);

        let response = self
            .request(reqwest::Method::PUT, url)
            .json(&json!({ "user": { "name": name } }))
            .send()
            .await?;

        Ok(response.status().as_u16() <= 299)
    }

    async fn add_premium_tag(&self, user_id: i64) -> Result<bool> {
        let url = format!("{}/users/{}/tags.json", self.api_base, user_id);

        let response = self
            .request(reqwest::Method::PUT, url)
            .json(&json!({ "tags": [PREMIUM_TAG] }))
            .send()
            .await?;

        Ok(response.status().as_u16() <= 299)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> SupportDeskUser {
        SupportDeskUser {
            id,
            name: None,
            email: None,
            organization_id: None,
        }
    }

    #[test]
    fn test_resolve_search_single_hit() {
        let resolved = resolve_search("a@x.com", 1, vec![user(7)]).unwrap();
        assert_eq!(resolved.map(|u| u.id), Some(7));
    }

    #[test]
    fn test_resolve_search_no_hits() {
        assert!(resolve_search("a@x.com", 0, vec![]).unwrap().is_none());
    }

    #[test]
    fn test_resolve_search_ambiguous_is_error() {
        let err = resolve_search("a@x.com", 2, vec![user(1), user(2)]).unwrap_err();
        assert!(matches!(err, AppError::MultipleUsersFound { count: 2, .. }));
    }

    #[test]
    fn test_search_response_shape() {
        let raw = r#"{"count": 1, "users": [{"id": 42, "name": "Ada", "email": "ada@x.com"}]}"#;
        let parsed: UserSearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.count, 1);
        assert_eq!(parsed.users[0].id, 42);
    }
}
