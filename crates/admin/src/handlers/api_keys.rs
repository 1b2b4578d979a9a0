//! API key handlers
//!
//! Gated to sales staff and superusers. Every save is followed by a
//! support-desk sync whose outcome messages are returned to the operator.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::handlers::ListQuery;
use crate::AppState;
use backoffice_common::{
    auth::{generate_api_key, AuthContext, Role},
    db::models::ApiKey,
    db::ApiKeyRecord,
    errors::{AppError, Result},
    metrics,
};
use backoffice_sales::{keys, sync_api_key};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateApiKeyRequest {
    #[validate(email)]
    pub email: String,

    pub name: Option<String>,

    pub organization: Option<String>,

    /// Defaults to one year from today
    pub expires: Option<NaiveDate>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub is_demo: bool,

    pub notes: Option<String>,

    pub premium_domain: Option<String>,

    pub zendesk_organization_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateApiKeyRequest {
    #[validate(email)]
    pub email: String,

    /// Absent means keep the stored key
    pub key: Option<String>,

    pub name: Option<String>,

    pub organization: Option<String>,

    pub expires: Option<NaiveDate>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub is_demo: bool,

    pub notes: Option<String>,

    pub premium_domain: Option<String>,

    pub zendesk_organization_id: Option<i64>,
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
pub struct ApiKeyResponse {
    pub id: i64,
    pub email: String,
    pub key: String,
    pub name: Option<String>,
    pub organization: Option<String>,
    pub created: String,
    pub expires: Option<NaiveDate>,
    pub active: bool,
    pub is_demo: bool,
    pub notes: Option<String>,
    pub premium_domain: Option<String>,
    pub zendesk_organization_id: Option<i64>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(api_key: ApiKey) -> Self {
        Self {
            id: api_key.id,
            email: api_key.email,
            key: api_key.key,
            name: api_key.name,
            organization: api_key.organization,
            created: api_key.created.to_rfc3339(),
            expires: api_key.expires,
            active: api_key.active,
            is_demo: api_key.is_demo,
            notes: api_key.notes,
            premium_domain: api_key.premium_domain,
            zendesk_organization_id: api_key.zendesk_organization_id,
        }
    }
}

/// Save response: the stored key plus the support-desk sync outcome
#[derive(Serialize)]
pub struct ApiKeySaveResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,

    /// Human-readable sync messages, shown to the operator
    pub sync_messages: Vec<String>,
}

#[derive(Serialize)]
pub struct ApiKeyListResponse {
    pub items: Vec<ApiKeyResponse>,
    pub total: u64,
}

/// List API keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiKeyListResponse>> {
    auth.require_role(Role::Sales)?;

    let (api_keys, total) = state.repo.list_api_keys(query.offset, query.limit()).await?;

    Ok(Json(ApiKeyListResponse {
        items: api_keys.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Get an API key by ID
pub async fn get_api_key(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<ApiKeyResponse>> {
    auth.require_role(Role::Sales)?;

    let api_key = state
        .repo
        .find_api_key_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "api_key".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(api_key.into()))
}

/// Issue a new API key, then sync the contact to the support desk
pub async fn create_api_key(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeySaveResponse>)> {
    auth.require_role(Role::Sales)?;

    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    if state.repo.find_api_key_by_email(&request.email).await?.is_some() {
        return Err(AppError::Duplicate {
            message: format!("API key already exists for {}", request.email),
        });
    }

    let record = ApiKeyRecord {
        email: request.email,
        key: generate_api_key(),
        name: request.name,
        organization: request.organization,
        expires: Some(request.expires.unwrap_or_else(keys::default_expiry)),
        active: request.active,
        is_demo: request.is_demo,
        notes: request.notes,
        premium_domain: request.premium_domain,
        zendesk_organization_id: request.zendesk_organization_id,
    };

    let api_key = state.repo.create_api_key(record).await?;

    let report = sync_api_key(state.zendesk.as_ref(), &api_key).await?;
    metrics::record_supportdesk_sync(report.created);

    tracing::info!(
        api_key_id = api_key.id,
        email = %api_key.email,
        subject = %auth.subject,
        "API key issued"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiKeySaveResponse {
            api_key: api_key.into(),
            sync_messages: report.messages,
        }),
    ))
}

/// Update an API key, then sync the contact to the support desk
pub async fn update_api_key(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeySaveResponse>> {
    auth.require_role(Role::Sales)?;

    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let existing = state
        .repo
        .find_api_key_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "api_key".to_string(),
            id: id.to_string(),
        })?;

    let record = ApiKeyRecord {
        email: request.email,
        key: request.key.unwrap_or(existing.key),
        name: request.name,
        organization: request.organization,
        expires: request.expires,
        active: request.active,
        is_demo: request.is_demo,
        notes: request.notes,
        premium_domain: request.premium_domain,
        zendesk_organization_id: request.zendesk_organization_id,
    };

    let api_key = state.repo.update_api_key(id, record).await?;

    let report = sync_api_key(state.zendesk.as_ref(), &api_key).await?;
    metrics::record_supportdesk_sync(report.created);

    tracing::info!(
        api_key_id = id,
        email = %api_key.email,
        subject = %auth.subject,
        "API key updated"
    );

    Ok(Json(ApiKeySaveResponse {
        api_key: api_key.into(),
        sync_messages: report.messages,
    }))
}
