//! Rate-limit exemption handlers
//!
//! Gated to sales staff and superusers. Every save recomputes the full
//! active allow-list and pushes it to the hosting platform; the response
//! carries the platform's raw status code and the exempt count.

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
    auth::{AuthContext, Role},
    db::models::RatelimitExempt,
    db::RatelimitExemptRecord,
    errors::{AppError, Result},
    metrics,
};
use backoffice_sales::push_exempt_list;

#[derive(Debug, Deserialize, Validate)]
pub struct ExemptPayload {
    #[validate(email)]
    pub email: String,

    #[serde(default = "default_true")]
    pub active: bool,

    pub expires: Option<NaiveDate>,

    pub notes: Option<String>,

    pub ticket: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
pub struct ExemptResponse {
    pub id: i64,
    pub email: String,
    pub active: bool,
    pub expires: Option<NaiveDate>,
    pub notes: Option<String>,
    pub ticket: Option<String>,
}

impl From<RatelimitExempt> for ExemptResponse {
    fn from(exempt: RatelimitExempt) -> Self {
        Self {
            id: exempt.id,
            email: exempt.email,
            active: exempt.active,
            expires: exempt.expires,
            notes: exempt.notes,
            ticket: exempt.ticket,
        }
    }
}

/// Save response: the stored row plus the allow-list push outcome
#[derive(Serialize)]
pub struct ExemptSaveResponse {
    #[serde(flatten)]
    pub exempt: ExemptResponse,

    /// Raw platform response status for the config-var patch
    pub push_status: u16,

    /// Number of active exempt emails pushed
    pub exempt_count: usize,
}

#[derive(Serialize)]
pub struct ExemptListResponse {
    pub items: Vec<ExemptResponse>,
    pub total: u64,
}

/// Recompute and push the active allow-list after a save
async fn push_allow_list(state: &AppState) -> Result<(u16, usize)> {
    let emails = state.repo.active_exempt_emails().await?;

    let push = push_exempt_list(
        state.heroku.as_ref(),
        &state.config.heroku.proxy_app_name,
        &state.config.heroku.exempt_config_var,
        emails,
    )
    .await?;

    metrics::record_exempt_push(push.status);
    Ok((push.status, push.count))
}

/// List exemptions
pub async fn list_exempts(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<ExemptListResponse>> {
    auth.require_role(Role::Sales)?;

    let (exempts, total) = state.repo.list_exempts(query.offset, query.limit()).await?;

    Ok(Json(ExemptListResponse {
        items: exempts.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Get an exemption by ID
pub async fn get_exempt(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<ExemptResponse>> {
    auth.require_role(Role::Sales)?;

    let exempt = state
        .repo
        .find_exempt_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "ratelimit_exempt".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(exempt.into()))
}

/// Create an exemption, then push the recomputed allow-list
pub async fn create_exempt(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<ExemptPayload>,
) -> Result<(StatusCode, Json<ExemptSaveResponse>)> {
    auth.require_role(Role::Sales)?;

    payload.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let exempt = state
        .repo
        .create_exempt(RatelimitExemptRecord {
            email: payload.email,
            active: payload.active,
            expires: payload.expires,
            notes: payload.notes,
            ticket: payload.ticket,
        })
        .await?;

    let (push_status, exempt_count) = push_allow_list(&state).await?;

    tracing::info!(
        exempt_id = exempt.id,
        email = %exempt.email,
        subject = %auth.subject,
        push_status,
        exempt_count,
        "Rate-limit exemption created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ExemptSaveResponse {
            exempt: exempt.into(),
            push_status,
            exempt_count,
        }),
    ))
}

/// Update an exemption, then push the recomputed allow-list
pub async fn update_exempt(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    Json(payload): Json<ExemptPayload>,
) -> Result<Json<ExemptSaveResponse>> {
    auth.require_role(Role::Sales)?;

    payload.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    state
        .repo
        .find_exempt_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "ratelimit_exempt".to_string(),
            id: id.to_string(),
        })?;

    let exempt = state
        .repo
        .update_exempt(
            id,
            RatelimitExemptRecord {
                email: payload.email,
                active: payload.active,
                expires: payload.expires,
                notes: payload.notes,
                ticket: payload.ticket,
            },
        )
        .await?;

    let (push_status, exempt_count) = push_allow_list(&state).await?;

    tracing::info!(
        exempt_id = id,
        email = %exempt.email,
        subject = %auth.subject,
        push_status,
        exempt_count,
        "Rate-limit exemption updated"
    );

    Ok(Json(ExemptSaveResponse {
        exempt: exempt.into(),
        push_status,
        exempt_count,
    }))
}
