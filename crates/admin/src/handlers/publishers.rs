//! Publisher handlers
//!
//! Every save runs the external enrichment pass and persists its derived
//! fields, overwriting whatever was stored before.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::handlers::ListQuery;
use crate::AppState;
use backoffice_common::{
    auth::{AuthContext, Role},
    db::models::Publisher,
    db::PublisherRecord,
    errors::{AppError, Result},
    metrics,
};
use backoffice_curation::{PublisherDraft, PublisherEnricher};

#[derive(Debug, Deserialize, Validate)]
pub struct PublisherPayload {
    #[validate(length(min = 1, max = 500))]
    pub display_name: String,

    pub wikidata_id: Option<String>,

    pub ror_id: Option<String>,

    pub parent_publisher_id: Option<i64>,

    pub hierarchy_level: Option<i32>,

    #[serde(default)]
    pub is_approved: bool,
}

#[derive(Serialize)]
pub struct PublisherResponse {
    pub publisher_id: i64,
    pub display_name: String,
    /// Serialized JSON list, derived on every save
    pub alternate_titles: Option<String>,
    pub wikidata_id: Option<String>,
    pub country_code: Option<String>,
    pub parent_publisher_id: Option<i64>,
    pub ror_id: Option<String>,
    pub hierarchy_level: i32,
    pub is_approved: bool,
    pub created_date: String,
    pub updated_date: String,
}

impl From<Publisher> for PublisherResponse {
    fn from(publisher: Publisher) -> Self {
        Self {
            publisher_id: publisher.publisher_id,
            display_name: publisher.display_name,
            alternate_titles: publisher.alternate_titles,
            wikidata_id: publisher.wikidata_id,
            country_code: publisher.country_code,
            parent_publisher_id: publisher.parent_publisher_id,
            ror_id: publisher.ror_id,
            hierarchy_level: publisher.hierarchy_level,
            is_approved: publisher.is_approved,
            created_date: publisher.created_date.to_rfc3339(),
            updated_date: publisher.updated_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct PublisherListResponse {
    pub items: Vec<PublisherResponse>,
    pub total: u64,
}

/// Run the enrichment pass and assemble the full record to persist
async fn enriched_record(state: &AppState, payload: PublisherPayload) -> Result<PublisherRecord> {
    let draft = PublisherDraft {
        display_name: payload.display_name.clone(),
        wikidata_id: payload.wikidata_id.clone(),
        ror_id: payload.ror_id.clone(),
        hierarchy_level: payload.hierarchy_level,
    };

    let enricher = PublisherEnricher::new(state.wikidata.as_ref(), state.ror.as_ref());
    let enriched = enricher.enrich(&draft).await?;

    metrics::record_enrichment(draft.ror_id.is_none() && enriched.ror_id.is_some());

    Ok(PublisherRecord {
        display_name: payload.display_name,
        alternate_titles: Some(enriched.alternate_titles),
        wikidata_id: payload.wikidata_id,
        country_code: enriched.country_code,
        parent_publisher_id: payload.parent_publisher_id,
        ror_id: enriched.ror_id,
        hierarchy_level: enriched.hierarchy_level,
        is_approved: payload.is_approved,
    })
}

/// List publishers
pub async fn list_publishers(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<PublisherListResponse>> {
    auth.require_role(Role::Curator)?;

    let (publishers, total) = state.repo.list_publishers(query.offset, query.limit()).await?;

    Ok(Json(PublisherListResponse {
        items: publishers.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Get a publisher by ID
pub async fn get_publisher(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<PublisherResponse>> {
    auth.require_role(Role::Curator)?;

    let publisher = state
        .repo
        .find_publisher_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "publisher".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(publisher.into()))
}

/// Create a publisher; enrichment runs before the insert
pub async fn create_publisher(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<PublisherPayload>,
) -> Result<(StatusCode, Json<PublisherResponse>)> {
    auth.require_role(Role::Curator)?;

    payload.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let record = enriched_record(&state, payload).await?;
    let publisher = state.repo.create_publisher(record).await?;

    tracing::info!(
        publisher_id = publisher.publisher_id,
        subject = %auth.subject,
        "Publisher created"
    );

    Ok((StatusCode::CREATED, Json(publisher.into())))
}

/// Update a publisher; the save path always refreshes derived fields
pub async fn update_publisher(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    Json(payload): Json<PublisherPayload>,
) -> Result<Json<PublisherResponse>> {
    auth.require_role(Role::Curator)?;

    payload.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    state
        .repo
        .find_publisher_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "publisher".to_string(),
            id: id.to_string(),
        })?;

    let record = enriched_record(&state, payload).await?;
    let publisher = state.repo.update_publisher(id, record).await?;

    tracing::info!(
        publisher_id = id,
        subject = %auth.subject,
        "Publisher updated"
    );

    Ok(Json(publisher.into()))
}
