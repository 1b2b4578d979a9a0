//! Journal handlers
//!
//! Pricing normalization runs on every save; shape validation blocks the
//! save when the pricing list is malformed.

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
    db::models::Journal,
    db::JournalRecord,
    errors::{AppError, Result},
    metrics,
};
use backoffice_curation::pricing;

#[derive(Debug, Deserialize, Validate)]
pub struct JournalPayload {
    #[validate(length(min = 1, max = 500))]
    pub display_name: String,

    pub publisher_id: Option<i64>,

    /// JSON list of ISSN strings
    pub issns: Option<serde_json::Value>,

    pub webpage: Option<String>,

    /// Ordered `{price, currency}` list, minor units
    pub apc_prices: Option<serde_json::Value>,

    #[serde(default)]
    pub is_oa: bool,

    #[serde(default)]
    pub is_in_doaj: bool,

    pub journal_type: Option<String>,

    pub wikidata_id: Option<String>,
}

#[derive(Serialize)]
pub struct JournalResponse {
    pub journal_id: i64,
    pub display_name: String,
    pub publisher_id: Option<i64>,
    pub issns: Option<serde_json::Value>,
    pub webpage: Option<String>,
    pub apc_prices: Option<serde_json::Value>,
    /// Derived on every save
    pub apc_usd: Option<i64>,
    pub is_oa: bool,
    pub is_in_doaj: bool,
    pub journal_type: Option<String>,
    pub wikidata_id: Option<String>,
    pub paper_count: Option<i64>,
    pub created_date: String,
    pub updated_date: String,
}

impl From<Journal> for JournalResponse {
    fn from(journal: Journal) -> Self {
        Self {
            journal_id: journal.journal_id,
            display_name: journal.display_name,
            publisher_id: journal.publisher_id,
            issns: journal.issns,
            webpage: journal.webpage,
            apc_prices: journal.apc_prices,
            apc_usd: journal.apc_usd,
            is_oa: journal.is_oa,
            is_in_doaj: journal.is_in_doaj,
            journal_type: journal.journal_type,
            wikidata_id: journal.wikidata_id,
            paper_count: journal.paper_count,
            created_date: journal.created_date.to_rfc3339(),
            updated_date: journal.updated_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct JournalListResponse {
    pub items: Vec<JournalResponse>,
    pub total: u64,
}

/// Normalize then validate the pricing list, assembling the record.
/// Normalization is unconditional; validation gates persistence.
fn normalized_record(payload: JournalPayload) -> Result<JournalRecord> {
    let apc_usd = pricing::normalize_usd(payload.apc_prices.as_ref());
    pricing::validate_apc_prices(payload.apc_prices.as_ref())?;

    metrics::record_normalization(apc_usd.is_some());

    Ok(JournalRecord {
        display_name: payload.display_name,
        publisher_id: payload.publisher_id,
        issns: payload.issns,
        webpage: payload.webpage,
        apc_prices: payload.apc_prices,
        apc_usd,
        is_oa: payload.is_oa,
        is_in_doaj: payload.is_in_doaj,
        journal_type: payload.journal_type,
        wikidata_id: payload.wikidata_id,
    })
}

/// List journals
pub async fn list_journals(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<JournalListResponse>> {
    auth.require_role(Role::Curator)?;

    let (journals, total) = state.repo.list_journals(query.offset, query.limit()).await?;

    Ok(Json(JournalListResponse {
        items: journals.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Get a journal by ID, with the paper count refreshed from the warehouse
pub async fn get_journal(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<JournalResponse>> {
    auth.require_role(Role::Curator)?;

    let journal = state
        .repo
        .find_journal_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "journal".to_string(),
            id: id.to_string(),
        })?;

    // Warehouse is best-effort; fall back to the stored count
    let paper_count = match state.repo.warehouse_paper_count(id).await {
        Ok(count) => count.or(journal.paper_count),
        Err(e) => {
            tracing::warn!(journal_id = id, error = %e, "Warehouse paper count unavailable");
            journal.paper_count
        }
    };

    let mut response = JournalResponse::from(journal);
    response.paper_count = paper_count;
    Ok(Json(response))
}

/// Create a journal; pricing is normalized and validated first
pub async fn create_journal(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<JournalPayload>,
) -> Result<(StatusCode, Json<JournalResponse>)> {
    auth.require_role(Role::Curator)?;

    payload.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let record = normalized_record(payload)?;
    let journal = state.repo.create_journal(record).await?;

    tracing::info!(
        journal_id = journal.journal_id,
        subject = %auth.subject,
        "Journal created"
    );

    Ok((StatusCode::CREATED, Json(journal.into())))
}

/// Update a journal; malformed pricing blocks the save
pub async fn update_journal(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    Json(payload): Json<JournalPayload>,
) -> Result<Json<JournalResponse>> {
    auth.require_role(Role::Curator)?;

    payload.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    state
        .repo
        .find_journal_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "journal".to_string(),
            id: id.to_string(),
        })?;

    let record = normalized_record(payload)?;
    let journal = state.repo.update_journal(id, record).await?;

    tracing::info!(
        journal_id = id,
        subject = %auth.subject,
        "Journal updated"
    );

    Ok(Json(journal.into()))
}
