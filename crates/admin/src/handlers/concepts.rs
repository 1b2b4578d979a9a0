//! Concept handlers
//!
//! Concepts are read-mostly reference data. Edits go through the
//! privileged superuser workflow; there is no delete operation.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::handlers::ListQuery;
use crate::AppState;
use backoffice_common::{
    auth::{AuthContext, Role},
    db::models::Concept,
    errors::{AppError, Result},
};

#[derive(Serialize)]
pub struct ConceptResponse {
    pub field_of_study_id: i64,
    pub display_name: String,
    pub level: i32,
    pub wikidata_id: Option<String>,
    pub wikipedia_id: Option<String>,
    /// Lazily parsed from the cached Wikipedia JSON; may be absent
    pub description: Option<String>,
    pub created_date: String,
    pub updated_date: String,
}

impl From<Concept> for ConceptResponse {
    fn from(concept: Concept) -> Self {
        let description = concept.description();
        Self {
            field_of_study_id: concept.field_of_study_id,
            display_name: concept.display_name,
            level: concept.level,
            wikidata_id: concept.wikidata_id,
            wikipedia_id: concept.wikipedia_id,
            description,
            created_date: concept.created_date.to_rfc3339(),
            updated_date: concept.updated_date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ConceptListResponse {
    pub items: Vec<ConceptResponse>,
    pub total: u64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConceptRequest {
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,

    #[validate(range(min = 0, max = 5))]
    pub level: i32,
}

/// List concepts
pub async fn list_concepts(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<ConceptListResponse>> {
    auth.require_role(Role::Curator)?;

    let (concepts, total) = state
        .repo
        .list_concepts(query.offset, query.limit(), query.q.as_deref())
        .await?;

    Ok(Json(ConceptListResponse {
        items: concepts.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Get a concept by ID
pub async fn get_concept(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<ConceptResponse>> {
    auth.require_role(Role::Curator)?;

    let concept = state
        .repo
        .find_concept_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "concept".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(concept.into()))
}

/// Privileged concept edit: superusers only
pub async fn update_concept(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    Json(request): Json<UpdateConceptRequest>,
) -> Result<Json<ConceptResponse>> {
    auth.require_role(Role::Superuser)?;

    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    state
        .repo
        .find_concept_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            resource_type: "concept".to_string(),
            id: id.to_string(),
        })?;

    let updated = state
        .repo
        .update_concept(id, request.display_name, request.level)
        .await?;

    tracing::info!(
        concept_id = id,
        subject = %auth.subject,
        "Concept updated via privileged workflow"
    );

    Ok(Json(updated.into()))
}
