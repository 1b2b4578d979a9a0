//! Bearer-token authentication middleware
//!
//! Validates the JWT and injects the `AuthContext` extension that every
//! handler extracts. Role checks happen in the handlers themselves.

use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use backoffice_common::auth::{context_from_claims, extract_bearer};
use backoffice_common::errors::AppError;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing Authorization header".to_string(),
        })?;

    let token = extract_bearer(auth_header).ok_or_else(|| AppError::Unauthorized {
        message: "Authorization header is not a bearer token".to_string(),
    })?;

    let claims = state.jwt.validate_token(token)?;
    let context = context_from_claims(claims, request_id);

    tracing::debug!(subject = %context.subject, request_id = %context.request_id, "Authenticated");

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
