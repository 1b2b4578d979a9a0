//! Authorization context and JWT utilities
//!
//! Provides:
//! - Explicit `AuthContext` passed into every admin operation
//! - Role-membership predicates replacing framework permission checks
//! - JWT token generation and validation
//! - API key material generation

use crate::errors::{AppError, Result};
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff roles recognized by the back-office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to everything, including the privileged concept workflow
    Superuser,
    /// May manage API keys and rate-limit exemptions
    Sales,
    /// May edit publishers and journals, view concepts
    Curator,
}

/// Authorization context available to every operation
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated staff member (email)
    pub subject: String,

    /// Granted roles
    pub roles: Vec<Role>,

    /// Request ID for tracing
    pub request_id: String,
}

impl AuthContext {
    /// Check membership of a specific role; superusers hold every role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role) || self.roles.contains(&Role::Superuser)
    }

    /// The sales-module gate: sales staff or superusers
    pub fn can_manage_sales(&self) -> bool {
        self.has_role(Role::Sales)
    }

    /// Require a specific role, returning an error if not held
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: format!("Missing required role: {:?}", role),
            })
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (staff email)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Granted roles
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Generate a new JWT token for a staff member
    pub fn generate_token(&self, subject: &str, roles: Vec<Role>) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = JwtClaims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            roles,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal {
                message: format!("Failed to generate token: {}", e),
            })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken,
            })
    }
}

/// Generate a new API key string for a customer
pub fn generate_api_key() -> String {
    let random_bytes: [u8; 16] = rand::random();
    hex::encode(random_bytes)
}

/// Extract a bearer token from an Authorization header value
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Build the AuthContext from validated claims and the request id
pub fn context_from_claims(claims: JwtClaims, request_id: Option<String>) -> AuthContext {
    AuthContext {
        subject: claims.sub,
        roles: claims.roles,
        request_id: request_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
    }
}

/// Axum extractor pulling the AuthContext injected by the auth middleware
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing authorization context".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(roles: Vec<Role>) -> AuthContext {
        AuthContext {
            subject: "staff@example.com".to_string(),
            roles,
            request_id: "test".to_string(),
        }
    }

    #[test]
    fn test_superuser_holds_every_role() {
        let c = ctx(vec![Role::Superuser]);
        assert!(c.has_role(Role::Sales));
        assert!(c.has_role(Role::Curator));
        assert!(c.can_manage_sales());
    }

    #[test]
    fn test_sales_gate() {
        assert!(ctx(vec![Role::Sales]).can_manage_sales());
        assert!(!ctx(vec![Role::Curator]).can_manage_sales());
        assert!(ctx(vec![Role::Curator]).require_role(Role::Sales).is_err());
    }

    #[test]
    fn test_generate_api_key() {
        let key = generate_api_key();
        assert_eq!(key.len(), 32);
        assert_ne!(key, generate_api_key());
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer("abc123"), None);
        assert_eq!(extract_bearer("Basic abc"), None);
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test_secret", 3600);

        let roles = vec![Role::Sales, Role::Curator];
        let token = manager
            .generate_token("staff@example.com", roles.clone())
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "staff@example.com");
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let manager = JwtManager::new("test_secret", 3600);
        assert!(matches!(
            manager.validate_token("not-a-token"),
            Err(AppError::InvalidToken)
        ));
    }
}
