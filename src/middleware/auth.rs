use axum::http::HeaderMap;
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated user context extracted from a JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            user_id: claims.user_id,
        }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        auth::is_admin(&self.email)
    }
}

/// Authenticate the request from its Authorization header.
///
/// Handlers call this directly rather than through a router layer because the
/// content routes must reject an unknown table (400) before touching auth.
pub fn authenticate(headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = extract_jwt_from_headers(headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token).map_err(ApiError::unauthorized)?;
    Ok(AuthUser::from(claims))
}

/// Authenticate and require allow-list membership. Failing authentication
/// yields 401; an authenticated identity off the allow-list yields 403.
pub fn require_admin(headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let user = authenticate(headers)?;

    if !user.is_admin() {
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(user)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
