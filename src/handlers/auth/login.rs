use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::Row;
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config;
use crate::content::store::shared_pool;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - Verify credentials and mint a session token.
///
/// Having credentials does not grant admin authority; that comes from the
/// allow-list alone and is checked per mutation.
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::validation_error(
            "email and password are required",
            None,
        ));
    }

    let pool = shared_pool().await?;

    let row = sqlx::query(
        "SELECT id, email, password_sha256 FROM admin_users WHERE lower(email) = lower($1)",
    )
    .bind(request.email.trim())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Err(ApiError::unauthorized("invalid email or password"));
    };

    let stored_digest: String = row.try_get("password_sha256")?;
    if auth::sha256_hex(&request.password) != stored_digest {
        return Err(ApiError::unauthorized("invalid email or password"));
    }

    let user_id: Uuid = row.try_get("id")?;
    let email: String = row.try_get("email")?;

    let claims = Claims::new(email.clone(), user_id);
    let token = auth::generate_jwt(&claims)?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    tracing::info!("{} signed in", email);

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": { "id": user_id, "email": email },
            "expires_in": expires_in
        }
    })))
}
