use axum::http::HeaderMap;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::auth::authenticate;

/// DELETE /auth/session - Stateless logout acknowledgement.
///
/// Tokens are not server-tracked; the client discards its copy. The edit
/// session object resets itself on sign-out.
pub async fn logout(headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&headers)?;

    tracing::info!("{} signed out", user.email);

    Ok(Json(json!({ "success": true })))
}
