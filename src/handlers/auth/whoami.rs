use axum::http::HeaderMap;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::auth::authenticate;

/// GET /auth/whoami - Current identity and admin flag
pub async fn whoami(headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let user = authenticate(&headers)?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "id": user.user_id,
            "email": user.email,
            "is_admin": user.is_admin()
        }
    })))
}
