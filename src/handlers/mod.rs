pub mod auth;
pub mod content;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Folio API",
            "version": version,
            "description": "Bilingual portfolio backend with inline content editing",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "POST /auth/login, GET /auth/whoami, DELETE /auth/session",
                "content": "GET|PATCH|POST|DELETE /content/:table (reads public, writes admin-only)",
                "batch": "POST /content/batch (admin-only)",
            }
        }
    }))
}

pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    let probe = match crate::content::store::shared_pool().await {
        Ok(pool) => sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match probe {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e
                }
            })),
        ),
    }
}
