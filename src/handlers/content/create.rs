use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use super::parse_table;
use crate::content::store::{ContentStore, PgStore};
use crate::error::ApiError;
use crate::middleware::auth::require_admin;

/// POST /content/:table - Create one entity from the body fields
pub async fn create(
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let table = parse_table(&table)?;
    let user = require_admin(&headers)?;

    let fields = payload
        .as_object()
        .ok_or_else(|| ApiError::bad_request("expected a JSON object body"))?;

    let store = PgStore::from_env().await?;
    let row = store.insert(table, fields).await?;

    tracing::info!("{} created a row in {}", user.email, table);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": row })),
    ))
}
