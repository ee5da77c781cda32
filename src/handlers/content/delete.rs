use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_id, parse_table};
use crate::content::store::{ContentStore, PgStore};
use crate::error::ApiError;
use crate::middleware::auth::require_admin;

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// DELETE /content/:table?id=... - Delete one entity by id
pub async fn delete(
    Path(table): Path<String>,
    Query(query): Query<DeleteQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let table = parse_table(&table)?;
    let user = require_admin(&headers)?;

    let id = query
        .id
        .as_deref()
        .ok_or_else(|| ApiError::validation_error("ID is required", None))?;
    let id = parse_id(id)?;

    let store = PgStore::from_env().await?;
    store.delete_by_id(table, id).await?;

    tracing::info!("{} deleted {}/{}", user.email, table, id);

    Ok(Json(json!({ "success": true })))
}
