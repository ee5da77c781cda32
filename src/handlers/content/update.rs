use axum::extract::Path;
use axum::http::HeaderMap;
use axum::response::Json;
use serde_json::{json, Map, Value};

use super::{parse_id, parse_table};
use crate::content::store::{ContentStore, PgStore};
use crate::error::ApiError;
use crate::middleware::auth::require_admin;

/// PATCH /content/:table - Update one entity's fields
///
/// Body is `{ "id": "...", ...fields }`. The store stamps `updated_at`.
pub async fn update(
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let table = parse_table(&table)?;
    let user = require_admin(&headers)?;

    let body = payload
        .as_object()
        .ok_or_else(|| ApiError::bad_request("expected a JSON object body"))?;

    let id = body
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::validation_error("ID is required", None))?;
    let id = parse_id(id)?;

    let fields: Map<String, Value> = body
        .iter()
        .filter(|(name, _)| name.as_str() != "id")
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    if fields.is_empty() {
        return Err(ApiError::validation_error(
            "update requires at least one field",
            None,
        ));
    }

    let store = PgStore::from_env().await?;
    let row = store.update_by_id(table, id, &fields).await?;

    tracing::info!("{} updated {}/{}", user.email, table, id);

    Ok(Json(json!({ "success": true, "data": row })))
}
