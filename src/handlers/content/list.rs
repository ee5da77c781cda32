use axum::extract::Path;
use axum::response::Json;
use serde_json::{json, Value};

use super::parse_table;
use crate::content::store::{ContentStore, PgStore};
use crate::error::ApiError;

/// GET /content/:table - All rows, ordered by sort_order.
///
/// Reads are public; this is the page loader's data source.
pub async fn list(Path(table): Path<String>) -> Result<Json<Value>, ApiError> {
    let table = parse_table(&table)?;

    let store = PgStore::from_env().await?;
    let rows = store.select_all(table).await?;

    Ok(Json(json!({ "success": true, "data": rows })))
}
