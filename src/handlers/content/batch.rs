use std::collections::HashMap;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{parse_id, parse_table};
use crate::content::store::{ContentStore, PgStore};
use crate::content::table::EntityTable;
use crate::error::ApiError;
use crate::middleware::auth::require_admin;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchChange {
    pub table: String,
    pub id: String,
    pub field: String,
    pub new_value: Value,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub changes: Vec<BatchChange>,
}

/// POST /content/batch - Persist a pending-change set in one request.
///
/// Every change is validated before any store call; grouped per-entity
/// updates then run concurrently. All-success is 200, a partial failure is
/// 207 with a per-entity result list.
pub async fn batch(
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_admin(&headers)?;

    let request: BatchRequest = serde_json::from_value(payload)
        .map_err(|_| ApiError::validation_error("changes array is required", None))?;

    // Group by (table, id): one outbound update per entity no matter how
    // many of its fields changed.
    let mut grouped: HashMap<(EntityTable, Uuid), Map<String, Value>> = HashMap::new();
    for change in &request.changes {
        let table = parse_table(&change.table)?;
        let id = parse_id(&change.id)?;

        grouped
            .entry((table, id))
            .or_default()
            .insert(change.field.clone(), change.new_value.clone());
    }

    // Nothing pending is a clean success; don't touch the store at all
    if grouped.is_empty() {
        return Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "results": [] })),
        ));
    }

    let store = PgStore::from_env().await?;

    let pending = grouped.into_iter().map(|((table, id), fields)| {
        let store = &store;
        async move {
            let result = store.update_by_id(table, id, &fields).await;
            (table, id, result)
        }
    });

    let outcomes = futures::future::join_all(pending).await;

    let mut failures = 0usize;
    let results: Vec<Value> = outcomes
        .into_iter()
        .map(|(table, id, result)| match result {
            Ok(_) => json!({ "key": format!("{}:{}", table, id), "success": true }),
            Err(e) => {
                failures += 1;
                tracing::warn!("batch update failed for {}/{}: {}", table, id, e);
                json!({
                    "key": format!("{}:{}", table, id),
                    "success": false,
                    "error": e.to_string()
                })
            }
        })
        .collect();

    tracing::info!(
        "{} batch-saved {} entities ({} failed)",
        user.email,
        results.len(),
        failures
    );

    if failures > 0 {
        return Ok((
            StatusCode::MULTI_STATUS,
            Json(json!({
                "success": false,
                "results": results,
                "error": format!("{} update(s) failed", failures)
            })),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "results": results })),
    ))
}
