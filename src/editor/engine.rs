//! Batch persistence engine.
//!
//! Coalesces the pending-change set into one update per `(table, id)` pair
//! and issues all entity updates concurrently. Ordering between distinct
//! entities is unspecified; within one entity, coalescing happens before any
//! network call so two edits to the same entity can never race.

use std::collections::HashMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::content::store::ContentStore;
use crate::content::table::EntityTable;
use crate::editor::tracker::ChangeSet;

/// One coalesced outbound update: every changed field of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityUpdate {
    pub table: EntityTable,
    pub id: Uuid,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub attempted: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Group a pending set by `(table, id)`, one update per distinct pair
pub fn group_changes(changes: &ChangeSet) -> Vec<EntityUpdate> {
    let mut grouped: HashMap<(EntityTable, Uuid), Map<String, Value>> = HashMap::new();

    for (key, change) in changes.iter() {
        grouped
            .entry((key.table, key.id))
            .or_default()
            .insert(key.field.clone(), change.new_value.to_json());
    }

    grouped
        .into_iter()
        .map(|((table, id), fields)| EntityUpdate { table, id, fields })
        .collect()
}

/// Issue every grouped update concurrently and await all results. The store
/// stamps `updated_at` on each update; no field map carries it.
pub async fn persist_all(store: &dyn ContentStore, updates: Vec<EntityUpdate>) -> BatchReport {
    let attempted = updates.len();

    let pending = updates.into_iter().map(|update| async move {
        let result = store
            .update_by_id(update.table, update.id, &update.fields)
            .await;
        (update.table, update.id, result.map(|_| ()))
    });

    let results = futures::future::join_all(pending).await;

    let mut failed = 0;
    for (table, id, result) in &results {
        match result {
            Ok(()) => tracing::debug!("saved update for {}/{}", table, id),
            Err(e) => {
                failed += 1;
                tracing::warn!("update failed for {}/{}: {}", table, id, e);
            }
        }
    }

    BatchReport { attempted, failed }
}
