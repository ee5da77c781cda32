//! Test support: an in-memory [`ContentStore`] with per-entity failure
//! injection, used by the editing-core tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::content::store::{ContentStore, StoreError};
use crate::content::table::EntityTable;

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<(EntityTable, Uuid), Map<String, Value>>>,
    failing: Mutex<HashSet<(EntityTable, Uuid)>>,
    update_calls: Mutex<Vec<(EntityTable, Uuid)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, table: EntityTable, id: Uuid, row: Value) {
        let map = row.as_object().expect("seed row must be an object").clone();
        self.rows.lock().unwrap().insert((table, id), map);
    }

    /// Make every update for this entity fail until `clear_failures`
    pub fn fail_updates_for(&self, table: EntityTable, id: Uuid) {
        self.failing.lock().unwrap().insert((table, id));
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn row(&self, table: EntityTable, id: Uuid) -> Option<Map<String, Value>> {
        self.rows.lock().unwrap().get(&(table, id)).cloned()
    }

    /// Every `(table, id)` an update was attempted against, in call order
    pub fn update_calls(&self) -> Vec<(EntityTable, Uuid)> {
        self.update_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn select_all(&self, table: EntityTable) -> Result<Vec<Map<String, Value>>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|((t, _), _)| *t == table)
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn update_by_id(
        &self,
        table: EntityTable,
        id: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>, StoreError> {
        self.update_calls.lock().unwrap().push((table, id));

        if self.failing.lock().unwrap().contains(&(table, id)) {
            return Err(StoreError::Query("injected update failure".to_string()));
        }

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&(table, id))
            .ok_or_else(|| StoreError::NotFound(format!("record {} not found in {}", id, table)))?;

        for (name, value) in fields {
            row.insert(name.clone(), value.clone());
        }
        row.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        Ok(row.clone())
    }

    async fn insert(
        &self,
        table: EntityTable,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>, StoreError> {
        let id = Uuid::new_v4();
        let mut row = fields.clone();
        row.insert("id".to_string(), Value::String(id.to_string()));
        row.insert(
            "created_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        row.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        self.rows.lock().unwrap().insert((table, id), row.clone());
        Ok(row)
    }

    async fn delete_by_id(&self, table: EntityTable, id: Uuid) -> Result<(), StoreError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&(table, id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("record {} not found in {}", id, table)))
    }
}
