//! In-memory pending-change set.
//!
//! One entry per `(table, id, field)`; later edits overwrite the new value
//! but keep the first-seen original, and an edit back to the original removes
//! the entry entirely so the set only ever holds real diffs. Translatable
//! fields carry their language suffix (`title_en` vs `title_da`) in the field
//! name, so edits in different languages never collide.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::content::table::EntityTable;

/// A field's value: scalar text or an ordered string list. Lists are tracked
/// as whole-value replacements, never per-element diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Fully qualified identity of one tracked field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeKey {
    pub table: EntityTable,
    pub id: Uuid,
    pub field: String,
}

impl std::fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.table, self.id, self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChange {
    pub table: EntityTable,
    pub id: Uuid,
    pub field: String,
    pub original_value: FieldValue,
    pub new_value: FieldValue,
}

/// The pending-change set owned by one editing session
#[derive(Debug, Default)]
pub struct ChangeSet {
    entries: HashMap<ChangeKey, PendingChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit. The first call per key establishes the original value
    /// (from `original`, or from `new_value` itself when the caller omits
    /// it); later calls keep that stored original. When the new value equals
    /// the resolved original the entry collapses to nothing.
    pub fn track(
        &mut self,
        table: EntityTable,
        id: Uuid,
        field: impl Into<String>,
        new_value: FieldValue,
        original: Option<FieldValue>,
    ) {
        let key = ChangeKey {
            table,
            id,
            field: field.into(),
        };

        let original_value = match self.entries.get(&key) {
            Some(existing) => existing.original_value.clone(),
            None => original.unwrap_or_else(|| new_value.clone()),
        };

        if new_value == original_value {
            self.entries.remove(&key);
            return;
        }

        self.entries.insert(
            key.clone(),
            PendingChange {
                table,
                id,
                field: key.field,
                original_value,
                new_value,
            },
        );
    }

    pub fn get(&self, key: &ChangeKey) -> Option<&PendingChange> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &ChangeKey) -> Option<PendingChange> {
        self.entries.remove(key)
    }

    /// Drop every pending change unconditionally
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChangeKey, &PendingChange)> {
        self.entries.iter()
    }
}
