//! Content store trait and the Postgres implementation.
//!
//! Rows are dynamic `serde_json` maps rather than typed structs: every table
//! shares the same CRUD shape and the field schema on [`EntityTable`] is the
//! validation authority. SQL is built at runtime from that schema, so only
//! allow-listed identifiers ever reach a statement.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::{PgPool, Row};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::config;
use crate::content::table::{EntityTable, FieldDef, FieldKind};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("backend returned {status}: {message}")]
    Remote { status: u16, message: String },
}

/// The backend collaborator the editing core and handlers persist through.
///
/// `update_by_id` stamps `updated_at` itself; callers never supply it.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn select_all(&self, table: EntityTable) -> Result<Vec<Map<String, Value>>, StoreError>;

    async fn update_by_id(
        &self,
        table: EntityTable,
        id: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>, StoreError>;

    async fn insert(
        &self,
        table: EntityTable,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>, StoreError>;

    async fn delete_by_id(&self, table: EntityTable, id: Uuid) -> Result<(), StoreError>;
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Lazily connected process-wide pool. A failed connection is not cached, so
/// a recovered database is picked up on the next request.
pub async fn shared_pool() -> Result<&'static PgPool, StoreError> {
    POOL.get_or_try_init(|| async {
        let db = &config::config().database;

        PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
            .connect(&db.url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    })
    .await
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn from_env() -> Result<Self, StoreError> {
        Ok(Self::new(shared_pool().await?.clone()))
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn select_all(&self, table: EntityTable) -> Result<Vec<Map<String, Value>>, StoreError> {
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM (SELECT * FROM \"{}\" ORDER BY \"sort_order\", \"created_at\") t",
            table.as_str()
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let v: Value = row.try_get("row")?;
            match v {
                Value::Object(map) => results.push(map),
                other => {
                    return Err(StoreError::Query(format!(
                        "unexpected row shape from {}: {}",
                        table, other
                    )))
                }
            }
        }

        Ok(results)
    }

    async fn update_by_id(
        &self,
        table: EntityTable,
        id: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>, StoreError> {
        let entries = validate_fields(table, fields)?;
        if entries.is_empty() {
            return Err(StoreError::Validation(
                "update requires at least one field".to_string(),
            ));
        }

        let assignments: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(i, (def, _))| format!("\"{}\" = ${}", def.name, i + 1))
            .collect();

        let sql = format!(
            "UPDATE \"{table}\" SET {sets}, \"updated_at\" = now() WHERE \"id\" = ${id_pos} RETURNING row_to_json(\"{table}\") AS row",
            table = table.as_str(),
            sets = assignments.join(", "),
            id_pos = entries.len() + 1,
        );

        let mut query = sqlx::query(&sql);
        for (def, value) in &entries {
            query = bind_field(query, def, value);
        }
        query = query.bind(id);

        let row = query.fetch_optional(&self.pool).await?.ok_or_else(|| {
            StoreError::NotFound(format!("record {} not found in {}", id, table))
        })?;

        row_as_object(row.try_get("row")?, table)
    }

    async fn insert(
        &self,
        table: EntityTable,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>, StoreError> {
        let entries = validate_fields(table, fields)?;
        if entries.is_empty() {
            return Err(StoreError::Validation(
                "insert requires at least one field".to_string(),
            ));
        }

        let columns: Vec<String> = entries
            .iter()
            .map(|(def, _)| format!("\"{}\"", def.name))
            .collect();
        let placeholders: Vec<String> = (1..=entries.len()).map(|i| format!("${}", i)).collect();

        let sql = format!(
            "INSERT INTO \"{table}\" ({cols}) VALUES ({vals}) RETURNING row_to_json(\"{table}\") AS row",
            table = table.as_str(),
            cols = columns.join(", "),
            vals = placeholders.join(", "),
        );

        let mut query = sqlx::query(&sql);
        for (def, value) in &entries {
            query = bind_field(query, def, value);
        }

        let row = query.fetch_one(&self.pool).await?;
        row_as_object(row.try_get("row")?, table)
    }

    async fn delete_by_id(&self, table: EntityTable, id: Uuid) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE \"id\" = $1", table.as_str());

        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "record {} not found in {}",
                id, table
            )));
        }

        Ok(())
    }
}

fn row_as_object(v: Value, table: EntityTable) -> Result<Map<String, Value>, StoreError> {
    match v {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Query(format!(
            "unexpected row shape from {}: {}",
            table, other
        ))),
    }
}

/// Check a field payload against the table schema. Returns the validated
/// (definition, value) pairs in payload order.
pub fn validate_fields<'a>(
    table: EntityTable,
    fields: &'a Map<String, Value>,
) -> Result<Vec<(&'static FieldDef, &'a Value)>, StoreError> {
    let mut entries = Vec::with_capacity(fields.len());

    for (name, value) in fields {
        if EntityTable::is_system_field(name) {
            return Err(StoreError::Validation(format!(
                "system field '{}' cannot be set via API",
                name
            )));
        }

        let def = table.field(name).ok_or_else(|| {
            StoreError::Validation(format!("unknown field '{}' for table {}", name, table))
        })?;

        if value.is_null() {
            if !def.nullable {
                return Err(StoreError::Validation(format!(
                    "field '{}' may not be null",
                    name
                )));
            }
            entries.push((def, value));
            continue;
        }

        let matches = match def.kind {
            FieldKind::Text => value.is_string(),
            FieldKind::TextList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            FieldKind::Integer => value.as_i64().is_some(),
            FieldKind::Json => true,
        };

        if !matches {
            return Err(StoreError::Validation(format!(
                "field '{}' has the wrong type for table {}",
                name, table
            )));
        }

        entries.push((def, value));
    }

    Ok(entries)
}

fn bind_field<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    def: &FieldDef,
    value: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    if value.is_null() {
        return match def.kind {
            FieldKind::Text => query.bind(Option::<String>::None),
            FieldKind::TextList => query.bind(Option::<Vec<String>>::None),
            FieldKind::Integer => query.bind(Option::<i64>::None),
            FieldKind::Json => query.bind(Option::<Value>::None),
        };
    }

    match def.kind {
        FieldKind::Text => query.bind(value.as_str().map(str::to_owned)),
        FieldKind::TextList => {
            let items: Vec<String> = value
                .as_array()
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str().map(str::to_owned))
                        .collect()
                })
                .unwrap_or_default();
            query.bind(items)
        }
        FieldKind::Integer => query.bind(value.as_i64()),
        FieldKind::Json => query.bind(value.clone()),
    }
}
