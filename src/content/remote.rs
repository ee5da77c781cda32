//! HTTP-backed implementation of [`ContentStore`].
//!
//! Used when the editing core runs detached from the database and persists
//! through the `/content` API instead of a direct pool.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::content::store::{ContentStore, StoreError};
use crate::content::table::EntityTable;
use crate::editor::session::Identity;

pub struct RemoteStore {
    base_url: String,
    client: reqwest::Client,
    token: Option<String>,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// POST /auth/login. On success the bearer token is retained for
    /// subsequent content requests.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity, StoreError> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let body = check_status(response).await?;
        let data = &body["data"];

        let token = data["token"]
            .as_str()
            .ok_or_else(|| StoreError::Query("login response missing token".to_string()))?
            .to_string();
        let email = data["user"]["email"]
            .as_str()
            .ok_or_else(|| StoreError::Query("login response missing email".to_string()))?
            .to_string();
        let user_id = data["user"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| StoreError::Query("login response missing user id".to_string()))?;

        self.token = Some(token);
        Ok(Identity { user_id, email })
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send_for_row(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Map<String, Value>, StoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let body = check_status(response).await?;
        match body["data"].clone() {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Query(format!(
                "unexpected response payload: {}",
                other
            ))),
        }
    }
}

/// Map a non-success response onto the store error taxonomy.
async fn check_status(response: reqwest::Response) -> Result<Value, StoreError> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(body);
    }

    let message = body["error"]
        .as_str()
        .unwrap_or("request failed")
        .to_string();

    Err(map_status(status.as_u16(), message))
}

fn map_status(status: u16, message: String) -> StoreError {
    match status {
        404 => StoreError::NotFound(message),
        400 => StoreError::Validation(message),
        401 | 403 => StoreError::Remote { status, message },
        503 => StoreError::Connection(message),
        _ => StoreError::Query(format!("status {}: {}", status, message)),
    }
}

#[async_trait]
impl ContentStore for RemoteStore {
    async fn select_all(&self, table: EntityTable) -> Result<Vec<Map<String, Value>>, StoreError> {
        let url = format!("{}/content/{}", self.base_url, table);
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let body = check_status(response).await?;
        match body["data"].clone() {
            Value::Array(rows) => rows
                .into_iter()
                .map(|row| match row {
                    Value::Object(map) => Ok(map),
                    other => Err(StoreError::Query(format!("unexpected row: {}", other))),
                })
                .collect(),
            other => Err(StoreError::Query(format!(
                "unexpected response payload: {}",
                other
            ))),
        }
    }

    async fn update_by_id(
        &self,
        table: EntityTable,
        id: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>, StoreError> {
        let url = format!("{}/content/{}", self.base_url, table);

        let mut body = fields.clone();
        body.insert("id".to_string(), json!(id));

        self.send_for_row(self.request(reqwest::Method::PATCH, url).json(&body))
            .await
    }

    async fn insert(
        &self,
        table: EntityTable,
        fields: &Map<String, Value>,
    ) -> Result<Map<String, Value>, StoreError> {
        let url = format!("{}/content/{}", self.base_url, table);
        self.send_for_row(self.request(reqwest::Method::POST, url).json(fields))
            .await
    }

    async fn delete_by_id(&self, table: EntityTable, id: Uuid) -> Result<(), StoreError> {
        let url = format!("{}/content/{}?id={}", self.base_url, table, id);
        let response = self
            .request(reqwest::Method::DELETE, url)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_error_taxonomy() {
        assert!(matches!(
            map_status(404, "missing".into()),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            map_status(400, "bad".into()),
            StoreError::Validation(_)
        ));
        assert!(matches!(
            map_status(401, "no".into()),
            StoreError::Remote { status: 401, .. }
        ));
        assert!(matches!(
            map_status(403, "no".into()),
            StoreError::Remote { status: 403, .. }
        ));
        assert!(matches!(
            map_status(503, "down".into()),
            StoreError::Connection(_)
        ));
        assert!(matches!(
            map_status(500, "boom".into()),
            StoreError::Query(_)
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = RemoteStore::new("http://localhost:3000/");
        assert_eq!(store.base_url, "http://localhost:3000");
    }
}
