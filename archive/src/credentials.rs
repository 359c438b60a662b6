//! Per-user AI api key storage.
//!
//! The demo keeps keys in process memory, the live deployment in the
//! `user_api_keys` table. Callers only see `get`/`put`; the storage
//! medium never leaks into page logic.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::adapter::BackendError;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<String>, BackendError>;
    async fn put(&self, user_id: &str, api_key: &str) -> Result<(), BackendError>;
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    keys: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, BackendError> {
        Ok(self.keys.read().expect("credential map poisoned").get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, api_key: &str) -> Result<(), BackendError> {
        self.keys
            .write()
            .expect("credential map poisoned")
            .insert(user_id.to_string(), api_key.to_string());
        Ok(())
    }
}

/// Server-side storage in the `user_api_keys` table, written with the
/// service credential so row-level policies stay closed to end users.
pub struct RemoteCredentialStore {
    base_url: String,
    service_key: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiKeyRow {
    api_key: String,
}

impl RemoteCredentialStore {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: service_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/user_api_keys",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CredentialStore for RemoteCredentialStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, BackendError> {
        let filter = format!("eq.{user_id}");
        let response = self
            .client
            .get(self.endpoint())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(&[
                ("select", "api_key"),
                ("user_id", filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Rejected {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let mut rows: Vec<ApiKeyRow> = response.json().await?;
        Ok(rows.pop().map(|row| row.api_key))
    }

    async fn put(&self, user_id: &str, api_key: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("apikey", &self.service_key)
            .header("Prefer", "resolution=merge-duplicates")
            .bearer_auth(&self.service_key)
            .json(&json!({ "user_id": user_id, "api_key": api_key }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Rejected {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialStore, MemoryCredentialStore};

    #[tokio::test]
    async fn memory_store_round_trips_per_user() {
        let store = MemoryCredentialStore::default();

        assert_eq!(store.get("mock-user-1").await.unwrap(), None);

        store.put("mock-user-1", "sk-demo").await.unwrap();
        assert_eq!(
            store.get("mock-user-1").await.unwrap().as_deref(),
            Some("sk-demo")
        );
        assert_eq!(store.get("someone-else").await.unwrap(), None);
    }
}
