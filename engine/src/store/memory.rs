use super::{ConfigStore, Namespace};
use crate::common::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

type Entries = HashMap<(Namespace, String), Value>;

/// In-process [`ConfigStore`].
///
/// Cloning shares the underlying data. Failures and latency can be injected
/// per namespace, which lets callers exercise the engine's error paths
/// without a real backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Entries>>,
    failing: Arc<RwLock<HashSet<Namespace>>>,
    latency: Arc<RwLock<HashMap<Namespace, Duration>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value without going through the async trait.
    pub async fn seed(&self, namespace: Namespace, key: &str, value: Value) {
        let mut entries = self.entries.write().await;
        entries.insert((namespace, key.to_string()), value);
    }

    /// Returns a copy of the value under `key`, ignoring injected failures.
    pub async fn peek(&self, namespace: Namespace, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        entries.get(&(namespace, key.to_string())).cloned()
    }

    /// Makes every operation on `namespace` fail with a transport error.
    pub async fn fail_namespace(&self, namespace: Namespace) {
        self.failing.write().await.insert(namespace);
    }

    pub async fn heal_namespace(&self, namespace: Namespace) {
        self.failing.write().await.remove(&namespace);
    }

    /// Delays every operation on `namespace` by `delay`.
    pub async fn set_latency(&self, namespace: Namespace, delay: Duration) {
        self.latency.write().await.insert(namespace, delay);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    async fn before_operation(&self, namespace: Namespace) -> Result<(), StoreError> {
        let delay = self.latency.read().await.get(&namespace).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().await.contains(&namespace) {
            return Err(StoreError::transport(
                namespace,
                "namespace is unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, namespace: Namespace, key: &str) -> Result<Value, StoreError> {
        self.before_operation(namespace).await?;
        let entries = self.entries.read().await;
        entries
            .get(&(namespace, key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(namespace, key))
    }

    async fn set(&self, namespace: Namespace, key: &str, value: Value) -> Result<(), StoreError> {
        self.before_operation(namespace).await?;
        let mut entries = self.entries.write().await;
        entries.insert((namespace, key.to_string()), value);
        Ok(())
    }

    async fn delete(&self, namespace: Namespace, key: &str) -> Result<(), StoreError> {
        self.before_operation(namespace).await?;
        let mut entries = self.entries.write().await;
        entries.remove(&(namespace, key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get(Namespace::User, "missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            store.get_optional(Namespace::User, "missing").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = MemoryStore::new();
        store.set(Namespace::App, "k", json!(1)).await.unwrap();

        assert_eq!(store.get(Namespace::App, "k").await.unwrap(), json!(1));
        assert!(store.get(Namespace::User, "k").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_absent_key_succeeds() {
        let store = MemoryStore::new();
        assert!(store.delete(Namespace::User, "nothing").await.is_ok());
    }

    #[tokio::test]
    async fn test_injected_failure_is_transport_error() {
        let store = MemoryStore::new();
        store.seed(Namespace::Shared, "k", json!("v")).await;
        store.fail_namespace(Namespace::Shared).await;

        let err = store.get(Namespace::Shared, "k").await.unwrap_err();
        assert!(matches!(err, StoreError::Transport { .. }));
        assert!(store.get_optional(Namespace::Shared, "k").await.is_err());

        store.heal_namespace(Namespace::Shared).await;
        assert_eq!(store.get(Namespace::Shared, "k").await.unwrap(), json!("v"));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        other.seed(Namespace::User, "k", json!(true)).await;
        assert_eq!(store.peek(Namespace::User, "k").await, Some(json!(true)));
    }
}
