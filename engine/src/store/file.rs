use super::{ConfigStore, Namespace};
use crate::common::{ErrorContext, StoreError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// [`ConfigStore`] backed by one JSON object file per namespace.
///
/// ```text
/// <root>/
/// ├── user.json
/// ├── app.json
/// └── shared.json
/// ```
///
/// A missing file behaves like an empty namespace. Writes are serialized
/// within the process and rewrite the whole namespace document.
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn namespace_path(&self, namespace: Namespace) -> PathBuf {
        self.root.join(format!("{}.json", namespace.as_str()))
    }

    async fn read_document(&self, namespace: Namespace) -> Result<Map<String, Value>, StoreError> {
        let path = self.namespace_path(namespace);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(StoreError::transport(
                    namespace,
                    format!("reading {}: {e}", path.display()),
                ));
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => Err(StoreError::Serialization {
                key: path.display().to_string(),
                reason: "namespace document is not a JSON object".to_string(),
            }),
            Err(e) => Err(StoreError::Serialization {
                key: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn write_document(
        &self,
        namespace: Namespace,
        document: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let path = self.namespace_path(namespace);
        let content = serde_json::to_string_pretty(&Value::Object(document)).map_err(|e| {
            StoreError::Serialization {
                key: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating {}", self.root.display()))
            .map_err(|reason| StoreError::transport(namespace, reason))?;

        // Write to a sibling file first so readers never see a half-written document.
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, content)
            .await
            .with_context(|| format!("writing {}", staging.display()))
            .map_err(|reason| StoreError::transport(namespace, reason))?;
        tokio::fs::rename(&staging, &path)
            .await
            .with_context(|| format!("replacing {}", path.display()))
            .map_err(|reason| StoreError::transport(namespace, reason))
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn get(&self, namespace: Namespace, key: &str) -> Result<Value, StoreError> {
        let mut document = self.read_document(namespace).await?;
        document
            .remove(key)
            .ok_or_else(|| StoreError::not_found(namespace, key))
    }

    async fn set(&self, namespace: Namespace, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document(namespace).await?;
        document.insert(key.to_string(), value);
        self.write_document(namespace, document).await?;
        log::debug!("Stored {namespace}/{key}");
        Ok(())
    }

    async fn delete(&self, namespace: Namespace, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document(namespace).await?;
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(namespace, document).await?;
        log::debug!("Deleted {namespace}/{key}");
        Ok(())
    }
}
