//! # Configuration Store Boundary
//!
//! The engine reads palettes, element mappings and theme references from a
//! namespaced key/value store owned by another system. This module defines
//! that contract ([`ConfigStore`]), the three namespaces ([`Namespace`]), the
//! keys the engine uses ([`keys`]), and two adapters:
//!
//! - [`MemoryStore`] - In-process store for embedding and tests
//! - [`FileStore`] - One JSON document per namespace on disk

pub mod file;
pub mod keys;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::common::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Configuration tier, listed from highest to lowest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Personal overrides of the signed-in user
    User,
    /// Tenant-wide defaults set by an administrator
    App,
    /// Catalog shared across tenants
    Shared,
}

impl Namespace {
    /// Auto-detection order: `user` beats `app`, which beats `shared`.
    pub const PRIORITY: [Namespace; 3] = [Namespace::User, Namespace::App, Namespace::Shared];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::User => "user",
            Namespace::App => "app",
            Namespace::Shared => "shared",
        }
    }

    /// Key holding the `{ paletteId: Palette }` collection in this namespace.
    pub fn palettes_key(&self) -> &'static str {
        match self {
            Namespace::User | Namespace::App => keys::CUSTOM_COLOR_PALETTES,
            Namespace::Shared => keys::SHARED_CUSTOM_THEMES,
        }
    }

    /// Key holding the `{ paletteId: ElementMapping }` collection in this namespace.
    pub fn mappings_key(&self) -> &'static str {
        match self {
            Namespace::User | Namespace::App => keys::ELEMENT_COLOR_MAPPING,
            Namespace::Shared => keys::SHARED_ELEMENT_MAPPINGS,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Namespace::User),
            "app" => Ok(Namespace::App),
            "shared" => Ok(Namespace::Shared),
            other => Err(format!(
                "unknown namespace '{other}' (expected user, app or shared)"
            )),
        }
    }
}

/// Namespaced key/value configuration store.
///
/// Implementations own persistence, transport and timeouts. The engine
/// only relies on three behaviours:
///
/// - `get` returns [`StoreError::NotFound`] for an absent key
/// - `set` replaces the whole value stored under the key
/// - `delete` of an absent key succeeds
///
/// # Examples
///
/// ```no_run
/// use engine::store::{ConfigStore, MemoryStore, Namespace};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// store
///     .set(Namespace::App, "default_custom_theme", json!("brand"))
///     .await?;
/// let default = store.get_optional(Namespace::App, "default_custom_theme").await?;
/// assert_eq!(default, Some(json!("brand")));
/// ```
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the key is absent; any other variant for
    /// collaborator failures.
    async fn get(&self, namespace: Namespace, key: &str) -> Result<Value, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, namespace: Namespace, key: &str, value: Value) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, namespace: Namespace, key: &str) -> Result<(), StoreError>;

    /// Like [`get`](ConfigStore::get) but maps an absent key to `None`.
    async fn get_optional(
        &self,
        namespace: Namespace,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        match self.get(namespace, key).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
