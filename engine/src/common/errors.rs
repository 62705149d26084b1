use crate::store::Namespace;
use thiserror::Error;

/// Errors reported by a [`ConfigStore`](crate::store::ConfigStore) implementation.
///
/// The engine distinguishes exactly one "soft" condition from everything
/// else: a missing key. [`NotFound`] means "nothing configured at this tier"
/// and is never surfaced to users. Every other variant is a real failure of
/// the store collaborator.
///
/// # Error Categories
///
/// ## Absent Data
/// - [`NotFound`] - The key does not exist in the namespace
///
/// ## Collaborator Failures
/// - [`Transport`] - The store could not be reached or refused the operation
/// - [`Serialization`] - The stored value could not be encoded or decoded
///
/// # Examples
///
/// ```no_run
/// use engine::common::StoreError;
/// use engine::store::{ConfigStore, Namespace};
///
/// async fn saved_reference(store: &dyn ConfigStore) -> Option<serde_json::Value> {
///     match store.get(Namespace::User, "active_custom_theme").await {
///         Ok(value) => Some(value),
///         Err(StoreError::NotFound { .. }) => None,
///         Err(e) => {
///             log::warn!("Could not read saved theme: {e}");
///             None
///         }
///     }
/// }
/// ```
///
/// [`NotFound`]: StoreError::NotFound
/// [`Transport`]: StoreError::Transport
/// [`Serialization`]: StoreError::Serialization
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The key is absent from the namespace.
    #[error("Key '{key}' not found in {namespace} namespace")]
    NotFound { namespace: Namespace, key: String },

    /// Transport-level failure distinct from a missing key.
    ///
    /// # Recovery
    /// - Auto-detecting resolution treats the tier as "no match"
    /// - Lifecycle operations surface the error and keep the previous theme
    #[error("Store failure in {namespace} namespace: {reason}")]
    Transport { namespace: Namespace, reason: String },

    /// A value could not be encoded for, or decoded from, the store.
    #[error("Invalid stored value for key '{key}': {reason}")]
    Serialization { key: String, reason: String },
}

impl StoreError {
    pub fn not_found(namespace: Namespace, key: impl Into<String>) -> Self {
        Self::NotFound {
            namespace,
            key: key.into(),
        }
    }

    pub fn transport(namespace: Namespace, reason: impl Into<String>) -> Self {
        Self::Transport {
            namespace,
            reason: reason.into(),
        }
    }

    /// Returns `true` for the absent-key condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors produced by theme lifecycle operations.
///
/// Only [`activate`], [`disable`], [`reload`] and [`initialize`] can return
/// these. Color lookups never fail; they degrade to the default table.
///
/// # Error Categories
///
/// ## Resolution Errors
/// - [`NotFound`] - No tier holds both a palette and a mapping for the id
/// - [`Malformed`] - The winning tier's palette has no valid color list
///
/// ## Lifecycle Errors
/// - [`Store`] - The store collaborator failed for a reason other than a missing key
/// - [`Superseded`] - A newer lifecycle call was issued before this one finished
/// - [`NoUser`] - The operation needs a signed-in user
///
/// # Examples
///
/// ```no_run
/// use engine::{ActiveThemeController, ThemeError};
///
/// async fn choose(controller: &ActiveThemeController, palette_id: &str) {
///     match controller.activate(palette_id, true, None).await {
///         Ok(theme) => log::info!("Now using {}", theme.palette_name),
///         Err(ThemeError::Malformed { reason, .. }) => {
///             log::warn!("Palette cannot be used: {reason}");
///         }
///         Err(ThemeError::Superseded { .. }) => {}
///         Err(e) => log::error!("Theme activation failed: {e}"),
///     }
/// }
/// ```
///
/// [`activate`]: crate::controller::ActiveThemeController::activate
/// [`disable`]: crate::controller::ActiveThemeController::disable
/// [`reload`]: crate::controller::ActiveThemeController::reload
/// [`initialize`]: crate::controller::ActiveThemeController::initialize
/// [`NotFound`]: ThemeError::NotFound
/// [`Malformed`]: ThemeError::Malformed
/// [`Store`]: ThemeError::Store
/// [`Superseded`]: ThemeError::Superseded
/// [`NoUser`]: ThemeError::NoUser
#[derive(Debug, Clone, Error)]
pub enum ThemeError {
    /// No palette/mapping pair exists for the id in the searched tier(s).
    #[error("Palette '{palette_id}' not found {}", describe_tier(.tier))]
    NotFound {
        palette_id: String,
        tier: Option<Namespace>,
    },

    /// The palette exists but cannot back a theme.
    #[error("Palette '{palette_id}' is malformed: {reason}")]
    Malformed { palette_id: String, reason: String },

    /// The store failed with something other than a missing key.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A newer lifecycle call was issued while this one was in flight.
    #[error("Activation of '{palette_id}' was superseded by a newer theme request")]
    Superseded { palette_id: String },

    /// Lifecycle operations require a signed-in user.
    #[error("No user is signed in")]
    NoUser,
}

impl ThemeError {
    pub fn not_found(palette_id: impl Into<String>, tier: Option<Namespace>) -> Self {
        Self::NotFound {
            palette_id: palette_id.into(),
            tier,
        }
    }

    pub fn malformed(palette_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            palette_id: palette_id.into(),
            reason: reason.into(),
        }
    }

    /// Whether a persisted reference that produced this error should be
    /// treated as stale. Transport failures are not: the data may still exist.
    pub fn marks_reference_stale(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Malformed { .. } => true,
            Self::Store(e) => e.is_not_found() || matches!(e, StoreError::Serialization { .. }),
            Self::Superseded { .. } | Self::NoUser => false,
        }
    }
}

fn describe_tier(tier: &Option<Namespace>) -> String {
    match tier {
        Some(namespace) => format!("in {namespace} namespace"),
        None => "in any namespace".to_string(),
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error result
    fn context(self, msg: &str) -> Result<T, String>;

    /// Add lazy context to an error result
    fn with_context<F>(self, f: F) -> Result<T, String>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> Result<T, String> {
        self.map_err(|e| format!("{msg}: {e}"))
    }

    fn with_context<F>(self, f: F) -> Result<T, String>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| format!("{}: {e}", f()))
    }
}
