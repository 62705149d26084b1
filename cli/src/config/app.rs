use super::validation::ConfigValidationError;
use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    user: Option<String>,
    #[serde(default)]
    store: StoreConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// Applies command line overrides on top of file and environment values.
    pub fn with_overrides(mut self, store_root: Option<PathBuf>, user: Option<String>) -> Self {
        if let Some(root) = store_root {
            self.store.root = Some(root);
        }
        if let Some(user) = user {
            self.user = Some(user);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        if self.user.as_deref().is_some_and(|user| user.trim().is_empty()) {
            errors.push(ConfigValidationError::EmptyUserId);
        }

        let root = self.store.root();
        if root.exists() && !root.is_dir() {
            errors.push(ConfigValidationError::StoreRootNotDirectory { path: root });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

/// Where the JSON namespace files live
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StoreConfig {
    root: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured root, else `<config dir>/tierhue/store`.
    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(default_store_root)
    }
}

fn default_store_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tierhue")
        .join("store")
}

/// Additional logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("warn")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
