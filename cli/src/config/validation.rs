use super::app::AppConfig;
use std::path::PathBuf;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid user: the user id is empty")]
    EmptyUserId,
    #[error("Invalid store.root: {path} is not a directory")]
    StoreRootNotDirectory { path: PathBuf },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::EmptyUserId => "User id is empty!\n\n\
                Please set user in tierhue.toml, TIERHUE__USER, or pass --user <ID>."
                .to_string(),
            ConfigValidationError::StoreRootNotDirectory { path } => {
                format!(
                    "Store root is not a directory!\n\n\
                    Configured path: {}\n\n\
                    Please point store.root in tierhue.toml (or --store) at a directory.",
                    path.display()
                )
            }
        }
    }
}

/// Configuration loading result
#[derive(Debug)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}

impl ConfigLoadResult {
    pub fn into_result(self) -> Result<AppConfig, String> {
        match self {
            ConfigLoadResult::Success(config) => Ok(*config),
            ConfigLoadResult::LoadError(e) | ConfigLoadResult::DeserializeError(e) => Err(e),
        }
    }
}
