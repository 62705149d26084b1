use config::{Config, Environment, File, FileFormat};
use std::path::Path;

pub mod app;
pub mod validation;

pub use app::{AppConfig, LoggingConfig, StoreConfig};
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Configuration file looked up in the working directory when `--config` is
/// not given. Optional.
pub const DEFAULT_CONFIG_FILE: &str = "tierhue.toml";

/// Prefix of environment overrides, e.g. `TIERHUE__STORE__ROOT`.
pub const ENV_PREFIX: &str = "TIERHUE";

/// Loads configuration from the file (explicit path or [`DEFAULT_CONFIG_FILE`])
/// layered under `TIERHUE__*` environment variables.
///
/// An explicit path must exist; the default file may be absent.
pub fn load_config(explicit: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();

    let file_source = match explicit {
        Some(path) => File::from(path).format(FileFormat::Toml).required(true),
        None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
    };
    let env_source = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__");

    let config = match Config::builder()
        .add_source(file_source)
        .add_source(env_source) // environment entries override file values
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your tierhue.toml file and TIERHUE__* environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => ConfigLoadResult::Success(Box::new(app_config)),
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let file = write_config(
            r#"
user = "alice"

[store]
root = "/tmp/tierhue-store"

[logging]
level = "debug"
"#,
        );

        let config = load_config(Some(file.path())).into_result().unwrap();
        assert_eq!(config.user(), Some("alice"));
        assert_eq!(config.logging().level(), "debug");
        assert_eq!(
            config.store().root(),
            std::path::PathBuf::from("/tmp/tierhue-store")
        );
    }

    #[test]
    fn test_missing_explicit_file_is_a_load_error() {
        let result = load_config(Some(Path::new("/definitely/not/here/tierhue.toml")));
        assert!(matches!(result, ConfigLoadResult::LoadError(_)));
    }

    #[test]
    fn test_wrong_types_are_a_deserialize_error() {
        let file = write_config("[store]\nroot = [1, 2]\n");
        let result = load_config(Some(file.path()));
        assert!(matches!(result, ConfigLoadResult::DeserializeError(_)));
    }
}
