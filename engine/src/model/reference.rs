use crate::common::StoreError;
use crate::store::{Namespace, keys};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted pointer to the user's chosen palette.
///
/// Two shapes exist in stores: the legacy bare palette id (`"brand"`) and the
/// structured `{ "paletteId": "brand", "source": "app" }`. Both are parsed
/// into this type by [`from_stored`](ThemeReference::from_stored); only the
/// structured shape is ever written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeReference {
    pub palette_id: String,
    pub source: Namespace,
}

/// Wire shapes accepted on read. Private so the union stays at the boundary.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredReference {
    Legacy(String),
    Structured {
        #[serde(rename = "paletteId")]
        palette_id: String,
        #[serde(default = "legacy_source")]
        source: Namespace,
    },
}

#[derive(Serialize)]
struct StructuredReference<'a> {
    #[serde(rename = "paletteId")]
    palette_id: &'a str,
    source: Namespace,
}

fn legacy_source() -> Namespace {
    Namespace::User
}

impl ThemeReference {
    pub fn new(palette_id: impl Into<String>, source: Namespace) -> Self {
        Self {
            palette_id: palette_id.into(),
            source,
        }
    }

    /// Parses either stored shape. A bare id reads as a `user`-tier reference.
    ///
    /// # Errors
    ///
    /// [`StoreError::Serialization`] for any other shape or an empty id.
    pub fn from_stored(value: &Value) -> Result<Self, StoreError> {
        let parsed = serde_json::from_value::<StoredReference>(value.clone()).map_err(|_| {
            StoreError::Serialization {
                key: keys::ACTIVE_CUSTOM_THEME.to_string(),
                reason: format!("unrecognized theme reference: {value}"),
            }
        })?;

        let reference = match parsed {
            StoredReference::Legacy(palette_id) => Self::new(palette_id, legacy_source()),
            StoredReference::Structured { palette_id, source } => Self::new(palette_id, source),
        };

        if reference.palette_id.trim().is_empty() {
            return Err(StoreError::Serialization {
                key: keys::ACTIVE_CUSTOM_THEME.to_string(),
                reason: "theme reference has an empty palette id".to_string(),
            });
        }
        Ok(reference)
    }

    /// The structured shape written to the store.
    pub fn to_stored(&self) -> Value {
        serde_json::to_value(StructuredReference {
            palette_id: &self.palette_id,
            source: self.source,
        })
        .unwrap_or_else(|_| Value::String(self.palette_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_string_reads_as_user_reference() {
        let legacy = ThemeReference::from_stored(&json!("brand")).unwrap();
        let structured =
            ThemeReference::from_stored(&json!({ "paletteId": "brand", "source": "user" }))
                .unwrap();
        assert_eq!(legacy, structured);
        assert_eq!(legacy.source, Namespace::User);
    }

    #[test]
    fn test_structured_reference_keeps_source() {
        let reference =
            ThemeReference::from_stored(&json!({ "paletteId": "ocean", "source": "shared" }))
                .unwrap();
        assert_eq!(reference, ThemeReference::new("ocean", Namespace::Shared));
    }

    #[test]
    fn test_structured_reference_without_source_defaults_to_user() {
        let reference = ThemeReference::from_stored(&json!({ "paletteId": "ocean" })).unwrap();
        assert_eq!(reference.source, Namespace::User);
    }

    #[test]
    fn test_only_structured_shape_is_written() {
        let stored = ThemeReference::new("brand", Namespace::App).to_stored();
        assert_eq!(stored, json!({ "paletteId": "brand", "source": "app" }));
    }

    #[test]
    fn test_unrecognized_shapes_are_rejected() {
        assert!(ThemeReference::from_stored(&json!(42)).is_err());
        assert!(ThemeReference::from_stored(&json!({ "palette": "brand" })).is_err());
        assert!(
            ThemeReference::from_stored(&json!({ "paletteId": "brand", "source": "tenant" }))
                .is_err()
        );
        assert!(ThemeReference::from_stored(&json!("  ")).is_err());
    }
}
