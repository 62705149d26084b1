use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One entry of a palette's color list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub id: String,
    #[serde(rename = "hexCode")]
    pub hex_code: String,
}

impl ColorEntry {
    pub fn new(id: impl Into<String>, hex_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hex_code: hex_code.into(),
        }
    }
}

/// A named collection of colors.
///
/// `colors` is `None` when the stored record has no color list, or has
/// something other than a list there. Such a palette is malformed: it can be
/// inspected but never backs an active theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "list_shaped_colors",
        skip_serializing_if = "Option::is_none"
    )]
    pub colors: Option<Vec<ColorEntry>>,
}

impl Palette {
    pub fn new(id: impl Into<String>, name: impl Into<String>, colors: Vec<ColorEntry>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            colors: Some(colors),
        }
    }

    /// Parses one entry of a stored palette collection.
    ///
    /// Never fails: a record that is not an object yields a malformed
    /// palette, so the caller can tell "present but broken" from "absent".
    pub fn from_stored(palette_id: &str, value: &Value) -> Self {
        let mut palette = match serde_json::from_value::<Palette>(value.clone()) {
            Ok(palette) => palette,
            Err(e) => {
                log::warn!("Palette '{palette_id}' has an unreadable record: {e}");
                Palette {
                    id: String::new(),
                    name: String::new(),
                    colors: None,
                }
            }
        };

        // The collection key is the canonical id.
        if palette.id != palette_id {
            palette.id = palette_id.to_string();
        }
        if palette.name.is_empty() {
            palette.name = palette.id.clone();
        }
        palette
    }

    pub fn is_well_formed(&self) -> bool {
        self.colors.is_some()
    }

    /// Color entries, empty for a malformed palette.
    pub fn entries(&self) -> &[ColorEntry] {
        self.colors.as_deref().unwrap_or(&[])
    }
}

// A list of entries is kept even if individual entries are unreadable; only
// a missing or non-list value marks the palette malformed.
fn list_shaped_colors<'de, D>(deserializer: D) -> Result<Option<Vec<ColorEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = raw else {
        return Ok(None);
    };

    let entries = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ColorEntry>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable palette color entry: {e}");
                None
            }
        })
        .collect();
    Ok(Some(entries))
}

/// `section → element → colorId` lookup for one palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementMapping(HashMap<String, HashMap<String, String>>);

impl ElementMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        section: impl Into<String>,
        element: impl Into<String>,
        color_id: impl Into<String>,
    ) -> Self {
        self.insert(section, element, color_id);
        self
    }

    pub fn insert(
        &mut self,
        section: impl Into<String>,
        element: impl Into<String>,
        color_id: impl Into<String>,
    ) {
        self.0
            .entry(section.into())
            .or_default()
            .insert(element.into(), color_id.into());
    }

    pub fn color_id(&self, section: &str, element: &str) -> Option<&str> {
        self.0
            .get(section)
            .and_then(|elements| elements.get(element))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses one entry of a stored mapping collection.
    ///
    /// Returns `None` when the record is not an object. Sections that are not
    /// objects and element values that are not strings are skipped.
    pub fn from_stored(palette_id: &str, value: &Value) -> Option<Self> {
        let Value::Object(sections) = value else {
            log::warn!("Element mapping for '{palette_id}' is not an object");
            return None;
        };

        let mut mapping = ElementMapping::new();
        for (section, elements) in sections {
            let Value::Object(elements) = elements else {
                log::debug!("Skipping non-object section '{section}' in mapping '{palette_id}'");
                continue;
            };
            for (element, color_id) in elements {
                match color_id.as_str() {
                    Some(color_id) => mapping.insert(section.clone(), element.clone(), color_id),
                    None => log::debug!(
                        "Skipping non-string color id for {section}.{element} in mapping '{palette_id}'"
                    ),
                }
            }
        }
        Some(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_palette_without_colors_is_malformed() {
        let palette = Palette::from_stored("old", &json!({ "id": "old", "name": "Old" }));
        assert!(!palette.is_well_formed());
        assert!(palette.entries().is_empty());
    }

    #[test]
    fn test_palette_with_non_list_colors_is_malformed() {
        let palette = Palette::from_stored(
            "odd",
            &json!({ "id": "odd", "name": "Odd", "colors": { "c1": "#fff" } }),
        );
        assert!(!palette.is_well_formed());
    }

    #[test]
    fn test_palette_with_empty_list_is_well_formed() {
        let palette = Palette::from_stored("empty", &json!({ "name": "Empty", "colors": [] }));
        assert!(palette.is_well_formed());
        assert_eq!(palette.id, "empty");
    }

    #[test]
    fn test_non_object_record_is_malformed_not_absent() {
        let palette = Palette::from_stored("brand", &json!("brand"));
        assert_eq!(palette.id, "brand");
        assert_eq!(palette.name, "brand");
        assert!(!palette.is_well_formed());
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        let palette = Palette::from_stored(
            "p",
            &json!({
                "colors": [
                    { "id": "c1", "hexCode": "#112233" },
                    { "id": "c2" },
                    { "id": "c3", "hexCode": "#445566" }
                ]
            }),
        );
        assert!(palette.is_well_formed());
        let ids: Vec<&str> = palette.entries().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);
    }

    #[test]
    fn test_palette_serializes_hex_code_in_camel_case() {
        let palette = Palette::new("p", "P", vec![ColorEntry::new("c1", "#000000")]);
        let value = serde_json::to_value(&palette).unwrap();
        assert_eq!(value["colors"][0]["hexCode"], json!("#000000"));
    }

    #[test]
    fn test_mapping_lookup() {
        let mapping = ElementMapping::new()
            .with("global", "primaryButton", "c1")
            .with("dashboard", "cardBackground", "c2");

        assert_eq!(mapping.color_id("global", "primaryButton"), Some("c1"));
        assert_eq!(mapping.color_id("global", "missing"), None);
        assert_eq!(mapping.color_id("missing", "primaryButton"), None);
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_mapping_from_stored_skips_bad_leaves() {
        let mapping = ElementMapping::from_stored(
            "p",
            &json!({
                "global": { "primaryButton": "c1", "broken": 7 },
                "sidebar": "not-an-object"
            }),
        )
        .unwrap();

        assert_eq!(mapping.color_id("global", "primaryButton"), Some("c1"));
        assert_eq!(mapping.color_id("global", "broken"), None);
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_mapping_from_non_object_is_none() {
        assert!(ElementMapping::from_stored("p", &json!(["c1"])).is_none());
    }
}
