use engine::{
    ActiveTheme, ColorEntry, ColorResolver, DefaultColorTable, ElementMapping, Namespace, Palette,
    PaletteCache,
};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

mod strategies {
    use super::*;

    pub fn identifier() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9]{0,11}"
    }

    pub fn hex_code() -> impl Strategy<Value = String> {
        "#[0-9a-f]{6}"
    }

    /// Palette with unique color ids and non-empty hex codes.
    pub fn palette() -> impl Strategy<Value = Palette> {
        prop::collection::hash_map(identifier(), hex_code(), 0..12).prop_map(|colors| {
            let entries = colors
                .into_iter()
                .map(|(id, hex)| ColorEntry::new(id, hex))
                .collect();
            Palette::new("generated", "Generated", entries)
        })
    }

    pub fn mapping() -> impl Strategy<Value = Vec<(String, String, String)>> {
        prop::collection::vec((identifier(), identifier(), identifier()), 0..16)
    }

    pub fn lookup_key() -> impl Strategy<Value = (String, String)> {
        prop_oneof![
            (identifier(), identifier()),
            Just(("global".to_string(), "primaryButton".to_string())),
            Just(("sidebar".to_string(), "background".to_string())),
            Just(("".to_string(), "".to_string())),
        ]
    }
}

use strategies::*;

fn resolver_for(palette: Palette, triples: &[(String, String, String)]) -> ColorResolver {
    let mut mapping = ElementMapping::new();
    for (section, element, color_id) in triples {
        mapping.insert(section.clone(), element.clone(), color_id.clone());
    }
    let palette = Arc::new(palette);
    let theme = Arc::new(ActiveTheme {
        palette_id: palette.id.clone(),
        palette_name: palette.name.clone(),
        element_mapping: mapping,
        source: Namespace::User,
    });
    let mut cache = PaletteCache::new();
    cache.refresh(Some(&palette));
    ColorResolver::new(Some(theme), Some(&palette), &cache)
}

proptest! {
    #[test]
    fn test_lookup_is_total(
        palette in palette(),
        triples in mapping(),
        key in lookup_key(),
    ) {
        let (section, element) = key;
        let resolver = resolver_for(palette, &triples);
        let color = resolver.get(&section, &element);
        prop_assert!(!color.is_empty());
    }

    #[test]
    fn test_inactive_resolver_matches_default_table(
        key in lookup_key(),
    ) {
        let (section, element) = key;
        let resolver = ColorResolver::fallback();
        prop_assert_eq!(
            resolver.get(&section, &element),
            DefaultColorTable::global().lookup(&section, &element)
        );
    }

    #[test]
    fn test_mapped_colors_resolve_through_palette(
        palette in palette(),
        triples in mapping(),
    ) {
        let colors: HashMap<String, String> = palette
            .entries()
            .iter()
            .map(|c| (c.id.clone(), c.hex_code.clone()))
            .collect();

        // Later inserts overwrite earlier ones, same as the mapping.
        let mut expected_ids: HashMap<(String, String), String> = HashMap::new();
        for (section, element, color_id) in &triples {
            expected_ids.insert((section.clone(), element.clone()), color_id.clone());
        }

        let resolver = resolver_for(palette, &triples);
        for ((section, element), color_id) in expected_ids {
            let expected = colors
                .get(&color_id)
                .map(String::as_str)
                .unwrap_or_else(|| DefaultColorTable::global().lookup(&section, &element));
            prop_assert_eq!(resolver.get(&section, &element), expected);
        }
    }

    #[test]
    fn test_cache_agrees_with_linear_scan(palette in palette(), color_id in identifier()) {
        let palette = Arc::new(palette);
        let mut cache = PaletteCache::new();
        cache.refresh(Some(&palette));

        let scanned = palette
            .entries()
            .iter()
            .find(|c| c.id == color_id)
            .map(|c| c.hex_code.as_str());
        prop_assert_eq!(cache.lookup(&color_id), scanned);
        prop_assert_eq!(cache.len(), palette.entries().len());
    }

    #[test]
    fn test_cache_refresh_is_identity_keyed(palette in palette()) {
        let palette = Arc::new(palette);
        let mut cache = PaletteCache::new();
        prop_assert!(cache.refresh(Some(&palette)));
        prop_assert!(!cache.refresh(Some(&palette)));

        let copy = Arc::new(palette.as_ref().clone());
        prop_assert!(cache.refresh(Some(&copy)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_activated_theme_answers_like_resolver(
        palette in palette(),
        triples in mapping(),
        key in lookup_key(),
    ) {
        use engine::store::MemoryStore;
        use engine::ActiveThemeController;
        use serde_json::json;

        let (section, element) = key;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let expected = resolver_for(palette.clone(), &triples)
            .get(&section, &element)
            .to_string();

        let actual = runtime.block_on(async {
            let store = MemoryStore::new();
            let mut stored_mapping = serde_json::Map::new();
            for (s, e, c) in &triples {
                let sections = stored_mapping
                    .entry(s.clone())
                    .or_insert_with(|| json!({}));
                sections[e.as_str()] = json!(c);
            }
            store
                .seed(
                    Namespace::User,
                    Namespace::User.palettes_key(),
                    json!({ "generated": serde_json::to_value(&palette).unwrap() }),
                )
                .await;
            store
                .seed(
                    Namespace::User,
                    Namespace::User.mappings_key(),
                    json!({ "generated": stored_mapping }),
                )
                .await;

            let controller = ActiveThemeController::new(Arc::new(store));
            controller.set_user(Some("prop-user")).await.unwrap();
            controller.activate("generated", false, None).await.unwrap();
            controller.get_color_for_element(&section, &element)
        });

        prop_assert_eq!(actual, expected);
    }
}
