use crate::model::Palette;
use std::collections::HashMap;
use std::sync::Arc;

/// `colorId → hexCode` lookup for the active palette.
///
/// Memoized on the identity of the palette `Arc`, not its contents: handing
/// in the same `Arc` is a no-op, handing in a new one rebuilds even if the
/// colors are equal.
#[derive(Debug, Clone, Default)]
pub struct PaletteCache {
    source: Option<Arc<Palette>>,
    colors: Arc<HashMap<String, String>>,
}

impl PaletteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single pass over the palette's colors. A malformed palette yields an
    /// empty map; later duplicates of a color id win.
    pub fn build(palette: &Palette) -> HashMap<String, String> {
        let Some(colors) = palette.colors.as_ref() else {
            log::debug!("Palette '{}' has no color list, cache left empty", palette.id);
            return HashMap::new();
        };

        let mut map = HashMap::with_capacity(colors.len());
        for entry in colors {
            map.insert(entry.id.clone(), entry.hex_code.clone());
        }
        map
    }

    /// Points the cache at `palette`. Returns `true` if the map was rebuilt.
    pub fn refresh(&mut self, palette: Option<&Arc<Palette>>) -> bool {
        let unchanged = match (self.source.as_ref(), palette) {
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return false;
        }

        self.colors = Arc::new(palette.map(|p| Self::build(p)).unwrap_or_default());
        self.source = palette.cloned();
        true
    }

    pub fn lookup(&self, color_id: &str) -> Option<&str> {
        self.colors.get(color_id).map(String::as_str)
    }

    /// Shared handle to the current map.
    pub fn colors(&self) -> Arc<HashMap<String, String>> {
        Arc::clone(&self.colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
