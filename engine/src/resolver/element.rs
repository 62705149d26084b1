use super::{DefaultColorTable, PaletteCache};
use crate::model::{ActiveTheme, Palette};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Snapshot of everything needed to answer `(section, element) → color`.
///
/// Cheap to clone and immutable, so it can be handed to other state
/// containers. Lookups never block, never fail and never return an empty
/// string: anything the active theme cannot answer comes from the
/// [`DefaultColorTable`].
#[derive(Clone)]
pub struct ColorResolver {
    theme: Option<Arc<ActiveTheme>>,
    colors: Arc<HashMap<String, String>>,
    defaults: &'static DefaultColorTable,
}

impl ColorResolver {
    /// Resolver with no active theme.
    pub fn fallback() -> Self {
        Self {
            theme: None,
            colors: Arc::default(),
            defaults: DefaultColorTable::global(),
        }
    }

    /// Builds a resolver over `theme`. A missing or malformed palette
    /// disables the theme for lookups.
    pub fn new(
        theme: Option<Arc<ActiveTheme>>,
        palette: Option<&Arc<Palette>>,
        cache: &PaletteCache,
    ) -> Self {
        let usable = palette.is_some_and(|p| p.is_well_formed());
        if theme.is_none() || !usable {
            return Self::fallback();
        }

        Self {
            theme,
            colors: cache.colors(),
            defaults: DefaultColorTable::global(),
        }
    }

    pub fn get<'a>(&'a self, section: &str, element: &str) -> &'a str {
        let Some(theme) = self.theme.as_ref() else {
            return self.defaults.lookup(section, element);
        };

        theme
            .element_mapping
            .color_id(section, element)
            .and_then(|color_id| self.colors.get(color_id))
            .map(String::as_str)
            .filter(|hex| !hex.trim().is_empty())
            .unwrap_or_else(|| self.defaults.lookup(section, element))
    }

    pub fn is_active(&self) -> bool {
        self.theme.is_some()
    }

    pub fn theme(&self) -> Option<&Arc<ActiveTheme>> {
        self.theme.as_ref()
    }
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::fallback()
    }
}

impl fmt::Debug for ColorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorResolver")
            .field(
                "palette_id",
                &self.theme.as_ref().map(|t| t.palette_id.as_str()),
            )
            .field("colors", &self.colors.len())
            .finish()
    }
}
