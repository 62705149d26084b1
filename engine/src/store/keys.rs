//! Store keys read and written by the engine.

/// `{ paletteId: Palette }` in the `user` and `app` namespaces
pub const CUSTOM_COLOR_PALETTES: &str = "custom_color_palettes";

/// `{ paletteId: ElementMapping }` in the `user` and `app` namespaces
pub const ELEMENT_COLOR_MAPPING: &str = "element_color_mapping";

/// `{ paletteId: Palette }` in the `shared` namespace
pub const SHARED_CUSTOM_THEMES: &str = "shared_custom_themes";

/// `{ paletteId: ElementMapping }` in the `shared` namespace
pub const SHARED_ELEMENT_MAPPINGS: &str = "shared_element_mappings";

/// Persisted theme reference in the `user` namespace
pub const ACTIVE_CUSTOM_THEME: &str = "active_custom_theme";

/// Bare palette id in the `app` namespace
pub const DEFAULT_CUSTOM_THEME: &str = "default_custom_theme";
