pub mod color;
pub mod palette;
pub mod reference;

pub use color::{HexColor, parse_hex_color};
pub use palette::{ColorEntry, ElementMapping, Palette};
pub use reference::ThemeReference;

use crate::store::Namespace;

/// The theme currently backing color resolution.
///
/// Created by a successful activation and replaced wholesale on the next
/// one; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTheme {
    pub palette_id: String,
    pub palette_name: String,
    pub element_mapping: ElementMapping,
    /// Tier that supplied both the palette and the mapping
    pub source: Namespace,
}

impl ActiveTheme {
    /// The reference that would restore this theme on the next session.
    pub fn reference(&self) -> ThemeReference {
        ThemeReference::new(self.palette_id.clone(), self.source)
    }
}
