//! # Color Resolution
//!
//! - [`SourceResolver`] - Picks the tier that supplies a palette and its mapping
//! - [`PaletteCache`] - `colorId → hex` lookup memoized on palette identity
//! - [`DefaultColorTable`] - Static colors used whenever a theme cannot answer
//! - [`ColorResolver`] - Total, synchronous `(section, element) → color` query

pub mod defaults;
pub mod element;
pub mod palette_cache;
pub mod source;

pub use defaults::DefaultColorTable;
pub use element::ColorResolver;
pub use palette_cache::PaletteCache;
pub use source::{ResolvedSource, SourceResolver};
