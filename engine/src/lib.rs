//! # Tierhue Engine
//!
//! Core library for tiered theme resolution. Given a named UI element
//! (`section`, `element`) the engine decides which color to display by
//! resolving a palette and element mapping across three configuration tiers
//! (`user` → `app` → `shared`), and republishes that decision to an
//! independently rendered state container.
//!
//! ## Modules
//!
//! - [`common`] - Error types shared by every component
//! - [`model`] - Palettes, element mappings, theme references and colors
//! - [`store`] - The namespaced key/value store contract and its adapters
//! - [`resolver`] - Tier selection, palette cache, default table and the color resolver
//! - [`controller`] - Active theme lifecycle (initialize, activate, disable, reload)
//! - [`bridge`] - One-directional publication of the resolver to sibling containers

pub mod bridge;
pub mod common;
pub mod controller;
pub mod model;
pub mod resolver;
pub mod store;

pub use bridge::{ThemeBridge, ThemeObserver, ThemeSnapshot};
pub use common::{StoreError, ThemeError};
pub use controller::{ActiveThemeController, ThemeStatus};
pub use model::{ActiveTheme, ColorEntry, ElementMapping, Palette, ThemeReference};
pub use resolver::{ColorResolver, DefaultColorTable, PaletteCache, SourceResolver};
pub use store::{ConfigStore, FileStore, MemoryStore, Namespace};
