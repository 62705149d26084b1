use crate::common::{StoreError, ThemeError};
use crate::model::{ElementMapping, Palette};
use crate::store::{ConfigStore, Namespace};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;

/// A palette and its element mapping, both read from the same tier.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub palette: Arc<Palette>,
    pub mapping: ElementMapping,
    pub tier: Namespace,
}

/// What one tier holds for a palette id.
#[derive(Debug, Default)]
struct TierEntries {
    palette: Option<Palette>,
    mapping: Option<ElementMapping>,
}

impl TierEntries {
    fn into_match(self, tier: Namespace) -> Option<ResolvedSource> {
        match (self.palette, self.mapping) {
            (Some(palette), Some(mapping)) => Some(ResolvedSource {
                palette: Arc::new(palette),
                mapping,
                tier,
            }),
            _ => None,
        }
    }
}

/// Decides which tier supplies a palette and its mapping.
///
/// With an explicit tier only that namespace is read and any store failure
/// other than a missing key is returned. Without one, all tiers are read
/// concurrently and the first of `user`, `app`, `shared` holding **both** a
/// palette and a mapping wins; per-tier failures count as "no match".
pub struct SourceResolver<'a> {
    store: &'a dyn ConfigStore,
}

impl<'a> SourceResolver<'a> {
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self { store }
    }

    pub async fn resolve(
        &self,
        palette_id: &str,
        explicit: Option<Namespace>,
    ) -> Result<ResolvedSource, ThemeError> {
        match explicit {
            Some(tier) => self.resolve_in(palette_id, tier).await,
            None => self.detect(palette_id).await,
        }
    }

    async fn resolve_in(
        &self,
        palette_id: &str,
        tier: Namespace,
    ) -> Result<ResolvedSource, ThemeError> {
        let entries = self.read_tier(tier, palette_id).await?;
        entries
            .into_match(tier)
            .ok_or_else(|| ThemeError::not_found(palette_id, Some(tier)))
    }

    async fn detect(&self, palette_id: &str) -> Result<ResolvedSource, ThemeError> {
        let reads = join_all(
            Namespace::PRIORITY
                .iter()
                .map(|tier| self.read_tier(*tier, palette_id)),
        )
        .await;

        for (tier, read) in Namespace::PRIORITY.iter().zip(reads) {
            match read {
                Ok(entries) => {
                    if let Some(found) = entries.into_match(*tier) {
                        log::debug!("Palette '{palette_id}' resolved from {tier} namespace");
                        return Ok(found);
                    }
                }
                Err(e) => {
                    log::warn!("Skipping {tier} namespace while resolving '{palette_id}': {e}");
                }
            }
        }

        Err(ThemeError::not_found(palette_id, None))
    }

    async fn read_tier(
        &self,
        tier: Namespace,
        palette_id: &str,
    ) -> Result<TierEntries, StoreError> {
        let (palettes, mappings) = futures::join!(
            self.store.get_optional(tier, tier.palettes_key()),
            self.store.get_optional(tier, tier.mappings_key()),
        );

        let palette = entry(palettes?.as_ref(), palette_id, tier.palettes_key())
            .map(|value| Palette::from_stored(palette_id, value));
        let mapping = entry(mappings?.as_ref(), palette_id, tier.mappings_key())
            .and_then(|value| ElementMapping::from_stored(palette_id, value));

        Ok(TierEntries { palette, mapping })
    }
}

fn entry<'v>(collection: Option<&'v Value>, palette_id: &str, key: &str) -> Option<&'v Value> {
    match collection? {
        Value::Object(items) => items.get(palette_id).filter(|value| !value.is_null()),
        _ => {
            log::warn!("Stored '{key}' is not an object, ignoring it");
            None
        }
    }
}
