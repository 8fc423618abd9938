//! Asset reference extraction and hydration.
//!
//! A layout stored in the CMS only names its linked media by identifier.
//! Before rendering, [`collect_asset_ids`] gathers the identifiers that need
//! resolving, the caller fetches them from the asset store, and
//! [`hydrate_blocks`] substitutes the fetched records back into the blocks.

use crate::types::{Asset, AssetRef, Block, BlockKind, ImageGridData};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// What to do with a reference whose asset was not returned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingAssetPolicy {
    /// Keep the original reference in place (the block still renders its slot)
    #[default]
    Preserve,
    /// Drop the reference: single-image slots become empty and grid entries
    /// are removed, shifting later entries forward
    Elide,
}

/// Identifier → asset lookup built from a fetch result.
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    by_id: HashMap<String, Asset>,
}

impl AssetIndex {
    /// Later duplicates overwrite earlier ones.
    pub fn new(assets: &[Asset]) -> Self {
        let by_id = assets
            .iter()
            .map(|a| (a.id().to_string(), a.clone()))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolve a single reference. `None` means the policy elided it.
    fn resolve(&self, reference: &AssetRef, policy: MissingAssetPolicy) -> Option<AssetRef> {
        let Some(id) = reference.unresolved_id() else {
            return Some(reference.clone());
        };
        match (self.get(id), policy) {
            (Some(asset), _) => {
                let mut resolved = AssetRef::from(asset.clone());
                resolved.extra = reference.extra.clone();
                Some(resolved)
            }
            (None, MissingAssetPolicy::Preserve) => Some(reference.clone()),
            (None, MissingAssetPolicy::Elide) => {
                log::debug!("asset '{}' not found; eliding reference", id);
                None
            }
        }
    }

    fn resolve_slot(&self, slot: &Option<AssetRef>, policy: MissingAssetPolicy) -> Option<AssetRef> {
        slot.as_ref().and_then(|r| self.resolve(r, policy))
    }
}

/// Collect the distinct asset identifiers referenced by non-placeholder
/// image slots across `blocks`.
pub fn collect_asset_ids(blocks: &[Block]) -> BTreeSet<String> {
    blocks
        .iter()
        .flat_map(Block::asset_refs)
        .filter_map(AssetRef::unresolved_id)
        .map(str::to_string)
        .collect()
}

/// Return a copy of `blocks` with linked assets replaced by their resolved
/// records. Block count and order are unchanged.
pub fn hydrate_blocks(blocks: &[Block], assets: &[Asset], policy: MissingAssetPolicy) -> Vec<Block> {
    let index = AssetIndex::new(assets);
    hydrate_with_index(blocks, &index, policy)
}

/// Same as [`hydrate_blocks`] with a prebuilt index.
pub fn hydrate_with_index(blocks: &[Block], index: &AssetIndex, policy: MissingAssetPolicy) -> Vec<Block> {
    blocks
        .iter()
        .map(|block| {
            let kind = match &block.kind {
                BlockKind::Hero(data) => {
                    let mut data = data.clone();
                    data.background_image = index.resolve_slot(&data.background_image, policy);
                    BlockKind::Hero(data)
                }
                BlockKind::TwoColumn(data) => {
                    let mut data = data.clone();
                    data.image = index.resolve_slot(&data.image, policy);
                    BlockKind::TwoColumn(data)
                }
                BlockKind::ImageGrid(data) => BlockKind::ImageGrid(ImageGridData {
                    images: data
                        .images
                        .iter()
                        .filter_map(|r| index.resolve(r, policy))
                        .collect(),
                    extra: data.extra.clone(),
                }),
                BlockKind::Opaque { .. } => block.kind.clone(),
            };
            Block::new(block.id.clone(), kind)
        })
        .collect()
}
