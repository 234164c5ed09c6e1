//! Positioned storages the player can interact with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stowage_core::BlockPos;

use crate::container::{CombinedContainer, Container, Inventory};
use crate::error::{Result, StowageError};
use crate::nearby::{NearbyStorage, StorageDiscovery};

/// Default search radius for nearby quick stacking, in blocks.
pub const DEFAULT_NEARBY_RADIUS: u32 = 5;

/// What kind of world object backs a storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageKind {
    /// A single block entity such as a chest or barrel.
    Block,
    /// One half of a double chest; `partner` is the other half.
    DoubleChest { partner: BlockPos },
    /// A storage riding on an entity, e.g. a chest minecart or chest boat.
    Vehicle,
    /// The per-player ender chest.
    EnderChest,
}

impl StorageKind {
    /// Whether nearby quick stacking may deposit into this storage.
    pub fn nearby_eligible(self) -> bool {
        !matches!(self, StorageKind::EnderChest)
    }
}

/// A storage and its naming state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub inventory: Inventory,
    pub kind: StorageKind,
    /// Name of the block or entity type, e.g. "Chest" for either double chest half.
    pub default_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

impl StorageEntry {
    pub fn new(inventory: Inventory, kind: StorageKind, default_name: impl Into<String>) -> Self {
        Self {
            inventory,
            kind,
            default_name: default_name.into(),
            custom_name: None,
        }
    }

    /// Name shown to the player.
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.default_name)
    }
}

/// Storages keyed by position.
///
/// Also the reference [`StorageDiscovery`]: storages within `radius` of the
/// origin, nearest first, ties broken by position. A paired double chest is
/// found once, under its lower half, at the distance of its nearer half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageMap {
    storages: BTreeMap<BlockPos, StorageEntry>,
    radius: u32,
}

impl Default for StorageMap {
    fn default() -> Self {
        Self::new(DEFAULT_NEARBY_RADIUS)
    }
}

impl StorageMap {
    /// Empty map whose discovery searches `radius` blocks around the origin.
    pub fn new(radius: u32) -> Self {
        Self {
            storages: BTreeMap::new(),
            radius,
        }
    }

    /// Register a storage, returning the one it replaced.
    pub fn insert(&mut self, position: BlockPos, entry: StorageEntry) -> Option<StorageEntry> {
        self.storages.insert(position, entry)
    }

    /// The storage registered at `position`; for a double chest, only that half.
    pub fn get(&self, position: BlockPos) -> Option<&StorageEntry> {
        self.storages.get(&position)
    }

    pub fn get_mut(&mut self, position: BlockPos) -> Option<&mut StorageEntry> {
        self.storages.get_mut(&position)
    }

    /// Number of registered storages, counting each double chest half.
    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    /// Storages in position order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, &StorageEntry)> {
        self.storages.iter().map(|(pos, entry)| (*pos, entry))
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// The other half of a double chest, if both halves point at each other.
    pub fn partner_of(&self, position: BlockPos) -> Option<BlockPos> {
        let StorageKind::DoubleChest { partner } = self.storages.get(&position)?.kind else {
            return None;
        };
        let other = self.storages.get(&partner)?;
        (partner != position && other.kind == StorageKind::DoubleChest { partner: position })
            .then_some(partner)
    }

    /// The container the player works with at `position`.
    ///
    /// A paired double chest resolves to both halves, lower position first,
    /// whichever half `position` names.
    pub fn storage_at(&mut self, position: BlockPos) -> Result<CombinedContainer<'_>> {
        if !self.storages.contains_key(&position) {
            return Err(StowageError::StorageNotFound(position));
        }
        let partner = self.partner_of(position);
        let parts = self
            .storages
            .iter_mut()
            .filter(|(pos, _)| **pos == position || Some(**pos) == partner)
            .map(|(_, entry)| &mut entry.inventory as &mut dyn Container)
            .collect();
        Ok(CombinedContainer::new(parts))
    }

    /// Clear the dirty flag of every storage.
    pub fn clear_dirty(&mut self) {
        for entry in self.storages.values_mut() {
            entry.inventory.clear_dirty();
        }
    }
}

impl StorageDiscovery for StorageMap {
    fn discover_near(&mut self, origin: BlockPos) -> Vec<NearbyStorage<'_>> {
        let radius = i64::from(self.radius);
        let max_distance = radius * radius;

        // Each eligible storage is listed under its primary position: the
        // lower half for a paired double chest, itself otherwise.
        let mut primary_of: BTreeMap<BlockPos, BlockPos> = BTreeMap::new();
        let mut nearest: BTreeMap<BlockPos, i64> = BTreeMap::new();
        for (pos, entry) in &self.storages {
            if !entry.kind.nearby_eligible() {
                continue;
            }
            let primary = self.partner_of(*pos).map_or(*pos, |partner| partner.min(*pos));
            primary_of.insert(*pos, primary);
            let distance = pos.distance_squared(origin);
            nearest
                .entry(primary)
                .and_modify(|best| *best = (*best).min(distance))
                .or_insert(distance);
        }

        let mut groups: BTreeMap<BlockPos, (i64, Vec<&mut dyn Container>)> = nearest
            .into_iter()
            .filter(|(_, distance)| *distance <= max_distance)
            .map(|(primary, distance)| (primary, (distance, Vec::new())))
            .collect();
        for (pos, entry) in self.storages.iter_mut() {
            let group = primary_of.get(pos).and_then(|primary| groups.get_mut(primary));
            if let Some((_, parts)) = group {
                parts.push(&mut entry.inventory);
            }
        }

        let mut found: Vec<(i64, NearbyStorage<'_>)> = groups
            .into_iter()
            .map(|(position, (distance, parts))| {
                (
                    distance,
                    NearbyStorage {
                        position,
                        container: CombinedContainer::new(parts),
                    },
                )
            })
            .collect();

        // Primary positions are unique, so this ordering is total.
        found.sort_by_key(|(distance, storage)| (*distance, storage.position));
        found.into_iter().map(|(_, storage)| storage).collect()
    }
}
