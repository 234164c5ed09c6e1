//! Discovery of storages around the player and the result of quick stacking into them.

use std::collections::BTreeMap;

use stowage_core::{BlockPos, ItemKey};

use crate::container::CombinedContainer;

/// A storage found near an origin, borrowed for the duration of one operation.
///
/// A double chest is one storage: `position` is its lower half and
/// `container` spans both halves.
pub struct NearbyStorage<'a> {
    pub position: BlockPos,
    pub container: CombinedContainer<'a>,
}

/// Source of storages around a point.
///
/// Implementations decide the radius and which storages are eligible. The
/// returned order is the processing order and must be deterministic; a
/// position must not appear twice.
pub trait StorageDiscovery {
    fn discover_near(&mut self, origin: BlockPos) -> Vec<NearbyStorage<'_>>;
}

/// Result of quick stacking into several storages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NearbyOutcome {
    /// True if any stack left the player's inventory.
    pub player_modified: bool,
    /// Storages that received items, in processing order.
    pub modified_storages: Vec<BlockPos>,
    /// Item types moved into each storage, one entry per source slot.
    pub animations: BTreeMap<BlockPos, Vec<ItemKey>>,
}

impl NearbyOutcome {
    /// Build the fly-out animation request for the presentation layer.
    ///
    /// Returns `None` when animations are disabled (`length_ticks == 0`) or
    /// nothing moved.
    pub fn fly_out(&self, origin: BlockPos, length_ticks: u32) -> Option<FlyOutAnimation> {
        if length_ticks == 0 || self.animations.is_empty() {
            return None;
        }
        Some(FlyOutAnimation {
            origin,
            length_ticks,
            targets: self.animations.clone(),
        })
    }
}

/// Items flying from the player towards the storages that received them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyOutAnimation {
    pub origin: BlockPos,
    pub length_ticks: u32,
    pub targets: BTreeMap<BlockPos, Vec<ItemKey>>,
}
