//! Bulk transfer operations between the player and storages.
//!
//! Every operation builds its snapshot up front, moves stacks slot by slot
//! in ascending order, and marks both sides dirty only when something moved.
//! Stacks that do not fit stay where they are; that is not an error.

use std::collections::BTreeSet;
use std::ops::Range;

use stowage_core::BlockPos;
use tracing::debug;

use crate::container::Container;
use crate::error::{Result, StowageError};
use crate::nearby::{NearbyOutcome, StorageDiscovery};
use crate::processor::StackProcessor;
use crate::snapshot::{InventorySnapshot, SnapshotMode};
use serde::Serialize;

/// Which sides of an operation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    /// The player's inventory changed and was marked dirty.
    pub player_modified: bool,
    /// The storage changed and was marked dirty.
    pub storage_modified: bool,
}

impl TransferOutcome {
    fn both(modified: bool) -> Self {
        Self {
            player_modified: modified,
            storage_modified: modified,
        }
    }

    /// Whether anything changed at all.
    pub fn any(&self) -> bool {
        self.player_modified || self.storage_modified
    }
}

/// Slots of the player's inventory an operation may touch.
pub(crate) fn player_range<P: Container + ?Sized>(
    player: &P,
    hotbar_protection: bool,
) -> Result<Range<usize>> {
    let hotbar = player.hotbar_size();
    let size = player.size();
    if size < hotbar {
        return Err(StowageError::ContainerTooSmall {
            required: hotbar,
            actual: size,
        });
    }
    Ok(if hotbar_protection { hotbar..size } else { 0..size })
}

/// Place `source[slot]` into `destination` through `state`, shrinking the source.
fn transfer_stack<D, S>(
    destination: &mut D,
    state: &mut InventorySnapshot,
    source: &mut S,
    slot: usize,
) -> bool
where
    D: Container + ?Sized,
    S: Container + ?Sized,
{
    let Some(stack) = source.get(slot) else {
        return false;
    };
    let moved = state.place(destination, stack);
    if moved == 0 {
        return false;
    }
    source.shrink(slot, moved);
    true
}

fn finish<P, S>(player: &mut P, storage: &mut S, modified: bool) -> TransferOutcome
where
    P: Container + ?Sized,
    S: Container + ?Sized,
{
    if modified {
        player.mark_dirty();
        storage.mark_dirty();
    }
    TransferOutcome::both(modified)
}

/// Move everything from the storage into the player's inventory.
///
/// Storage slots are visited in ascending order; slots that only partly fit
/// keep their remainder.
pub fn loot_all<P, S>(
    player: &mut P,
    storage: &mut S,
    hotbar_protection: bool,
) -> Result<TransferOutcome>
where
    P: Container + ?Sized,
    S: Container + ?Sized,
{
    let range = player_range(&*player, hotbar_protection)?;
    let mut state = InventorySnapshot::build(&*player, range, SnapshotMode::Complete);

    let mut moved_slots = 0usize;
    for slot in 0..storage.size() {
        if transfer_stack(player, &mut state, storage, slot) {
            moved_slots += 1;
        }
    }

    debug!(moved_slots, "loot all finished");
    Ok(finish(player, storage, state.was_modified()))
}

/// Move every non-favorited stack from the player into the storage.
///
/// The main inventory is emptied first; the hotbar follows unless protected.
pub fn deposit_all<P, S>(
    player: &mut P,
    storage: &mut S,
    hotbar_protection: bool,
) -> Result<TransferOutcome>
where
    P: Container + ?Sized,
    S: Container + ?Sized,
{
    let full = player_range(&*player, false)?;
    let hotbar = player.hotbar_size();
    let mut state = InventorySnapshot::of(&*storage, SnapshotMode::Complete);

    let hotbar_slots = if hotbar_protection { 0..0 } else { 0..hotbar };
    let mut moved_slots = 0usize;
    for slot in (hotbar..full.end).chain(hotbar_slots) {
        let Some(stack) = player.get(slot) else {
            continue;
        };
        if stack.favorite || !storage.can_insert(stack) {
            continue;
        }
        if transfer_stack(storage, &mut state, player, slot) {
            moved_slots += 1;
        }
    }

    debug!(moved_slots, "deposit all finished");
    Ok(finish(player, storage, state.was_modified()))
}

/// Top up the storage's existing stacks from the player's inventory.
///
/// With `smart_deposit`, items the storage already holds may also start new
/// stacks in its empty slots.
pub fn quick_stack<P, S>(
    player: &mut P,
    storage: &mut S,
    hotbar_protection: bool,
    smart_deposit: bool,
) -> Result<TransferOutcome>
where
    P: Container + ?Sized,
    S: Container + ?Sized,
{
    let range = player_range(&*player, hotbar_protection)?;
    let mut processor = StackProcessor::quick_stack(storage, smart_deposit);

    for slot in range {
        processor.try_process(player, slot);
    }

    let modified = processor.was_modified();
    debug!(modified, smart_deposit, "quick stack finished");
    Ok(finish(player, storage, modified))
}

/// Top up the player's existing non-full stacks from the storage.
///
/// Never starts a new stack in the player's inventory. The player snapshot
/// is taken once; a stack that fills up stops being a target for later
/// storage slots.
pub fn restock<P, S>(
    player: &mut P,
    storage: &mut S,
    hotbar_protection: bool,
) -> Result<TransferOutcome>
where
    P: Container + ?Sized,
    S: Container + ?Sized,
{
    let range = player_range(&*player, hotbar_protection)?;
    let mut state = InventorySnapshot::build(&*player, range, SnapshotMode::Compact);

    for slot in 0..storage.size() {
        let Some(stack) = storage.get(slot) else {
            continue;
        };
        if !state.has_non_full(&stack.identity()) {
            continue;
        }
        transfer_stack(player, &mut state, storage, slot);
    }

    debug!(modified = state.was_modified(), "restock finished");
    Ok(finish(player, storage, state.was_modified()))
}

/// Quick stack into every storage the discovery returns, in its order.
///
/// The player's inventory is marked dirty at most once, after all storages
/// were processed. Fails before touching anything when the discovery lists
/// a position twice.
pub fn quick_stack_to_nearby_storages<P, D>(
    player: &mut P,
    discovery: &mut D,
    origin: BlockPos,
    hotbar_protection: bool,
    smart_deposit: bool,
) -> Result<NearbyOutcome>
where
    P: Container + ?Sized,
    D: StorageDiscovery + ?Sized,
{
    let range = player_range(&*player, hotbar_protection)?;
    let mut storages = discovery.discover_near(origin);

    let mut seen = BTreeSet::new();
    for storage in &storages {
        if !seen.insert(storage.position) {
            return Err(StowageError::DuplicateStorage(storage.position));
        }
    }

    let mut outcome = NearbyOutcome::default();
    for nearby in &mut storages {
        let mut processor = StackProcessor::quick_stack(&mut nearby.container, smart_deposit);

        for slot in range.clone() {
            let Some(item) = player.get(slot).map(|stack| stack.item.clone()) else {
                continue;
            };
            if processor.try_process(player, slot) {
                outcome.animations.entry(nearby.position).or_default().push(item);
            }
        }

        if processor.was_modified() {
            nearby.container.mark_dirty();
            outcome.modified_storages.push(nearby.position);
            outcome.player_modified = true;
        }
    }

    if outcome.player_modified {
        player.mark_dirty();
    }

    debug!(
        storages = storages.len(),
        modified = outcome.modified_storages.len(),
        "quick stack to nearby storages finished"
    );
    Ok(outcome)
}
