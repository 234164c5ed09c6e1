//! Container sorting: gather, merge to full stacks, order, refill.

use std::collections::BTreeMap;
use std::ops::Range;

use stowage_core::{ItemStack, SortType, StackIdentity};
use tracing::{debug, warn};

use crate::container::Container;
use crate::error::Result;
use crate::transfer::{player_range, TransferOutcome};

/// Merge every stack in `range` by identity and return the sorted, maximally
/// packed result. The container is not touched.
///
/// With `keep_favorites`, favorited stacks are left out. Merged stacks take
/// the largest stack limit seen for their identity, so well-formed input
/// never needs more slots than it occupied.
pub fn combine_and_sort<C: Container + ?Sized>(
    container: &C,
    range: Range<usize>,
    sort_type: SortType,
    keep_favorites: bool,
) -> Vec<ItemStack> {
    let mut order: BTreeMap<StackIdentity, usize> = BTreeMap::new();
    let mut merged: Vec<(ItemStack, u64)> = Vec::new();

    for slot in range {
        let Some(stack) = container.get(slot) else {
            continue;
        };
        if keep_favorites && stack.favorite {
            continue;
        }
        let index = *order.entry(stack.identity()).or_insert_with(|| {
            merged.push((stack.copy_with_count(0), 0));
            merged.len() - 1
        });
        let (template, total) = &mut merged[index];
        template.max_stack_size = template.max_stack_size.max(stack.max_stack_size);
        *total += u64::from(stack.count);
    }

    let mut stacks = Vec::new();
    for (template, mut total) in merged {
        let max = u64::from(template.max_stack_size.max(1));
        while total > 0 {
            let count = total.min(max);
            // `count` never exceeds a u32 max stack size.
            stacks.push(template.copy_with_count(count as u32));
            total -= count;
        }
    }

    sort_type.sort(&mut stacks);
    stacks
}

fn snapshot_slots<C: Container + ?Sized>(container: &C) -> Vec<Option<ItemStack>> {
    (0..container.size()).map(|slot| container.get(slot).cloned()).collect()
}

/// Write `stacks` into `slots` in order; slots left over end empty.
fn refill<C: Container + ?Sized>(container: &mut C, slots: &[usize], stacks: Vec<ItemStack>) {
    let mut stacks = stacks.into_iter();
    for slot in slots {
        container.set(*slot, stacks.next());
    }
}

/// Sort a storage container in place.
///
/// Sorted stacks fill the container from slot 0; the remaining slots end
/// empty. Reports modified only when the arrangement actually changed. When
/// the merged stacks would not fit (overfull input), the storage is left
/// as it was.
pub fn sort_storage_items<S: Container + ?Sized>(
    storage: &mut S,
    sort_type: SortType,
) -> TransferOutcome {
    let size = storage.size();
    let stacks = combine_and_sort(&*storage, 0..size, sort_type, false);
    if stacks.len() > size {
        warn!(needed = stacks.len(), size, "sorted stacks do not fit, storage left unsorted");
        return TransferOutcome::default();
    }

    let before = snapshot_slots(&*storage);
    let slots: Vec<usize> = (0..size).collect();
    refill(storage, &slots, stacks);

    let modified = snapshot_slots(&*storage) != before;
    if modified {
        storage.mark_dirty();
    }
    debug!(?sort_type, modified, "sorted storage");
    TransferOutcome {
        player_modified: false,
        storage_modified: modified,
    }
}

/// Sort the player's inventory in place.
///
/// Favorited stacks keep their slots. Sorted stacks go into the free slots
/// of the main inventory first and overflow into the hotbar only when it is
/// not protected. Like storage sorting, nothing moves when the result would
/// not fit.
pub fn sort_player_items<P: Container + ?Sized>(
    player: &mut P,
    sort_type: SortType,
    hotbar_protection: bool,
) -> Result<TransferOutcome> {
    let range = player_range(&*player, hotbar_protection)?;
    let hotbar = player.hotbar_size();
    let stacks = combine_and_sort(&*player, range.clone(), sort_type, true);

    let main = hotbar.max(range.start)..range.end;
    let overflow = range.start..hotbar.max(range.start);
    let free: Vec<usize> = main
        .chain(overflow)
        .filter(|slot| !player.get(*slot).is_some_and(|stack| stack.favorite))
        .collect();
    if stacks.len() > free.len() {
        warn!(
            needed = stacks.len(),
            free = free.len(),
            "sorted stacks do not fit, player left unsorted"
        );
        return Ok(TransferOutcome::default());
    }

    let before = snapshot_slots(&*player);
    refill(player, &free, stacks);

    let modified = snapshot_slots(&*player) != before;
    if modified {
        player.mark_dirty();
    }
    debug!(?sort_type, modified, hotbar_protection, "sorted player inventory");
    Ok(TransferOutcome {
        player_modified: modified,
        storage_modified: false,
    })
}
