//! Per-operation slot index over a destination container.
//!
//! An [`InventorySnapshot`] is built once at the start of an engine call,
//! mutated in place while stacks are placed, and dropped at the end. Slot
//! indices captured at build time stay valid because nothing else touches
//! the container in between.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::Range;

use stowage_core::{ItemKey, ItemStack, StackIdentity};

use crate::container::Container;

/// Placement policy of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Merge into existing stacks, then fill empty slots with anything.
    Complete,
    /// Merge into existing non-full stacks only; empty slots are never used.
    Compact,
    /// Like `Complete`, but only items already stored somewhere in the
    /// container may start a new stack in an empty slot.
    Expanded,
}

impl SnapshotMode {
    /// Whether the snapshot keeps a pool of empty slots.
    pub fn tracks_empty_slots(self) -> bool {
        !matches!(self, SnapshotMode::Compact)
    }
}

/// Index of merge targets and empty slots for one container.
#[derive(Debug, Clone)]
pub struct InventorySnapshot {
    mode: SnapshotMode,
    /// Non-full slots per identity, ascending slot order.
    non_full: BTreeMap<StackIdentity, VecDeque<usize>>,
    /// Empty slots, ascending, consumed from the front.
    empty: VecDeque<usize>,
    /// Item types present anywhere in the scanned range (smart deposit).
    stored_items: BTreeSet<ItemKey>,
    modified: bool,
}

impl InventorySnapshot {
    /// Scan `range` of `container` once and classify every slot.
    pub fn build<C: Container + ?Sized>(
        container: &C,
        range: Range<usize>,
        mode: SnapshotMode,
    ) -> Self {
        let mut snapshot = Self {
            mode,
            non_full: BTreeMap::new(),
            empty: VecDeque::new(),
            stored_items: BTreeSet::new(),
            modified: false,
        };

        for slot in range {
            match container.get(slot) {
                None => {
                    if mode.tracks_empty_slots() {
                        snapshot.empty.push_back(slot);
                    }
                }
                Some(stack) => {
                    snapshot.stored_items.insert(stack.item.clone());
                    if !stack.is_full() {
                        snapshot
                            .non_full
                            .entry(stack.identity())
                            .or_default()
                            .push_back(slot);
                    }
                }
            }
        }

        snapshot
    }

    /// Snapshot of a whole container.
    pub fn of<C: Container + ?Sized>(container: &C, mode: SnapshotMode) -> Self {
        Self::build(container, 0..container.size(), mode)
    }

    /// Placement policy of this snapshot.
    pub fn mode(&self) -> SnapshotMode {
        self.mode
    }

    /// Whether any slot was written through this snapshot.
    pub fn was_modified(&self) -> bool {
        self.modified
    }

    /// Whether at least one non-full stack of `identity` can still be topped up.
    pub fn has_non_full(&self, identity: &StackIdentity) -> bool {
        self.non_full.contains_key(identity)
    }

    /// Number of empty slots still available.
    pub fn empty_slot_count(&self) -> usize {
        self.empty.len()
    }

    /// Whether a stack of this identity may start a new stack in an empty slot.
    pub fn can_start_stack(&self, identity: &StackIdentity) -> bool {
        match self.mode {
            SnapshotMode::Complete => true,
            SnapshotMode::Compact => false,
            SnapshotMode::Expanded => self.stored_items.contains(identity.item()),
        }
    }

    /// Deposit as much of `incoming` as possible into `container`.
    ///
    /// Existing non-full stacks of the same identity are topped up first, in
    /// ascending slot order; then, if the policy allows it, empty slots are
    /// filled, splitting at the max stack size. Returns the number of items
    /// placed. The caller owns `incoming` and removes the placed amount from
    /// wherever it came from.
    pub fn place<C: Container + ?Sized>(&mut self, container: &mut C, incoming: &ItemStack) -> u32 {
        let identity = incoming.identity();
        let mut remaining = incoming.count;

        if let Some(slots) = self.non_full.get_mut(&identity) {
            while remaining > 0 {
                let Some(&slot) = slots.front() else {
                    break;
                };
                let Some(existing) = container.get_mut(slot) else {
                    // Slot emptied behind our back; forget it.
                    slots.pop_front();
                    continue;
                };
                remaining = existing.add(remaining);
                if existing.is_full() {
                    slots.pop_front();
                }
            }
            if slots.is_empty() {
                self.non_full.remove(&identity);
            }
        }

        if remaining > 0 && self.can_start_stack(&identity) {
            while remaining > 0 {
                let Some(slot) = self.empty.pop_front() else {
                    break;
                };
                let placed = remaining.min(incoming.max_stack_size);
                container.set(slot, Some(incoming.copy_with_count(placed)));
                remaining -= placed;
                if placed < incoming.max_stack_size {
                    self.non_full.entry(identity.clone()).or_default().push_back(slot);
                }
            }
            self.stored_items.insert(identity.item().clone());
        }

        let moved = incoming.count - remaining;
        if moved > 0 {
            self.modified = true;
        }
        moved
    }
}
