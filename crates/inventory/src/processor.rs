//! Moves single source stacks into one destination container.

use crate::container::Container;
use crate::snapshot::{InventorySnapshot, SnapshotMode};

/// Placement policy bound to one destination container and its snapshot.
///
/// The processor is the only place where source-side counts shrink: a
/// successful [`StackProcessor::try_process`] removes exactly the placed
/// amount from the source slot.
pub struct StackProcessor<'a, C: Container + ?Sized> {
    destination: &'a mut C,
    snapshot: InventorySnapshot,
}

impl<'a, C: Container + ?Sized> StackProcessor<'a, C> {
    /// Bind a processor to a destination and a snapshot built from it.
    pub fn new(destination: &'a mut C, snapshot: InventorySnapshot) -> Self {
        Self {
            destination,
            snapshot,
        }
    }

    /// Processor for quick stacking: compact snapshot, or expanded when
    /// `smart_deposit` is set.
    pub fn quick_stack(destination: &'a mut C, smart_deposit: bool) -> Self {
        let mode = if smart_deposit {
            SnapshotMode::Expanded
        } else {
            SnapshotMode::Compact
        };
        let snapshot = InventorySnapshot::of(&*destination, mode);
        Self::new(destination, snapshot)
    }

    /// Whether new stacks may be started for items already stored in the destination.
    pub fn smart_deposit(&self) -> bool {
        self.snapshot.mode() == SnapshotMode::Expanded
    }

    /// Whether the destination was written to by this processor.
    pub fn was_modified(&self) -> bool {
        self.snapshot.was_modified()
    }

    /// Try to move the stack in `source[slot]` into the destination.
    ///
    /// Returns true iff at least one item moved. Favorited stacks and stacks
    /// the destination refuses are left untouched.
    pub fn try_process<S: Container + ?Sized>(&mut self, source: &mut S, slot: usize) -> bool {
        let Some(stack) = source.get(slot) else {
            return false;
        };
        if stack.favorite || !self.destination.can_insert(stack) {
            return false;
        }

        let moved = self.snapshot.place(&mut *self.destination, stack);
        if moved == 0 {
            return false;
        }

        source.shrink(slot, moved);
        true
    }
}
