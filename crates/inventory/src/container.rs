//! Slot containers for player and storage inventories.
//!
//! [`Container`] is the seam the transfer engine works against; [`Inventory`]
//! is the in-memory implementation used for chests, barrels, vehicles and the
//! player's main inventory. [`CombinedContainer`] joins several containers,
//! such as the two halves of a double chest, into one slot sequence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use stowage_core::{ItemKey, ItemStack};

/// Number of hotbar slots at the start of the player's main inventory.
pub const HOTBAR_SIZE: usize = 9;

/// Number of slots in the player's main inventory (hotbar included).
pub const PLAYER_INVENTORY_SIZE: usize = 36;

/// Number of slots in a single chest inventory (3 rows × 9 columns).
pub const CHEST_SLOT_COUNT: usize = 27;

/// A fixed-size, indexable sequence of item slots.
///
/// Implementations must keep `size()` constant for the duration of any
/// engine call.
pub trait Container {
    /// Returns the number of slots in this container.
    fn size(&self) -> usize;

    /// Gets the stack in the given slot, `None` if empty or out of range.
    fn get(&self, slot: usize) -> Option<&ItemStack>;

    /// Gets a mutable reference to the stack in the given slot.
    fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack>;

    /// Replaces the contents of the given slot.
    fn set(&mut self, slot: usize, stack: Option<ItemStack>);

    /// Called once after an operation changed the container's contents.
    fn mark_dirty(&mut self);

    /// Length of the protected hotbar sub-range starting at slot 0.
    /// Non-player containers have none.
    fn hotbar_size(&self) -> usize {
        0
    }

    /// Whether this container accepts the given stack at all.
    fn can_insert(&self, _stack: &ItemStack) -> bool {
        true
    }

    /// Takes the stack out of a slot, leaving it empty.
    fn take(&mut self, slot: usize) -> Option<ItemStack> {
        let stack = self.get(slot).cloned();
        if stack.is_some() {
            self.set(slot, None);
        }
        stack
    }

    /// Removes up to `amount` items from a slot, clearing it when it runs out.
    /// Returns the number of items actually removed.
    fn shrink(&mut self, slot: usize, amount: u32) -> u32 {
        let Some(stack) = self.get_mut(slot) else {
            return 0;
        };
        let removed = stack.remove(amount);
        if stack.count == 0 {
            self.set(slot, None);
        }
        removed
    }
}

/// Acceptance rule applied to every stack entering a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotFilter {
    /// Only the listed items may enter (e.g. a fuel-only slot).
    Only(BTreeSet<ItemKey>),
    /// Everything but the listed items may enter (e.g. no shulker boxes in shulker boxes).
    Deny(BTreeSet<ItemKey>),
}

impl SlotFilter {
    /// Check whether a stack passes the filter.
    pub fn accepts(&self, stack: &ItemStack) -> bool {
        match self {
            SlotFilter::Only(items) => items.contains(&stack.item),
            SlotFilter::Deny(items) => !items.contains(&stack.item),
        }
    }
}

/// Player or storage inventory with a fixed number of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    #[serde(default)]
    hotbar_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<SlotFilter>,
    #[serde(skip)]
    dirty: bool,
}

impl Inventory {
    /// Create an empty storage inventory with `size` slots.
    pub fn with_size(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            hotbar_size: 0,
            filter: None,
            dirty: false,
        }
    }

    /// Create an empty single-chest inventory.
    pub fn chest() -> Self {
        Self::with_size(CHEST_SLOT_COUNT)
    }

    /// Create an empty player main inventory (36 slots, 9 of them hotbar).
    pub fn player() -> Self {
        Self {
            hotbar_size: HOTBAR_SIZE,
            ..Self::with_size(PLAYER_INVENTORY_SIZE)
        }
    }

    /// Build an inventory from explicit slot contents.
    pub fn from_slots(slots: Vec<Option<ItemStack>>, hotbar_size: usize) -> Self {
        Self {
            slots,
            hotbar_size,
            filter: None,
            dirty: false,
        }
    }

    /// Restrict which stacks this inventory accepts.
    pub fn with_filter(mut self, filter: SlotFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Read-only view of all slots.
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Whether [`Container::mark_dirty`] was called since the last [`Inventory::clear_dirty`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reset the dirty flag, typically after persisting.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Count the items of a given type across all slots, regardless of components.
    pub fn count_item(&self, item: &ItemKey) -> u64 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| &stack.item == item)
            .map(|stack| u64::from(stack.count))
            .sum()
    }

    /// Get the number of empty slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Check if the inventory is completely empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

}

impl Container for Inventory {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = stack;
        }
    }

    fn take(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn hotbar_size(&self) -> usize {
        self.hotbar_size
    }

    fn can_insert(&self, stack: &ItemStack) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter.accepts(stack))
    }
}

/// Several containers addressed as one; slots are numbered part after part.
pub struct CombinedContainer<'a> {
    parts: Vec<&'a mut dyn Container>,
}

impl<'a> CombinedContainer<'a> {
    pub fn new(parts: Vec<&'a mut dyn Container>) -> Self {
        Self { parts }
    }

    pub fn single(part: &'a mut dyn Container) -> Self {
        Self::new(vec![part])
    }

    /// Number of joined containers.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Map a combined slot to (part, slot within that part).
    fn locate(&self, slot: usize) -> Option<(usize, usize)> {
        let mut local = slot;
        for (index, part) in self.parts.iter().enumerate() {
            let size = part.size();
            if local < size {
                return Some((index, local));
            }
            local -= size;
        }
        None
    }
}

impl Container for CombinedContainer<'_> {
    fn size(&self) -> usize {
        self.parts.iter().map(|part| part.size()).sum()
    }

    fn get(&self, slot: usize) -> Option<&ItemStack> {
        let (part, local) = self.locate(slot)?;
        self.parts[part].get(local)
    }

    fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        let (part, local) = self.locate(slot)?;
        self.parts[part].get_mut(local)
    }

    fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        if let Some((part, local)) = self.locate(slot) {
            self.parts[part].set(local, stack);
        }
    }

    fn take(&mut self, slot: usize) -> Option<ItemStack> {
        let (part, local) = self.locate(slot)?;
        self.parts[part].take(local)
    }

    /// Marks every part; a double chest changes as a whole.
    fn mark_dirty(&mut self) {
        for part in &mut self.parts {
            part.mark_dirty();
        }
    }

    fn can_insert(&self, stack: &ItemStack) -> bool {
        self.parts.iter().all(|part| part.can_insert(stack))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &str) -> ItemKey {
        ItemKey::parse(path).unwrap()
    }

    fn stack(path: &str, count: u32) -> ItemStack {
        ItemStack::new(key(path), count)
    }

    #[test]
    fn player_inventory_has_hotbar() {
        let inv = Inventory::player();
        assert_eq!(inv.size(), PLAYER_INVENTORY_SIZE);
        assert_eq!(inv.hotbar_size(), HOTBAR_SIZE);
        assert_eq!(Inventory::chest().hotbar_size(), 0);
    }

    #[test]
    fn shrink_clears_exhausted_slot() {
        let mut inv = Inventory::with_size(2);
        inv.set(0, Some(stack("torch", 5)));
        assert_eq!(inv.shrink(0, 2), 2);
        assert_eq!(inv.get(0).unwrap().count, 3);
        assert_eq!(inv.shrink(0, 10), 3);
        assert!(inv.get(0).is_none());
        assert_eq!(inv.shrink(1, 1), 0);
    }

    #[test]
    fn out_of_range_access_is_inert() {
        let mut inv = Inventory::with_size(1);
        assert!(inv.get(5).is_none());
        inv.set(5, Some(stack("stone", 1)));
        assert!(inv.is_empty());
        assert!(inv.take(5).is_none());
    }

    #[test]
    fn filter_limits_insertion() {
        let only_fuel = Inventory::with_size(1)
            .with_filter(SlotFilter::Only([key("coal")].into_iter().collect()));
        assert!(only_fuel.can_insert(&stack("coal", 1)));
        assert!(!only_fuel.can_insert(&stack("stone", 1)));

        let no_boxes = Inventory::with_size(1)
            .with_filter(SlotFilter::Deny([key("shulker_box")].into_iter().collect()));
        assert!(!no_boxes.can_insert(&stack("shulker_box", 1)));
        assert!(no_boxes.can_insert(&stack("stone", 1)));
    }

    #[test]
    fn count_item_ignores_components() {
        let mut inv = Inventory::with_size(6);
        inv.set(4, Some(stack("diamond", 2)));
        inv.set(5, Some(stack("diamond", 3).with_component("custom_name", "Shiny")));
        assert_eq!(inv.count_item(&key("diamond")), 5);
        assert_eq!(inv.count_item(&key("emerald")), 0);
        assert_eq!(inv.empty_slots(), 4);
    }

    #[test]
    fn dirty_flag_round_trip() {
        let mut inv = Inventory::chest();
        assert!(!inv.is_dirty());
        inv.mark_dirty();
        assert!(inv.is_dirty());
        inv.clear_dirty();
        assert!(!inv.is_dirty());
    }

    #[test]
    fn combined_slots_run_part_after_part() {
        let mut lower = Inventory::with_size(2);
        let mut upper = Inventory::with_size(3);
        upper.set(0, Some(stack("stone", 4)));

        let mut combined =
            CombinedContainer::new(vec![&mut lower as &mut dyn Container, &mut upper]);
        assert_eq!(combined.size(), 5);
        assert_eq!(combined.part_count(), 2);
        assert_eq!(combined.get(2).map(|s| s.count), Some(4));

        combined.set(1, Some(stack("apple", 1)));
        combined.set(4, Some(stack("dirt", 2)));
        combined.set(5, Some(stack("sand", 1)));
        assert_eq!(combined.shrink(2, 1), 1);
        assert_eq!(combined.take(4).map(|s| s.count), Some(2));
        combined.mark_dirty();

        assert_eq!(lower.get(1).unwrap().item.path(), "apple");
        assert_eq!(upper.get(0).unwrap().count, 3);
        assert!(upper.get(2).is_none());
        assert!(lower.is_dirty() && upper.is_dirty());
    }

    #[test]
    fn combined_insertion_needs_every_part() {
        let mut open = Inventory::with_size(1);
        let mut no_boxes = Inventory::with_size(1)
            .with_filter(SlotFilter::Deny([key("shulker_box")].into_iter().collect()));
        let combined = CombinedContainer::new(vec![&mut open as &mut dyn Container, &mut no_boxes]);
        assert!(combined.can_insert(&stack("stone", 1)));
        assert!(!combined.can_insert(&stack("shulker_box", 1)));
    }
}
