//! Canonical stack orderings used by container sorting.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::item::ItemStack;

/// Ordering applied when sorting a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    /// Alphabetical by display name (case-insensitive).
    #[default]
    ItemName,
    /// Largest stacks first.
    ItemCount,
    /// By item key (`namespace:path`).
    ItemId,
}

impl SortType {
    /// All sort types, in cycling order.
    pub const ALL: [SortType; 3] = [SortType::ItemName, SortType::ItemCount, SortType::ItemId];

    /// The sort type that follows this one when cycling through options.
    pub fn next(self) -> Self {
        match self {
            SortType::ItemName => SortType::ItemCount,
            SortType::ItemCount => SortType::ItemId,
            SortType::ItemId => SortType::ItemName,
        }
    }

    /// Compare two stacks under this ordering.
    ///
    /// The order is total: stacks that compare equal are indistinguishable
    /// apart from the favorite marker.
    pub fn compare(self, a: &ItemStack, b: &ItemStack) -> Ordering {
        let primary = match self {
            SortType::ItemName => by_name(a, b),
            SortType::ItemCount => b.count.cmp(&a.count).then_with(|| by_name(a, b)),
            SortType::ItemId => a.item.cmp(&b.item),
        };

        primary
            .then_with(|| a.item.cmp(&b.item))
            .then_with(|| a.components.cmp(&b.components))
            .then_with(|| b.count.cmp(&a.count))
    }

    /// Sort stacks in place. The sort is stable.
    pub fn sort(self, stacks: &mut [ItemStack]) {
        stacks.sort_by(|a, b| self.compare(a, b));
    }
}

fn by_name(a: &ItemStack, b: &ItemStack) -> Ordering {
    let name_a = a.display_name().to_lowercase();
    let name_b = b.display_name().to_lowercase();
    name_a
        .cmp(&name_b)
        .then_with(|| a.display_name().cmp(b.display_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::CUSTOM_NAME_COMPONENT;
    use crate::key::ItemKey;

    fn stack(path: &str, count: u32) -> ItemStack {
        ItemStack::new(ItemKey::parse(path).unwrap(), count)
    }

    #[test]
    fn item_name_sorts_alphabetically() {
        let mut stacks = vec![stack("torch", 4), stack("apple", 1), stack("dirt", 9)];
        SortType::ItemName.sort(&mut stacks);
        let names: Vec<_> = stacks.iter().map(|s| s.item.path().to_string()).collect();
        assert_eq!(names, ["apple", "dirt", "torch"]);
    }

    #[test]
    fn item_name_uses_custom_name() {
        let named = stack("torch", 1).with_component(CUSTOM_NAME_COMPONENT, "Aardvark");
        let mut stacks = vec![stack("apple", 1), named];
        SortType::ItemName.sort(&mut stacks);
        assert_eq!(stacks[0].display_name(), "Aardvark");
    }

    #[test]
    fn item_count_puts_largest_first() {
        let mut stacks = vec![stack("apple", 3), stack("torch", 64), stack("dirt", 10)];
        SortType::ItemCount.sort(&mut stacks);
        let counts: Vec<_> = stacks.iter().map(|s| s.count).collect();
        assert_eq!(counts, [64, 10, 3]);
    }

    #[test]
    fn item_id_orders_by_namespace_first() {
        let mut stacks = vec![stack("minecraft:apple", 1), stack("create:zinc_ingot", 1)];
        SortType::ItemId.sort(&mut stacks);
        assert_eq!(stacks[0].item.namespace(), "create");
    }

    #[test]
    fn same_identity_breaks_ties_by_count() {
        let mut stacks = vec![stack("dirt", 5), stack("dirt", 64)];
        SortType::ItemName.sort(&mut stacks);
        assert_eq!(stacks[0].count, 64);
        assert_eq!(stacks[1].count, 5);
    }

    #[test]
    fn next_cycles_through_all() {
        let mut sort = SortType::default();
        for _ in 0..SortType::ALL.len() {
            sort = sort.next();
        }
        assert_eq!(sort, SortType::default());
    }
}
