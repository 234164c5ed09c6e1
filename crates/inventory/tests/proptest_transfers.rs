//! Property-based tests for the transfer engine
//!
//! Validates invariants that must hold for any container contents:
//! - Items are neither created nor destroyed by any operation
//! - No slot ever exceeds its stack limit
//! - Favorited player stacks never move
//! - A protected hotbar is never read or written
//! - Sorting twice changes nothing the second time
//! - Restocking never fills an empty player slot

use proptest::prelude::*;
use stowage_core::{BlockPos, ItemKey, ItemStack, SortType};
use stowage_inventory::{
    deposit_all, loot_all, quick_stack, quick_stack_to_nearby_storages, restock, sort_player_items,
    sort_storage_items, Container, Inventory, StorageEntry, StorageKind, StorageMap, HOTBAR_SIZE,
    PLAYER_INVENTORY_SIZE,
};
use stowage_testkit::{check_capacity, tally};

/// Item pool: (key, max stack size).
const ITEMS: [(&str, u32); 5] = [
    ("apple", 64),
    ("cobblestone", 64),
    ("torch", 64),
    ("ender_pearl", 16),
    ("iron_sword", 1),
];

fn item_stack() -> impl Strategy<Value = ItemStack> {
    (0..ITEMS.len(), 1u32..=64, prop::bool::weighted(0.2)).prop_map(|(index, count, named)| {
        let (path, max) = ITEMS[index];
        let key = ItemKey::parse(path).expect("pool keys are valid");
        let stack = ItemStack::new(key, count.min(max)).with_max_stack_size(max);
        if named {
            stack.with_component("custom_name", "Spare")
        } else {
            stack
        }
    })
}

fn storage_slots() -> impl Strategy<Value = Vec<Option<ItemStack>>> {
    prop::collection::vec(prop::option::weighted(0.6, item_stack()), 1..=27)
}

fn player_slots() -> impl Strategy<Value = Vec<Option<ItemStack>>> {
    let slot = prop::option::weighted(
        0.5,
        (item_stack(), prop::bool::weighted(0.15)).prop_map(|(stack, favorite)| {
            if favorite {
                stack.favorited()
            } else {
                stack
            }
        }),
    );
    prop::collection::vec(slot, PLAYER_INVENTORY_SIZE)
}

#[derive(Debug, Clone, Copy)]
enum Op {
    LootAll,
    DepositAll,
    QuickStack,
    SmartQuickStack,
    Restock,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::LootAll),
        Just(Op::DepositAll),
        Just(Op::QuickStack),
        Just(Op::SmartQuickStack),
        Just(Op::Restock),
    ]
}

fn run(op: Op, player: &mut Inventory, storage: &mut Inventory, protect: bool) {
    let result = match op {
        Op::LootAll => loot_all(player, storage, protect),
        Op::DepositAll => deposit_all(player, storage, protect),
        Op::QuickStack => quick_stack(player, storage, protect, false),
        Op::SmartQuickStack => quick_stack(player, storage, protect, true),
        Op::Restock => restock(player, storage, protect),
    };
    result.expect("well-formed player inventory");
}

proptest! {
    /// Property: every transfer conserves items and respects stack limits
    #[test]
    fn transfers_conserve_items(
        player_slots in player_slots(),
        storage_slots in storage_slots(),
        op in op(),
        protect in any::<bool>(),
    ) {
        let mut player = Inventory::from_slots(player_slots, HOTBAR_SIZE);
        let mut storage = Inventory::from_slots(storage_slots, 0);
        let before = tally(&[&player, &storage]);

        run(op, &mut player, &mut storage, protect);

        prop_assert_eq!(tally(&[&player, &storage]), before, "{:?} changed item totals", op);
        prop_assert!(check_capacity(&player).is_ok());
        prop_assert!(check_capacity(&storage).is_ok());
    }

    /// Property: favorited player stacks stay exactly where they are
    #[test]
    fn favorites_never_move(
        player_slots in player_slots(),
        storage_slots in storage_slots(),
        op in op(),
        protect in any::<bool>(),
    ) {
        let mut player = Inventory::from_slots(player_slots, HOTBAR_SIZE);
        let mut storage = Inventory::from_slots(storage_slots, 0);
        let favorites: Vec<(usize, ItemStack)> = (0..player.size())
            .filter_map(|slot| player.get(slot).filter(|s| s.favorite).map(|s| (slot, s.clone())))
            .collect();

        // Looting and restocking may still top up a favorited stack.
        run(op, &mut player, &mut storage, protect);

        for (slot, stack) in favorites {
            let now = player.get(slot);
            prop_assert!(now.is_some_and(|s| s.favorite && s.identity() == stack.identity()));
            prop_assert!(now.is_some_and(|s| s.count >= stack.count));
            if matches!(op, Op::DepositAll | Op::QuickStack | Op::SmartQuickStack) {
                prop_assert_eq!(now, Some(&stack));
            }
        }
    }

    /// Property: with hotbar protection, hotbar slots are untouched
    #[test]
    fn protected_hotbar_is_untouched(
        player_slots in player_slots(),
        storage_slots in storage_slots(),
        op in op(),
    ) {
        let mut player = Inventory::from_slots(player_slots, HOTBAR_SIZE);
        let mut storage = Inventory::from_slots(storage_slots, 0);
        let hotbar: Vec<Option<ItemStack>> = player.slots()[..HOTBAR_SIZE].to_vec();

        run(op, &mut player, &mut storage, true);

        prop_assert_eq!(&player.slots()[..HOTBAR_SIZE], hotbar.as_slice());
    }

    /// Property: restocking never starts a new stack in the player's inventory
    #[test]
    fn restock_never_fills_empty_slots(
        player_slots in player_slots(),
        storage_slots in storage_slots(),
        protect in any::<bool>(),
    ) {
        let mut player = Inventory::from_slots(player_slots, HOTBAR_SIZE);
        let mut storage = Inventory::from_slots(storage_slots, 0);
        let occupied: Vec<bool> = player.slots().iter().map(Option::is_some).collect();

        restock(&mut player, &mut storage, protect).expect("well-formed player inventory");

        let now: Vec<bool> = player.slots().iter().map(Option::is_some).collect();
        prop_assert_eq!(now, occupied);
    }

    /// Property: sorting is idempotent and conserves items
    #[test]
    fn storage_sort_is_idempotent(
        storage_slots in storage_slots(),
        sort_type in prop_oneof![
            Just(SortType::ItemName),
            Just(SortType::ItemCount),
            Just(SortType::ItemId),
        ],
    ) {
        let mut storage = Inventory::from_slots(storage_slots, 0);
        let before = tally(&[&storage]);

        sort_storage_items(&mut storage, sort_type);
        let once = storage.clone();
        let second = sort_storage_items(&mut storage, sort_type);

        prop_assert!(!second.storage_modified);
        prop_assert_eq!(&storage, &once);
        prop_assert_eq!(tally(&[&storage]), before);
        prop_assert!(check_capacity(&storage).is_ok());
    }

    /// Property: player sorting is idempotent and keeps favorites in place
    #[test]
    fn player_sort_is_idempotent(
        player_slots in player_slots(),
        protect in any::<bool>(),
    ) {
        let mut player = Inventory::from_slots(player_slots, HOTBAR_SIZE);
        let before = tally(&[&player]);
        let favorites: Vec<(usize, ItemStack)> = (0..player.size())
            .filter_map(|slot| player.get(slot).filter(|s| s.favorite).map(|s| (slot, s.clone())))
            .collect();

        sort_player_items(&mut player, SortType::ItemName, protect).expect("sort succeeds");
        let once = player.clone();
        let second =
            sort_player_items(&mut player, SortType::ItemName, protect).expect("sort succeeds");

        prop_assert!(!second.player_modified);
        prop_assert_eq!(&player, &once);
        prop_assert_eq!(tally(&[&player]), before);
        for (slot, stack) in favorites {
            prop_assert_eq!(player.get(slot), Some(&stack));
        }
    }

    /// Property: nearby quick stacking conserves items across all storages
    #[test]
    fn nearby_quick_stack_conserves_items(
        player_slots in player_slots(),
        storages in prop::collection::vec(storage_slots(), 1..5),
        smart in any::<bool>(),
    ) {
        let mut player = Inventory::from_slots(player_slots, HOTBAR_SIZE);
        let mut map = StorageMap::new(8);
        for (i, slots) in storages.into_iter().enumerate() {
            map.insert(
                BlockPos::new(i as i32, 64, 0),
                StorageEntry::new(Inventory::from_slots(slots, 0), StorageKind::Block, "Chest"),
            );
        }
        let totals = |player: &Inventory, map: &StorageMap| {
            let mut all = vec![player];
            all.extend(map.iter().map(|(_, entry)| &entry.inventory));
            tally(&all)
        };
        let before = totals(&player, &map);

        let origin = BlockPos::new(0, 64, 0);
        let outcome = quick_stack_to_nearby_storages(&mut player, &mut map, origin, true, smart)
            .expect("no duplicate storages");

        prop_assert_eq!(totals(&player, &map), before);
        prop_assert_eq!(outcome.player_modified, player.is_dirty());
        for pos in &outcome.modified_storages {
            prop_assert!(map.get(*pos).is_some_and(|entry| entry.inventory.is_dirty()));
        }
    }
}
