//! Storage screen actions and their dispatch.

use serde::{Deserialize, Serialize};
use stowage_core::BlockPos;
use tracing::debug;

use crate::container::{Container, CHEST_SLOT_COUNT};
use crate::error::Result;
use crate::options::TransferOptions;
use crate::rename::{rename_storage, RenameNotice};
use crate::sort::sort_storage_items;
use crate::storages::StorageMap;
use crate::transfer::{deposit_all, loot_all, quick_stack, restock, TransferOutcome};

/// An action offered on a storage screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageAction {
    LootAll,
    DepositAll,
    QuickStack,
    Restock,
    SortItems,
    Rename,
}

const STORAGE_BUTTONS: &[StorageAction] = &[
    StorageAction::LootAll,
    StorageAction::DepositAll,
    StorageAction::QuickStack,
    StorageAction::Restock,
    StorageAction::SortItems,
    StorageAction::Rename,
];

const ENDER_CHEST_BUTTONS: &[StorageAction] = &[
    StorageAction::LootAll,
    StorageAction::DepositAll,
    StorageAction::QuickStack,
    StorageAction::Restock,
    StorageAction::SortItems,
];

impl StorageAction {
    /// Actions shown as buttons on a storage screen. Ender chests cannot be renamed.
    pub fn button_actions(is_ender_chest: bool) -> &'static [StorageAction] {
        if is_ender_chest {
            ENDER_CHEST_BUTTONS
        } else {
            STORAGE_BUTTONS
        }
    }
}

/// Result of [`perform_action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Transfer(TransferOutcome),
    Renamed(Vec<RenameNotice>),
}

/// Run `action` between the player and the storage at `position`.
///
/// Either half of a double chest stands for the whole chest. `rename_to` is
/// only read by [`StorageAction::Rename`]; a missing name clears the custom
/// name.
pub fn perform_action<P: Container + ?Sized>(
    storages: &mut StorageMap,
    position: BlockPos,
    player: &mut P,
    action: StorageAction,
    options: &TransferOptions,
    rename_to: Option<&str>,
) -> Result<ActionOutcome> {
    debug!(?action, %position, "performing storage action");
    let protect = options.hotbar_protection;

    let outcome = match action {
        StorageAction::Rename => {
            let notices = rename_storage(storages, position, rename_to.unwrap_or_default())?;
            return Ok(ActionOutcome::Renamed(notices));
        }
        StorageAction::LootAll => loot_all(player, &mut storages.storage_at(position)?, protect)?,
        StorageAction::DepositAll => {
            deposit_all(player, &mut storages.storage_at(position)?, protect)?
        }
        StorageAction::QuickStack => {
            let smart = options.quick_stack_mode.is_smart_deposit();
            quick_stack(player, &mut storages.storage_at(position)?, protect, smart)?
        }
        StorageAction::Restock => restock(player, &mut storages.storage_at(position)?, protect)?,
        StorageAction::SortItems => {
            sort_storage_items(&mut storages.storage_at(position)?, options.sort_type)
        }
    };
    Ok(ActionOutcome::Transfer(outcome))
}

/// Whether a screen with these non-player containers counts as a storage screen.
///
/// True when one container has at least a chest's worth of slots, or the
/// containers together do.
pub fn is_storage_screen<I>(non_player_sizes: I) -> bool
where
    I: IntoIterator<Item = usize>,
{
    let mut total = 0usize;
    for size in non_player_sizes {
        if size >= CHEST_SLOT_COUNT {
            return true;
        }
        total += size;
    }
    total >= CHEST_SLOT_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Inventory, HOTBAR_SIZE};
    use crate::error::StowageError;
    use crate::options::QuickStackMode;
    use crate::storages::{StorageEntry, StorageKind};
    use stowage_core::{ItemKey, ItemStack, SortType};

    fn stack(path: &str, count: u32) -> ItemStack {
        ItemStack::new(ItemKey::parse(path).unwrap(), count)
    }

    fn setup(kind: StorageKind) -> (StorageMap, BlockPos) {
        let pos = BlockPos::new(2, 64, 2);
        let mut map = StorageMap::default();
        let mut inventory = Inventory::chest();
        inventory.set(0, Some(stack("coal", 10)));
        inventory.set(5, Some(stack("apple", 3)));
        map.insert(pos, StorageEntry::new(inventory, kind, "Chest"));
        (map, pos)
    }

    #[test]
    fn ender_chest_buttons_exclude_rename() {
        assert!(StorageAction::button_actions(false).contains(&StorageAction::Rename));
        assert!(!StorageAction::button_actions(true).contains(&StorageAction::Rename));
        assert_eq!(StorageAction::button_actions(true).len(), 5);
    }

    #[test]
    fn dispatches_transfers_with_player_options() {
        let (mut map, pos) = setup(StorageKind::Block);
        let mut player = Inventory::player();
        player.set(HOTBAR_SIZE, Some(stack("coal", 5)));
        let options = TransferOptions {
            quick_stack_mode: QuickStackMode::SmartDeposit,
            ..TransferOptions::default()
        };

        let outcome =
            perform_action(&mut map, pos, &mut player, StorageAction::QuickStack, &options, None)
                .unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::Transfer(TransferOutcome {
                player_modified: true,
                storage_modified: true
            })
        );
        assert_eq!(map.get(pos).unwrap().inventory.get(0).unwrap().count, 15);
    }

    #[test]
    fn sort_action_uses_configured_order() {
        let (mut map, pos) = setup(StorageKind::Block);
        let mut player = Inventory::player();
        let options = TransferOptions {
            sort_type: SortType::ItemName,
            ..TransferOptions::default()
        };

        perform_action(&mut map, pos, &mut player, StorageAction::SortItems, &options, None)
            .unwrap();

        let storage = &map.get(pos).unwrap().inventory;
        assert_eq!(storage.get(0).unwrap().item.path(), "apple");
        assert_eq!(storage.get(1).unwrap().item.path(), "coal");
    }

    #[test]
    fn rename_goes_through_storage_map() {
        let (mut map, pos) = setup(StorageKind::Block);
        let mut player = Inventory::player();

        let outcome = perform_action(
            &mut map,
            pos,
            &mut player,
            StorageAction::Rename,
            &TransferOptions::default(),
            Some("Fuel"),
        )
        .unwrap();

        assert!(matches!(outcome, ActionOutcome::Renamed(ref notices) if notices.len() == 1));
        assert_eq!(map.get(pos).unwrap().display_name(), "Fuel");
    }

    #[test]
    fn missing_storage_is_reported() {
        let (mut map, _) = setup(StorageKind::Block);
        let mut player = Inventory::player();
        let missing = BlockPos::new(0, 0, 0);
        let err = perform_action(
            &mut map,
            missing,
            &mut player,
            StorageAction::LootAll,
            &TransferOptions::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, StowageError::StorageNotFound(missing));
    }

    #[test]
    fn double_chest_actions_span_both_halves() {
        let lower = BlockPos::new(0, 64, 0);
        let upper = BlockPos::new(0, 64, 1);
        let mut map = StorageMap::default();
        let halves = [
            (lower, upper, vec![Some(stack("stone", 3))]),
            (upper, lower, vec![Some(stack("stone", 4)), Some(stack("apple", 1))]),
        ];
        for (pos, partner, slots) in halves {
            let kind = StorageKind::DoubleChest { partner };
            map.insert(pos, StorageEntry::new(Inventory::from_slots(slots, 0), kind, "Chest"));
        }
        let mut player = Inventory::player();
        let options = TransferOptions::default();

        perform_action(&mut map, lower, &mut player, StorageAction::SortItems, &options, None)
            .unwrap();

        let item = |pos: BlockPos, slot: usize| {
            map.get(pos)
                .and_then(|entry| entry.inventory.get(slot))
                .map(|s| (s.item.path().to_string(), s.count))
        };
        assert_eq!(item(lower, 0), Some(("apple".into(), 1)));
        assert_eq!(item(upper, 0), Some(("stone".into(), 7)));
        assert_eq!(item(upper, 1), None);

        perform_action(&mut map, upper, &mut player, StorageAction::LootAll, &options, None)
            .unwrap();

        assert!(map.iter().all(|(_, entry)| entry.inventory.is_empty()));
        assert_eq!(player.count_item(&ItemKey::parse("stone").unwrap()), 7);
        assert_eq!(player.count_item(&ItemKey::parse("apple").unwrap()), 1);
    }

    #[test]
    fn storage_screen_detection() {
        assert!(is_storage_screen([27]));
        assert!(is_storage_screen([9, 9, 9]));
        assert!(!is_storage_screen([5]));
        assert!(!is_storage_screen(Vec::new()));
        assert!(is_storage_screen([1, 54]));
    }
}
