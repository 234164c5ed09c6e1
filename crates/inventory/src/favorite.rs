//! Favorite markers on player stacks; favorited stacks stay put during bulk transfers.

use tracing::debug;

use crate::container::Container;
use crate::error::{Result, StowageError};

/// Flip the favorite marker of the stack in `player[slot]`.
///
/// Returns the new marker value. Fails without touching the inventory when
/// favoriting is disabled, the slot does not exist or it is empty.
pub fn toggle_favorite<P: Container + ?Sized>(
    player: &mut P,
    slot: usize,
    enabled: bool,
) -> Result<bool> {
    if !enabled {
        return Err(StowageError::FavoritingDisabled);
    }
    let size = player.size();
    if slot >= size {
        return Err(StowageError::SlotOutOfRange { slot, size });
    }
    let stack = player.get_mut(slot).ok_or(StowageError::EmptySlot(slot))?;

    stack.favorite = !stack.favorite;
    let favorite = stack.favorite;
    player.mark_dirty();

    debug!(slot, favorite, "toggled favorite");
    Ok(favorite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Inventory;
    use stowage_core::{ItemKey, ItemStack};

    #[test]
    fn toggles_back_and_forth() {
        let mut player = Inventory::player();
        player.set(3, Some(ItemStack::new(ItemKey::parse("diamond_sword").unwrap(), 1)));

        assert!(toggle_favorite(&mut player, 3, true).unwrap());
        assert!(player.get(3).unwrap().favorite);
        assert!(player.is_dirty());
        assert!(!toggle_favorite(&mut player, 3, true).unwrap());
        assert!(!player.get(3).unwrap().favorite);
    }

    #[test]
    fn rejects_invalid_requests() {
        let mut player = Inventory::player();
        player.set(0, Some(ItemStack::new(ItemKey::parse("stone").unwrap(), 1)));

        assert_eq!(
            toggle_favorite(&mut player, 0, false).unwrap_err(),
            StowageError::FavoritingDisabled
        );
        assert_eq!(
            toggle_favorite(&mut player, 36, true).unwrap_err(),
            StowageError::SlotOutOfRange { slot: 36, size: 36 }
        );
        assert_eq!(
            toggle_favorite(&mut player, 1, true).unwrap_err(),
            StowageError::EmptySlot(1)
        );
        assert!(!player.get(0).unwrap().favorite);
        assert!(!player.is_dirty());
    }
}
