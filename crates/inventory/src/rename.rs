//! Custom names for storages.

use serde::Serialize;
use stowage_core::BlockPos;
use tracing::debug;

use crate::container::Container;
use crate::error::{Result, StowageError};
use crate::storages::{StorageKind, StorageMap};

/// Tells nearby clients that the storage block at `position` changed its name.
///
/// `name` is empty when the custom name was cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameNotice {
    pub position: BlockPos,
    pub name: String,
}

/// Prefix of the combined default name of a double chest.
const DOUBLE_CHEST_PREFIX: &str = "Large ";

fn custom_name(new_name: &str, default_name: &str) -> Option<String> {
    if new_name.is_empty() || new_name == default_name {
        None
    } else {
        Some(new_name.to_string())
    }
}

/// Rename the storage at `position`.
///
/// An empty name, or the storage's default name, clears the custom name.
/// Both halves of a double chest are renamed together. Returns one notice
/// per renamed block; entity storages produce none.
pub fn rename_storage(
    map: &mut StorageMap,
    position: BlockPos,
    new_name: &str,
) -> Result<Vec<RenameNotice>> {
    let entry = map
        .get(position)
        .ok_or(StowageError::StorageNotFound(position))?;

    let positions = match entry.kind {
        StorageKind::Block | StorageKind::Vehicle => vec![position],
        StorageKind::DoubleChest { .. } => {
            let partner = map
                .partner_of(position)
                .ok_or(StowageError::UnsupportedStorage(position))?;
            let mut halves = vec![position, partner];
            halves.sort();
            halves
        }
        StorageKind::EnderChest => return Err(StowageError::UnsupportedStorage(position)),
    };

    let mut notices = Vec::new();
    for pos in positions {
        let Some(half) = map.get_mut(pos) else {
            continue;
        };
        let default_name = match half.kind {
            StorageKind::DoubleChest { .. } => {
                format!("{DOUBLE_CHEST_PREFIX}{}", half.default_name)
            }
            _ => half.default_name.clone(),
        };
        half.custom_name = custom_name(new_name, &default_name);
        half.inventory.mark_dirty();

        if half.kind != StorageKind::Vehicle {
            notices.push(RenameNotice {
                position: pos,
                name: half.custom_name.clone().unwrap_or_default(),
            });
        }
    }

    debug!(%position, name = new_name, notices = notices.len(), "renamed storage");
    Ok(notices)
}
