//! Per-player options consumed by the transfer engine.

use serde::{Deserialize, Serialize};
use stowage_core::SortType;

/// How quick stacking treats items the storage has no room for in existing stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickStackMode {
    /// Only top up stacks already present in the storage.
    #[default]
    Compact,
    /// Also start new stacks for items the storage already holds.
    SmartDeposit,
}

impl QuickStackMode {
    /// Whether this is the smart deposit mode.
    pub fn is_smart_deposit(self) -> bool {
        self == QuickStackMode::SmartDeposit
    }
}

/// Options a player supplies with every storage action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferOptions {
    /// Skip the hotbar when reading or writing the player's inventory.
    pub hotbar_protection: bool,
    /// Mode used by the quick stack action.
    pub quick_stack_mode: QuickStackMode,
    /// Order used by the sort action.
    pub sort_type: SortType,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            hotbar_protection: true,
            quick_stack_mode: QuickStackMode::Compact,
            sort_type: SortType::ItemName,
        }
    }
}
