//! Item stacks and their merge identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::key::ItemKey;

/// Maximum stack size for most items.
pub const DEFAULT_MAX_STACK_SIZE: u32 = 64;

/// Component name holding a player-assigned display name.
pub const CUSTOM_NAME_COMPONENT: &str = "custom_name";

/// Auxiliary item data that takes part in merge decisions
/// (enchantments, custom names, custom data).
///
/// A `BTreeMap` keeps hashing and ordering independent of insertion order.
pub type ItemComponents = BTreeMap<String, String>;

fn default_max_stack_size() -> u32 {
    DEFAULT_MAX_STACK_SIZE
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A stack of items occupying one container slot.
///
/// An empty slot is represented by `None`, never by a zero-count stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type.
    pub item: ItemKey,
    /// Number of items in this stack (1..=max_stack_size).
    pub count: u32,
    /// Maximum number of items a single slot can hold for this item.
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
    /// Metadata that must match for two stacks to merge.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: ItemComponents,
    /// Favorited stacks never leave the player's inventory through bulk transfers.
    #[serde(default, skip_serializing_if = "is_false")]
    pub favorite: bool,
}

/// Normalized merge key of a stack: item type plus components.
///
/// Two stacks can merge iff their identities are equal. Count, max stack
/// size and the favorite marker are not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackIdentity {
    item: ItemKey,
    components: ItemComponents,
}

impl StackIdentity {
    /// Item type of this identity.
    pub fn item(&self) -> &ItemKey {
        &self.item
    }

    /// Components of this identity.
    pub fn components(&self) -> &ItemComponents {
        &self.components
    }
}

/// Compute the merge identity of a stack.
pub fn identity_of(stack: &ItemStack) -> StackIdentity {
    StackIdentity {
        item: stack.item.clone(),
        components: stack.components.clone(),
    }
}

impl ItemStack {
    /// Create a new item stack with the default max stack size.
    pub fn new(item: ItemKey, count: u32) -> Self {
        Self {
            item,
            count,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            components: ItemComponents::new(),
            favorite: false,
        }
    }

    /// Override the max stack size (e.g. 16 for ender pearls, 1 for tools).
    pub fn with_max_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size.max(1);
        self
    }

    /// Attach a component.
    pub fn with_component(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.insert(name.into(), value.into());
        self
    }

    /// Mark the stack as favorited.
    pub fn favorited(mut self) -> Self {
        self.favorite = true;
        self
    }

    /// Merge identity of this stack.
    pub fn identity(&self) -> StackIdentity {
        identity_of(self)
    }

    /// Check if this stack can merge with another stack.
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.item == other.item && self.components == other.components
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size
    }

    /// Get remaining space in this stack.
    pub fn remaining_space(&self) -> u32 {
        self.max_stack_size.saturating_sub(self.count)
    }

    /// Try to add items to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.remaining_space());
        self.count += added;
        amount - added
    }

    /// Try to remove items from this stack, returning the amount actually removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }

    /// Clone this stack with a different count.
    pub fn copy_with_count(&self, count: u32) -> ItemStack {
        ItemStack {
            count,
            ..self.clone()
        }
    }

    /// Display name: the custom name component if present, the key path otherwise.
    pub fn display_name(&self) -> &str {
        self.components
            .get(CUSTOM_NAME_COMPONENT)
            .map(String::as_str)
            .unwrap_or_else(|| self.item.path())
    }
}
