//! Compact slot notation for building and inspecting containers in tests.
//!
//! A layout is a comma separated list of slots. `-` is an empty slot,
//! `apple*5` is five apples, `apple` alone is one, and a trailing `!`
//! marks the stack as favorited (`diamond*2!`). Keys may carry a
//! namespace (`mymod:gear*3`).

use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;

use stowage_core::key::DEFAULT_NAMESPACE;
use stowage_core::{ItemKey, ItemStack, StackIdentity};
use stowage_inventory::{Container, Inventory, HOTBAR_SIZE, PLAYER_INVENTORY_SIZE};

/// Build a stack of `count` items of `key`.
pub fn stack(key: &str, count: u32) -> Result<ItemStack> {
    let item = ItemKey::parse(key).with_context(|| format!("invalid item key `{key}`"))?;
    Ok(ItemStack::new(item, count))
}

/// Parse one slot entry.
pub fn parse_slot(entry: &str) -> Result<Option<ItemStack>> {
    let entry = entry.trim();
    if entry == "-" {
        return Ok(None);
    }

    let (entry, favorite) = match entry.strip_suffix('!') {
        Some(rest) => (rest, true),
        None => (entry, false),
    };
    let (key, count) = match entry.split_once('*') {
        Some((key, count)) => {
            let count: u32 = count
                .trim()
                .parse()
                .with_context(|| format!("invalid count in slot `{entry}`"))?;
            (key.trim(), count)
        }
        None => (entry, 1),
    };
    if count == 0 {
        return Err(anyhow!("slot `{entry}` has a zero count; use `-` for empty slots"));
    }

    let mut parsed = stack(key, count)?;
    parsed.favorite = favorite;
    Ok(Some(parsed))
}

/// Parse a whole layout into slots.
pub fn parse_slots(layout: &str) -> Result<Vec<Option<ItemStack>>> {
    if layout.trim().is_empty() {
        return Ok(Vec::new());
    }
    layout.split(',').map(parse_slot).collect()
}

/// Storage inventory with exactly the slots in `layout`.
pub fn storage_from(layout: &str) -> Result<Inventory> {
    Ok(Inventory::from_slots(parse_slots(layout)?, 0))
}

/// Player inventory whose first slots follow `layout`; the rest are empty.
pub fn player_from(layout: &str) -> Result<Inventory> {
    let mut slots = parse_slots(layout)?;
    if slots.len() > PLAYER_INVENTORY_SIZE {
        return Err(anyhow!(
            "player layout has {} slots, at most {PLAYER_INVENTORY_SIZE} allowed",
            slots.len()
        ));
    }
    slots.resize(PLAYER_INVENTORY_SIZE, None);
    Ok(Inventory::from_slots(slots, HOTBAR_SIZE))
}

/// Render a container back into slot notation.
///
/// Keys in the default namespace are written without it.
pub fn render<C: Container + ?Sized>(container: &C) -> String {
    (0..container.size())
        .map(|slot| match container.get(slot) {
            None => "-".to_string(),
            Some(stack) => {
                let mut text = if stack.item.namespace() == DEFAULT_NAMESPACE {
                    stack.item.path().to_string()
                } else {
                    stack.item.to_string()
                };
                if stack.count != 1 {
                    text.push_str(&format!("*{}", stack.count));
                }
                if stack.favorite {
                    text.push('!');
                }
                text
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Total item count per identity across several containers.
pub fn tally(containers: &[&Inventory]) -> BTreeMap<StackIdentity, u64> {
    let mut totals = BTreeMap::new();
    for container in containers {
        for stack in container.slots().iter().flatten() {
            *totals.entry(stack.identity()).or_insert(0) += u64::from(stack.count);
        }
    }
    totals
}

/// Check that no slot holds more than its stack limit or an empty stack.
pub fn check_capacity<C: Container + ?Sized>(container: &C) -> Result<()> {
    for slot in 0..container.size() {
        if let Some(stack) = container.get(slot) {
            if stack.count == 0 || stack.count > stack.max_stack_size {
                return Err(anyhow!(
                    "slot {slot} holds {} of max {} ({})",
                    stack.count,
                    stack.max_stack_size,
                    stack.item
                ));
            }
        }
    }
    Ok(())
}
