//! Scripted storage sessions: a player, storages around them and a list of actions.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Write as _, fs, path::Path};
use stowage_core::{BlockPos, ItemComponents, ItemKey, ItemStack, DEFAULT_MAX_STACK_SIZE};
use stowage_inventory::{
    perform_action, quick_stack_to_nearby_storages, sort_player_items, toggle_favorite,
    ActionOutcome, Container, Inventory, SlotFilter, StorageAction, StorageEntry, StorageKind,
    StorageMap, StowageError, TransferOptions, TransferOutcome, CHEST_SLOT_COUNT,
};
use tracing::{info, warn};

use crate::config::StowageConfig;

/// One occupied slot.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotSpec {
    pub slot: usize,
    pub item: ItemKey,
    pub count: u32,
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
    #[serde(default)]
    pub components: ItemComponents,
    #[serde(default)]
    pub favorite: bool,
}

fn default_max_stack_size() -> u32 {
    DEFAULT_MAX_STACK_SIZE
}

fn default_storage_size() -> usize {
    CHEST_SLOT_COUNT
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSpec {
    pub position: BlockPos,
    pub kind: StorageKind,
    pub name: String,
    #[serde(default = "default_storage_size")]
    pub size: usize,
    #[serde(default)]
    pub filter: Option<SlotFilter>,
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    LootAll { target: BlockPos },
    DepositAll { target: BlockPos },
    QuickStack { target: BlockPos },
    Restock { target: BlockPos },
    SortItems { target: BlockPos },
    Rename {
        target: BlockPos,
        #[serde(default)]
        name: String,
    },
    SortPlayer,
    QuickStackNearby,
    ToggleFavorite { slot: usize },
}

impl Step {
    fn label(&self) -> String {
        match self {
            Step::LootAll { target } => format!("loot_all {target}"),
            Step::DepositAll { target } => format!("deposit_all {target}"),
            Step::QuickStack { target } => format!("quick_stack {target}"),
            Step::Restock { target } => format!("restock {target}"),
            Step::SortItems { target } => format!("sort_items {target}"),
            Step::Rename { target, name } => format!("rename {target} {name:?}"),
            Step::SortPlayer => "sort_player".to_string(),
            Step::QuickStackNearby => "quick_stack_nearby".to_string(),
            Step::ToggleFavorite { slot } => format!("toggle_favorite {slot}"),
        }
    }
}

/// A scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Where the player stands; the origin of nearby discovery.
    #[serde(default)]
    pub origin: BlockPos,
    #[serde(default)]
    pub player: Vec<SlotSpec>,
    #[serde(default)]
    pub storages: Vec<StorageSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Serialize)]
pub struct AnimationTarget {
    pub position: BlockPos,
    pub items: Vec<ItemKey>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    Action { result: ActionOutcome },
    Sorted { result: TransferOutcome },
    Nearby {
        player_modified: bool,
        modified_storages: Vec<BlockPos>,
        animation_ticks: u32,
        animation: Vec<AnimationTarget>,
    },
    Favorite { slot: usize, favorite: bool },
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Serialize)]
pub struct StorageReport {
    pub position: BlockPos,
    pub kind: StorageKind,
    pub name: String,
    pub inventory: Inventory,
}

#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub steps: Vec<StepReport>,
    pub player: Inventory,
    pub storages: Vec<StorageReport>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    /// Every slot holding an item must agree on that item's stack limit.
    fn check_stack_limits(&self) -> Result<()> {
        let mut limits: BTreeMap<&ItemKey, u32> = BTreeMap::new();
        let slots = self
            .player
            .iter()
            .chain(self.storages.iter().flat_map(|storage| &storage.slots));
        for spec in slots {
            let limit = *limits.entry(&spec.item).or_insert(spec.max_stack_size);
            if limit != spec.max_stack_size {
                bail!(
                    "{} has stack limit {limit} in one slot and {} in another",
                    spec.item,
                    spec.max_stack_size
                );
            }
        }
        Ok(())
    }

    fn build_player(&self) -> Result<Inventory> {
        let mut player = Inventory::player();
        fill(&mut player, &self.player).context("invalid player inventory")?;
        Ok(player)
    }

    fn build_storages(&self, radius: u32) -> Result<StorageMap> {
        let mut map = StorageMap::new(radius);
        for spec in &self.storages {
            let mut inventory = Inventory::with_size(spec.size);
            if let Some(filter) = &spec.filter {
                inventory = inventory.with_filter(filter.clone());
            }
            fill(&mut inventory, &spec.slots)
                .with_context(|| format!("invalid storage at {}", spec.position))?;
            let entry = StorageEntry::new(inventory, spec.kind, spec.name.clone());
            if map.insert(spec.position, entry).is_some() {
                bail!("two storages at {}", spec.position);
            }
        }
        Ok(map)
    }

    /// Run every step in order against freshly built containers.
    ///
    /// Engine errors are recorded per step and do not stop the run.
    pub fn run(&self, config: &StowageConfig) -> Result<ScenarioReport> {
        self.check_stack_limits()?;
        let mut player = self.build_player()?;
        let mut storages = self.build_storages(config.nearby_radius)?;
        let options = config.transfer_options();

        let mut steps = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let label = step.label();
            let result = self.run_step(step, &mut player, &mut storages, config, &options);
            let outcome = result.unwrap_or_else(|err| {
                warn!(step = %label, %err, "step failed");
                StepOutcome::Failed {
                    error: err.to_string(),
                }
            });
            steps.push(StepReport { step: label, outcome });
        }
        info!(steps = steps.len(), "scenario finished");

        Ok(ScenarioReport {
            steps,
            player,
            storages: storages
                .iter()
                .map(|(position, entry)| StorageReport {
                    position,
                    kind: entry.kind,
                    name: entry.display_name().to_string(),
                    inventory: entry.inventory.clone(),
                })
                .collect(),
        })
    }

    fn run_step(
        &self,
        step: &Step,
        player: &mut Inventory,
        storages: &mut StorageMap,
        config: &StowageConfig,
        options: &TransferOptions,
    ) -> Result<StepOutcome, StowageError> {
        let mut act = |action, target: &BlockPos, rename_to: Option<&str>| {
            perform_action(storages, *target, player, action, options, rename_to)
                .map(|result| StepOutcome::Action { result })
        };
        match step {
            Step::LootAll { target } => act(StorageAction::LootAll, target, None),
            Step::DepositAll { target } => act(StorageAction::DepositAll, target, None),
            Step::QuickStack { target } => act(StorageAction::QuickStack, target, None),
            Step::Restock { target } => act(StorageAction::Restock, target, None),
            Step::SortItems { target } => act(StorageAction::SortItems, target, None),
            Step::Rename { target, name } => {
                act(StorageAction::Rename, target, Some(name.as_str()))
            }
            Step::SortPlayer => {
                sort_player_items(player, config.sort_type, config.hotbar_protection)
                    .map(|result| StepOutcome::Sorted { result })
            }
            Step::QuickStackNearby => {
                let outcome = quick_stack_to_nearby_storages(
                    player,
                    storages,
                    self.origin,
                    config.hotbar_protection,
                    config.quick_stack_mode.is_smart_deposit(),
                )?;
                let animation = outcome.fly_out(self.origin, config.item_animation_length);
                Ok(StepOutcome::Nearby {
                    player_modified: outcome.player_modified,
                    modified_storages: outcome.modified_storages,
                    animation_ticks: animation.as_ref().map_or(0, |a| a.length_ticks),
                    animation: animation
                        .map(|a| {
                            a.targets
                                .into_iter()
                                .map(|(position, items)| AnimationTarget { position, items })
                                .collect()
                        })
                        .unwrap_or_default(),
                })
            }
            Step::ToggleFavorite { slot } => {
                toggle_favorite(player, *slot, config.enable_item_favoriting)
                    .map(|favorite| StepOutcome::Favorite { slot: *slot, favorite })
            }
        }
    }
}

fn fill(inventory: &mut Inventory, slots: &[SlotSpec]) -> Result<()> {
    for spec in slots {
        if spec.slot >= inventory.size() {
            bail!("slot {} is outside a container of {} slots", spec.slot, inventory.size());
        }
        if spec.count == 0 || spec.count > spec.max_stack_size {
            bail!(
                "slot {} holds {} {} but the stack limit is {}",
                spec.slot,
                spec.count,
                spec.item,
                spec.max_stack_size
            );
        }
        let mut stack = ItemStack::new(spec.item.clone(), spec.count)
            .with_max_stack_size(spec.max_stack_size);
        stack.components = spec.components.clone();
        stack.favorite = spec.favorite;
        inventory.set(spec.slot, Some(stack));
    }
    Ok(())
}

fn render_inventory(inventory: &Inventory) -> String {
    let occupied: Vec<String> = inventory
        .slots()
        .iter()
        .enumerate()
        .filter_map(|(slot, stack)| {
            stack.as_ref().map(|stack| {
                let marker = if stack.favorite { " *" } else { "" };
                format!("[{slot}] {} x{}{marker}", stack.display_name(), stack.count)
            })
        })
        .collect();
    if occupied.is_empty() {
        "(empty)".to_string()
    } else {
        occupied.join(", ")
    }
}

fn summarize(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Action {
            result: ActionOutcome::Transfer(result),
        }
        | StepOutcome::Sorted { result } => format!(
            "player modified: {}, storage modified: {}",
            result.player_modified, result.storage_modified
        ),
        StepOutcome::Action {
            result: ActionOutcome::Renamed(notices),
        } => format!("{} rename notice(s)", notices.len()),
        StepOutcome::Nearby {
            modified_storages,
            animation_ticks,
            ..
        } => {
            let positions: Vec<String> =
                modified_storages.iter().map(ToString::to_string).collect();
            format!(
                "deposited into [{}], animation {} tick(s)",
                positions.join(", "),
                animation_ticks
            )
        }
        StepOutcome::Favorite { slot, favorite } => format!("slot {slot} favorite: {favorite}"),
        StepOutcome::Failed { error } => format!("failed: {error}"),
    }
}

impl ScenarioReport {
    /// Human-readable report.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (index, step) in self.steps.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}: {}", index + 1, step.step, summarize(&step.outcome));
        }
        let _ = writeln!(out, "player: {}", render_inventory(&self.player));
        let totals = self.storage_totals();
        for storage in &self.storages {
            let _ = writeln!(
                out,
                "{} {} ({} items): {}",
                storage.name,
                storage.position,
                totals.get(&storage.position).copied().unwrap_or(0),
                render_inventory(&storage.inventory)
            );
        }
        out
    }

    fn storage_totals(&self) -> BTreeMap<BlockPos, u64> {
        self.storages
            .iter()
            .map(|storage| {
                let total = storage
                    .inventory
                    .slots()
                    .iter()
                    .flatten()
                    .map(|stack| u64::from(stack.count))
                    .sum();
                (storage.position, total)
            })
            .collect()
    }
}
