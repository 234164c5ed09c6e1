use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use stowage_core::SortType;
use stowage_inventory::{QuickStackMode, TransferOptions, DEFAULT_NEARBY_RADIUS};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/stowage.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StowageConfig {
    /// Keep the hotbar out of every bulk transfer and sort.
    pub hotbar_protection: bool,
    pub quick_stack_mode: QuickStackMode,
    pub sort_type: SortType,
    /// Length of the fly-out animation in ticks; 0 disables it.
    pub item_animation_length: u32,
    pub enable_item_favoriting: bool,
    /// Search radius in blocks for quick stacking to nearby storages.
    pub nearby_radius: u32,
}

impl Default for StowageConfig {
    fn default() -> Self {
        Self {
            hotbar_protection: true,
            quick_stack_mode: QuickStackMode::Compact,
            sort_type: SortType::ItemName,
            item_animation_length: 20,
            enable_item_favoriting: true,
            nearby_radius: DEFAULT_NEARBY_RADIUS,
        }
    }
}

impl StowageConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<StowageConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    StowageConfig::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config not found at {}. Using defaults", path.display());
                StowageConfig::default()
            }
            Err(err) => {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
                StowageConfig::default()
            }
        }
    }

    /// Save configuration as pretty TOML, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self).context("failed to serialize config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Options passed to every storage action.
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            hotbar_protection: self.hotbar_protection,
            quick_stack_mode: self.quick_stack_mode,
            sort_type: self.sort_type,
        }
    }
}
