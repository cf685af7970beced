use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::timing::{
    DEFAULT_FEEDBACK_SECS, DEFAULT_FRAME_STEP_SECS, MIN_FRAME_STEP_SECS,
};
use crate::materials::ItemId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse sandbox config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Tuning values for the sandbox. Every field has a default so a config
/// file only needs to name what it overrides.
#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    pub quick_slots: usize,
    pub main_slots: usize,
    pub starting_inventory: Vec<(ItemId, u32)>,
    pub interaction_reach: f32,
    pub placement_reach: f32,
    pub structural_grid: f32,
    pub freeform_grid: f32,
    pub foundation_height: f32,
    pub surface_offset: f32,
    pub ground_clearance: f32,
    pub harvest_damage: u32,
    pub unarmed_damage: u32,
    pub max_frame_step_secs: f32,
    pub feedback_secs: f32,
    /// Fixed seed for drop and loot rolls. `None` seeds from entropy.
    pub loot_seed: Option<u64>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            quick_slots: 8,
            main_slots: 32,
            starting_inventory: vec![
                ("wood".to_string(), 10),
                ("stone".to_string(), 5),
                ("axe".to_string(), 1),
                ("pickaxe".to_string(), 1),
            ],
            interaction_reach: 5.0,
            placement_reach: 8.0,
            structural_grid: 2.0,
            freeform_grid: 1.0,
            foundation_height: 0.5,
            surface_offset: 0.01,
            ground_clearance: 0.01,
            harvest_damage: 25,
            unarmed_damage: 10,
            max_frame_step_secs: DEFAULT_FRAME_STEP_SECS,
            feedback_secs: DEFAULT_FEEDBACK_SECS,
            loot_seed: None,
        }
    }
}

impl SandboxConfig {
    /// Parses a config from RON text.
    ///
    /// # Errors
    /// Returns an error if the RON content fails to parse.
    pub fn from_ron(ron_content: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(ron_content)?)
    }

    /// Loads the embedded config, falling back to defaults if it does not parse.
    pub fn load_from_assets() -> Self {
        let ron_content = include_str!("assets/config.ron");
        Self::from_ron(ron_content).unwrap_or_else(|err| {
            warn!(%err, "falling back to default sandbox config");
            Self::default()
        })
    }

    /// Longest step the virtual clock may take in one frame. Never zero.
    pub fn max_frame_step(&self) -> Duration {
        let secs = finite_or(
            self.max_frame_step_secs,
            DEFAULT_FRAME_STEP_SECS,
            "max_frame_step_secs",
        );
        Duration::try_from_secs_f32(secs.max(MIN_FRAME_STEP_SECS))
            .unwrap_or(Duration::from_secs_f32(DEFAULT_FRAME_STEP_SECS))
    }

    pub fn feedback_duration(&self) -> Duration {
        let secs = finite_or(self.feedback_secs, DEFAULT_FEEDBACK_SECS, "feedback_secs");
        Duration::try_from_secs_f32(secs.max(0.0))
            .unwrap_or(Duration::from_secs_f32(DEFAULT_FEEDBACK_SECS))
    }
}

fn finite_or(value: f32, fallback: f32, field: &str) -> f32 {
    if value.is_finite() {
        value
    } else {
        warn!(field, value, fallback, "ignoring non-finite config value");
        fallback
    }
}
