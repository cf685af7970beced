use bevy::prelude::*;
use std::time::Duration;

use crate::config::SandboxConfig;
use crate::materials::{
    recipe_book, CraftError, CraftKind, CraftResultEvent, InventoryStore, ItemCatalog, ItemId,
    RecipeStatus, Zone,
};
use crate::structures::{PlacementError, PlacementResultEvent};
use crate::world::InteractionEvent;
use crate::GameplaySet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub item_id: ItemId,
    pub name: String,
    pub count: u32,
}

/// Read-only snapshot of the inventory for whatever draws the HUD.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudState {
    pub quick_bar: Vec<Option<SlotView>>,
    pub storage: Vec<Option<SlotView>>,
    pub selected: usize,
    pub recipes: Vec<RecipeStatus>,
    synced_revision: Option<u64>,
}

impl HudState {
    pub fn is_synced_with(&self, inventory: &InventoryStore) -> bool {
        self.synced_revision == Some(inventory.revision())
    }
}

/// The latest feedback line, cleared once its timer runs out.
#[derive(Resource, Debug, Clone)]
pub struct ActionFeedback {
    message: Option<String>,
    timer: Timer,
    lifetime: Duration,
}

impl ActionFeedback {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            message: None,
            timer: Timer::new(lifetime, TimerMode::Once),
            lifetime,
        }
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.timer = Timer::new(self.lifetime, TimerMode::Once);
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn tick(&mut self, delta: Duration) {
        if self.message.is_none() {
            return;
        }
        self.timer.tick(delta);
        if self.timer.is_finished() {
            self.message = None;
        }
    }
}

impl Default for ActionFeedback {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

fn slot_views(inventory: &InventoryStore, catalog: &ItemCatalog, zone: Zone) -> Vec<Option<SlotView>> {
    inventory
        .zone_slots(zone)
        .iter()
        .map(|slot| {
            slot.as_ref().map(|stack| SlotView {
                item_id: stack.item_id.clone(),
                name: catalog.display_name(&stack.item_id).to_string(),
                count: stack.count,
            })
        })
        .collect()
}

pub fn craft_feedback(event: &CraftResultEvent, catalog: &ItemCatalog) -> String {
    match &event.result {
        Ok(CraftKind::Craft(report)) if report.produced == 0 => "Inventory full".to_string(),
        Ok(CraftKind::Craft(_)) => format!("Crafted {}", catalog.display_name(&event.item_id)),
        Ok(CraftKind::Cook { cooked }) => format!("+1 {}", catalog.display_name(cooked)),
        Err(CraftError::InsufficientResources { .. }) => "Not enough resources".to_string(),
        Err(CraftError::InventoryFull(_)) => "Inventory full".to_string(),
        Err(err) => err.to_string(),
    }
}

pub fn placement_feedback(event: &PlacementResultEvent, catalog: &ItemCatalog) -> Option<String> {
    match (&event.result, &event.item_id) {
        (Ok(_), Some(item_id)) => Some(format!("Placed {}", catalog.display_name(item_id))),
        (Ok(_), None) | (Err(PlacementError::NothingSelected), _) => None,
        (Err(err), _) => Some(err.to_string()),
    }
}

pub fn sync_hud(
    inventory: Res<InventoryStore>,
    catalog: Res<ItemCatalog>,
    mut hud: ResMut<HudState>,
) {
    if hud.is_synced_with(&inventory) {
        return;
    }
    *hud = HudState {
        quick_bar: slot_views(&inventory, &catalog, Zone::QuickBar),
        storage: slot_views(&inventory, &catalog, Zone::Main),
        selected: inventory.selected_index(),
        recipes: recipe_book(&catalog, &inventory),
        synced_revision: Some(inventory.revision()),
    };
}

pub fn collect_feedback(
    mut crafts: MessageReader<CraftResultEvent>,
    mut interactions: MessageReader<InteractionEvent>,
    mut placements: MessageReader<PlacementResultEvent>,
    catalog: Res<ItemCatalog>,
    mut feedback: ResMut<ActionFeedback>,
) {
    for event in crafts.read() {
        feedback.show(craft_feedback(event, &catalog));
    }
    for event in interactions.read() {
        if let Some(text) = event.outcome.feedback(&catalog) {
            feedback.show(text);
        }
    }
    for event in placements.read() {
        if let Some(text) = placement_feedback(event, &catalog) {
            feedback.show(text);
        }
    }
}

pub fn expire_feedback(time: Res<Time>, mut feedback: ResMut<ActionFeedback>) {
    feedback.tick(time.delta());
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        let lifetime = app
            .world()
            .get_resource::<SandboxConfig>()
            .map_or(Duration::from_secs(2), SandboxConfig::feedback_duration);

        app.init_resource::<HudState>()
            .insert_resource(ActionFeedback::new(lifetime))
            .add_systems(
                Update,
                (sync_hud, expire_feedback, collect_feedback)
                    .chain()
                    .in_set(GameplaySet::Feedback),
            );
    }
}
