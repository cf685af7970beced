use bevy::prelude::*;

pub mod crafting;
pub mod inventory;
pub mod items;
pub mod recipes;

pub use crafting::{
    can_craft, cook, craft, missing_resources, recipe_book, CraftError, CraftReport,
    RecipeStatus, Requirement,
};
pub use inventory::{InventoryError, InventoryStore, ItemStack, SlotRef, Zone};
pub use items::{
    BuildType, CatalogError, ItemCatalog, ItemCategory, ItemDefinition, ItemId, LightDef,
    RecipeDef, ToolType,
};
pub use recipes::Recipe;

use crate::config::SandboxConfig;
use crate::GameplaySet;

#[derive(Message, Debug, Clone)]
pub struct CraftRequest {
    pub item_id: ItemId,
}

#[derive(Message, Debug, Clone)]
pub struct CookRequest {
    pub item_id: ItemId,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct MoveSlotRequest {
    pub from: SlotRef,
    pub to: SlotRef,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct SelectSlotRequest {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CraftKind {
    Craft(CraftReport),
    Cook { cooked: ItemId },
}

#[derive(Message, Debug, Clone)]
pub struct CraftResultEvent {
    pub item_id: ItemId,
    pub result: Result<CraftKind, CraftError>,
}

pub struct MaterialsPlugin;

impl Plugin for MaterialsPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SandboxConfig>()
            .cloned()
            .unwrap_or_default();
        let catalog = match app.world().get_resource::<ItemCatalog>() {
            Some(catalog) => catalog.clone(),
            None => ItemCatalog::load_from_assets().unwrap_or_else(|err| {
                error!(%err, "failed to load item catalog");
                ItemCatalog::default()
            }),
        };

        let mut inventory = InventoryStore::new(catalog.clone(), config.quick_slots, config.main_slots);
        inventory.stock(&config.starting_inventory);
        info!(
            items = catalog.len(),
            slots = config.quick_slots + config.main_slots,
            "inventory ready"
        );

        app.insert_resource(catalog)
            .insert_resource(inventory)
            .add_message::<CraftRequest>()
            .add_message::<CookRequest>()
            .add_message::<MoveSlotRequest>()
            .add_message::<SelectSlotRequest>()
            .add_message::<CraftResultEvent>()
            .add_systems(
                Update,
                (
                    (handle_select_requests, handle_move_requests)
                        .chain()
                        .in_set(GameplaySet::Input),
                    (handle_craft_requests, handle_cook_requests)
                        .chain()
                        .in_set(GameplaySet::Commands),
                ),
            );
    }
}

pub fn handle_select_requests(
    mut requests: MessageReader<SelectSlotRequest>,
    mut inventory: ResMut<InventoryStore>,
) {
    for request in requests.read() {
        if let Err(err) = inventory.select(request.index) {
            warn!(%err, "ignoring slot selection");
        }
    }
}

pub fn handle_move_requests(
    mut requests: MessageReader<MoveSlotRequest>,
    mut inventory: ResMut<InventoryStore>,
) {
    for request in requests.read() {
        if let Err(err) = inventory.move_slot(request.from, request.to) {
            warn!(%err, "ignoring slot move");
        }
    }
}

pub fn handle_craft_requests(
    mut requests: MessageReader<CraftRequest>,
    mut inventory: ResMut<InventoryStore>,
    mut results: MessageWriter<CraftResultEvent>,
) {
    for request in requests.read() {
        let result = craft(&mut inventory, &request.item_id).map(CraftKind::Craft);
        match &result {
            Err(err @ CraftError::UnknownItem(_)) => warn!(item = %request.item_id, %err, "craft refused"),
            Err(err) => debug!(item = %request.item_id, %err, "craft refused"),
            Ok(_) => {}
        }
        results.write(CraftResultEvent {
            item_id: request.item_id.clone(),
            result,
        });
    }
}

pub fn handle_cook_requests(
    mut requests: MessageReader<CookRequest>,
    mut inventory: ResMut<InventoryStore>,
    mut results: MessageWriter<CraftResultEvent>,
) {
    for request in requests.read() {
        let result = cook(&mut inventory, &request.item_id).map(|cooked| CraftKind::Cook { cooked });
        match &result {
            Err(err @ CraftError::UnknownItem(_)) => warn!(item = %request.item_id, %err, "cook refused"),
            Err(err) => debug!(item = %request.item_id, %err, "cook refused"),
            Ok(_) => {}
        }
        results.write(CraftResultEvent {
            item_id: request.item_id.clone(),
            result,
        });
    }
}
