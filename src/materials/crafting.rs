use bevy::prelude::*;
use std::collections::HashMap;

use crate::materials::inventory::{InventoryError, InventoryStore};
use crate::materials::items::{ItemCatalog, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CraftError {
    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),
    #[error("{0} cannot be crafted")]
    NotCraftable(ItemId),
    #[error("{0} cannot be cooked")]
    NotCookable(ItemId),
    #[error("not enough resources for {item}")]
    InsufficientResources {
        item: ItemId,
        missing: HashMap<ItemId, u32>,
    },
    #[error("no room for {0}")]
    InventoryFull(ItemId),
    #[error("lost track of {ingredient} while crafting {item}")]
    ConsumptionFault {
        item: ItemId,
        ingredient: ItemId,
        #[source]
        source: InventoryError,
    },
}

/// What a successful craft actually delivered.
///
/// Ingredients are consumed before the output is added, so when the
/// inventory cannot hold every produced unit the rest is lost rather than
/// refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraftReport {
    pub produced: u32,
    pub lost: u32,
}

impl CraftReport {
    pub fn is_complete(&self) -> bool {
        self.lost == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub item_id: ItemId,
    pub name: String,
    pub amount: u32,
    pub held: u32,
}

/// A craftable item as the crafting menu shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeStatus {
    pub item_id: ItemId,
    pub name: String,
    pub produces: u32,
    pub requirements: Vec<Requirement>,
    pub can_craft: bool,
}

pub fn can_craft(inventory: &InventoryStore, item_id: &str) -> bool {
    inventory.catalog().recipe_for(item_id).is_some_and(|recipe| {
        recipe
            .requires
            .iter()
            .all(|(ingredient, &amount)| inventory.has(ingredient, amount))
    })
}

/// Shortfall per ingredient. Empty when the item is craftable right now or
/// has no recipe at all.
pub fn missing_resources(inventory: &InventoryStore, item_id: &str) -> HashMap<ItemId, u32> {
    let Some(recipe) = inventory.catalog().recipe_for(item_id) else {
        return HashMap::new();
    };
    recipe
        .requires
        .iter()
        .filter_map(|(ingredient, &amount)| {
            let held = inventory.count(ingredient);
            (held < amount).then(|| (ingredient.clone(), amount - held))
        })
        .collect()
}

/// Consumes a recipe's ingredients and adds its output.
///
/// # Errors
/// Fails without touching the inventory when the item is unknown, has no
/// recipe or an ingredient is short. A [`CraftError::ConsumptionFault`]
/// means an ingredient vanished between the check and the removal; removals
/// already made are not restored.
pub fn craft(inventory: &mut InventoryStore, item_id: &str) -> Result<CraftReport, CraftError> {
    let catalog = inventory.catalog().clone();
    let definition = catalog
        .get(item_id)
        .map_err(|_| CraftError::UnknownItem(item_id.to_string()))?;
    let Some(recipe) = definition.recipe() else {
        return Err(CraftError::NotCraftable(item_id.to_string()));
    };

    let missing = missing_resources(inventory, item_id);
    if !missing.is_empty() {
        return Err(CraftError::InsufficientResources {
            item: item_id.to_string(),
            missing,
        });
    }

    for (ingredient, amount) in recipe.requirements() {
        if let Err(source) = inventory.remove(ingredient, amount) {
            error!(item = %item_id, ingredient = %ingredient, %source, "ingredient disappeared mid-craft");
            return Err(CraftError::ConsumptionFault {
                item: item_id.to_string(),
                ingredient: ingredient.clone(),
                source,
            });
        }
    }

    let produced = inventory
        .add(item_id, recipe.produces_count)
        .map_err(|_| CraftError::UnknownItem(item_id.to_string()))?;
    let report = CraftReport {
        produced,
        lost: recipe.produces_count - produced,
    };
    if report.is_complete() {
        info!(item = %item_id, count = produced, "crafted");
    } else {
        warn!(item = %item_id, produced, lost = report.lost, "inventory full, crafted items lost");
    }
    Ok(report)
}

/// Turns one raw item into its cooked form.
///
/// # Errors
/// Fails when the item is unknown, not cookable or not held. When the cooked
/// item does not fit the raw one is put back and
/// [`CraftError::InventoryFull`] is returned.
pub fn cook(inventory: &mut InventoryStore, item_id: &str) -> Result<ItemId, CraftError> {
    let catalog = inventory.catalog().clone();
    let definition = catalog
        .get(item_id)
        .map_err(|_| CraftError::UnknownItem(item_id.to_string()))?;
    let Some(cooked) = definition.cooked_item.clone() else {
        return Err(CraftError::NotCookable(item_id.to_string()));
    };

    if let Err(err) = inventory.remove(item_id, 1) {
        debug!(%err, "nothing to cook");
        return Err(CraftError::InsufficientResources {
            item: cooked,
            missing: HashMap::from([(item_id.to_string(), 1)]),
        });
    }

    if inventory.add(&cooked, 1) == Ok(1) {
        info!(raw = %item_id, cooked = %cooked, "cooked");
        return Ok(cooked);
    }
    if inventory.add(item_id, 1) != Ok(1) {
        error!(item = %item_id, "could not return raw item after failed cook");
    }
    Err(CraftError::InventoryFull(cooked))
}

/// Every craftable item with its ingredient counts and whether it can be
/// made from the current inventory.
pub fn recipe_book(catalog: &ItemCatalog, inventory: &InventoryStore) -> Vec<RecipeStatus> {
    catalog
        .craftable_items()
        .into_iter()
        .filter_map(|definition| {
            let recipe = definition.recipe()?;
            let requirements: Vec<Requirement> = recipe
                .requirements()
                .into_iter()
                .map(|(ingredient, amount)| Requirement {
                    item_id: ingredient.clone(),
                    name: catalog.display_name(ingredient).to_string(),
                    amount,
                    held: inventory.count(ingredient),
                })
                .collect();
            let can_craft = requirements.iter().all(|req| req.held >= req.amount);
            Some(RecipeStatus {
                item_id: definition.id.clone(),
                name: definition.name.clone(),
                produces: recipe.produces_count,
                requirements,
                can_craft,
            })
        })
        .collect()
}
