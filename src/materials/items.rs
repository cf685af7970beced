use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::constants::placement::DEFAULT_FOOTPRINT;
use crate::materials::recipes::Recipe;

pub type ItemId = String;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Tool,
    Resource,
    Food,
    Placeable,
    Material,
    Utility,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolType {
    Axe,
    Pickaxe,
    Knife,
}

impl std::fmt::Display for ToolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolType::Axe => write!(f, "axe"),
            ToolType::Pickaxe => write!(f, "pickaxe"),
            ToolType::Knife => write!(f, "knife"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    Foundation,
    Wall,
    Door,
    Roof,
    ResourceBlock,
    Utility,
}

impl BuildType {
    /// Structural pieces snap to the coarse building grid.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            BuildType::Foundation | BuildType::Wall | BuildType::Door | BuildType::Roof
        )
    }

    /// Pieces that stand upright and turn to face the player.
    pub fn is_vertical_plane(self) -> bool {
        matches!(self, BuildType::Wall | BuildType::Door)
    }

    /// Whether a piece of this type stacks onto the top of `support`.
    pub fn rests_on(self, support: BuildType) -> bool {
        match self {
            BuildType::Foundation => support == BuildType::Foundation,
            BuildType::Wall => matches!(support, BuildType::Foundation | BuildType::Wall),
            BuildType::Roof => support == BuildType::Wall,
            _ => false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipeDef {
    pub requires: HashMap<ItemId, u32>,
    #[serde(default = "default_produces")]
    pub produces: u32,
}

fn default_produces() -> u32 {
    1
}

/// Light emitted by a placed item, e.g. a torch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LightDef {
    pub intensity: f32,
    pub range: f32,
    pub color: (f32, f32, f32),
    /// Height of the light above the item's centre, as a fraction of its height.
    #[serde(default = "default_light_height")]
    pub height_factor: f32,
}

fn default_light_height() -> f32 {
    0.4
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ItemCategory,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    #[serde(default)]
    pub equippable: bool,
    pub durability: Option<u32>,
    pub recipe: Option<RecipeDef>,
    pub cooked_item: Option<ItemId>,
    pub build_type: Option<BuildType>,
    pub footprint: Option<(f32, f32, f32)>,
    pub food_value: Option<u32>,
    pub tool_type: Option<ToolType>,
    pub attack_damage: Option<u32>,
    pub light: Option<LightDef>,
}

fn default_max_stack() -> u32 {
    1
}

impl ItemDefinition {
    /// Most items that fit in one slot. Non-stackable items always cap at 1.
    pub fn max_stack_size(&self) -> u32 {
        if self.stackable {
            self.max_stack.max(1)
        } else {
            1
        }
    }

    pub fn craftable(&self) -> bool {
        self.recipe.is_some()
    }

    pub fn cookable(&self) -> bool {
        self.cooked_item.is_some()
    }

    pub fn placeable(&self) -> bool {
        self.build_type.is_some()
    }

    pub fn footprint(&self) -> Vec3 {
        let (x, y, z) = self.footprint.unwrap_or(DEFAULT_FOOTPRINT);
        Vec3::new(x, y, z)
    }

    pub fn recipe(&self) -> Option<Recipe> {
        self.recipe.as_ref().map(|def| Recipe {
            produces: self.id.clone(),
            produces_count: def.produces,
            requires: def.requires.clone(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse item catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),
    #[error("item '{0}' is defined more than once")]
    DuplicateItem(ItemId),
    #[error("recipe for '{item}' requires unknown item '{ingredient}'")]
    UnknownIngredient { item: ItemId, ingredient: ItemId },
    #[error("recipe for '{0}' has a zero quantity")]
    ZeroQuantity(ItemId),
    #[error("'{item}' cooks into unknown item '{cooked}'")]
    UnknownCookedItem { item: ItemId, cooked: ItemId },
}

/// Read-only table of every item the sandbox knows about.
///
/// Cloning is cheap: clones share one immutable table.
#[derive(Resource, Debug, Clone, Default)]
pub struct ItemCatalog {
    definitions: Arc<HashMap<ItemId, ItemDefinition>>,
}

impl ItemCatalog {
    /// Builds a catalog and checks that recipes and cooking only refer to
    /// items that exist.
    ///
    /// # Errors
    /// Returns an error on duplicate ids, unknown ingredients, unknown cooked
    /// items or zero quantities in a recipe.
    pub fn from_definitions(
        definitions_vec: Vec<ItemDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut definitions = HashMap::new();
        for def in definitions_vec {
            if definitions.contains_key(&def.id) {
                return Err(CatalogError::DuplicateItem(def.id));
            }
            definitions.insert(def.id.clone(), def);
        }

        let known: HashSet<&ItemId> = definitions.keys().collect();
        for def in definitions.values() {
            if let Some(recipe) = &def.recipe {
                if recipe.produces == 0 || recipe.requires.values().any(|&n| n == 0) {
                    return Err(CatalogError::ZeroQuantity(def.id.clone()));
                }
                if let Some(ingredient) = recipe.requires.keys().find(|id| !known.contains(id)) {
                    return Err(CatalogError::UnknownIngredient {
                        item: def.id.clone(),
                        ingredient: ingredient.clone(),
                    });
                }
            }
            if let Some(cooked) = &def.cooked_item {
                if !known.contains(cooked) {
                    return Err(CatalogError::UnknownCookedItem {
                        item: def.id.clone(),
                        cooked: cooked.clone(),
                    });
                }
            }
        }

        Ok(Self {
            definitions: Arc::new(definitions),
        })
    }

    /// # Errors
    /// Returns an error if the RON fails to parse or the definitions are inconsistent.
    pub fn from_ron(ron_content: &str) -> Result<Self, CatalogError> {
        let definitions_vec: Vec<ItemDefinition> = ron::from_str(ron_content)?;
        Self::from_definitions(definitions_vec)
    }

    /// Load item definitions from embedded assets.
    ///
    /// # Errors
    /// Returns an error if the embedded RON content fails to parse or validate.
    pub fn load_from_assets() -> Result<Self, CatalogError> {
        let ron_content = include_str!("../assets/items.ron");
        Self::from_ron(ron_content)
    }

    /// # Errors
    /// Returns [`CatalogError::UnknownItem`] when `item_id` is not registered.
    pub fn get(&self, item_id: &str) -> Result<&ItemDefinition, CatalogError> {
        self.definitions
            .get(item_id)
            .ok_or_else(|| CatalogError::UnknownItem(item_id.to_string()))
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.definitions.contains_key(item_id)
    }

    /// # Errors
    /// Returns [`CatalogError::UnknownItem`] when `item_id` is not registered.
    pub fn max_stack_size(&self, item_id: &str) -> Result<u32, CatalogError> {
        self.get(item_id).map(ItemDefinition::max_stack_size)
    }

    pub fn is_craftable(&self, item_id: &str) -> bool {
        self.definitions
            .get(item_id)
            .is_some_and(ItemDefinition::craftable)
    }

    pub fn recipe_for(&self, item_id: &str) -> Option<Recipe> {
        self.definitions.get(item_id).and_then(ItemDefinition::recipe)
    }

    /// Craftable items ordered by id so menus stay stable between frames.
    pub fn craftable_items(&self) -> Vec<&ItemDefinition> {
        let mut items: Vec<&ItemDefinition> = self
            .definitions
            .values()
            .filter(|def| def.craftable())
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }

    /// Buildable items ordered by id.
    pub fn placeable_items(&self) -> Vec<&ItemDefinition> {
        let mut items: Vec<&ItemDefinition> = self
            .definitions
            .values()
            .filter(|def| def.placeable())
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }

    /// Display name for an item, falling back to its id.
    pub fn display_name<'a>(&'a self, item_id: &'a str) -> &'a str {
        self.definitions
            .get(item_id)
            .map_or(item_id, |def| def.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
