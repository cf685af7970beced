use crate::materials::items::ItemId;
use std::collections::HashMap;

/// A resolved crafting recipe: consume every entry in `requires`, gain
/// `produces_count` of `produces`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub produces: ItemId,
    pub produces_count: u32,
    pub requires: HashMap<ItemId, u32>,
}

impl Recipe {
    /// Ingredients ordered by id.
    pub fn requirements(&self) -> Vec<(&ItemId, u32)> {
        let mut requirements: Vec<(&ItemId, u32)> =
            self.requires.iter().map(|(id, &amount)| (id, amount)).collect();
        requirements.sort_by(|a, b| a.0.cmp(b.0));
        requirements
    }
}
