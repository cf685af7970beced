use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::materials::items::{ItemCatalog, ItemDefinition, ItemId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub item_id: ItemId,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item_id: impl Into<ItemId>, count: u32) -> Self {
        Self {
            item_id: item_id.into(),
            count,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    QuickBar,
    Main,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::QuickBar => write!(f, "quick bar"),
            Zone::Main => write!(f, "storage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub zone: Zone,
    pub index: usize,
}

impl SlotRef {
    pub fn quick(index: usize) -> Self {
        Self {
            zone: Zone::QuickBar,
            index,
        }
    }

    pub fn main(index: usize) -> Self {
        Self {
            zone: Zone::Main,
            index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),
    #[error("not enough {item}: need {requested}, have {available}")]
    InsufficientResources {
        item: ItemId,
        requested: u32,
        available: u32,
    },
    #[error("slot {} is out of range for the {}", .slot.index, .slot.zone)]
    IndexOutOfRange { slot: SlotRef },
    #[error("slot {} in the {} is empty", .slot.index, .slot.zone)]
    EmptySlot { slot: SlotRef },
}

pub type ChangeObserver = Box<dyn Fn(&InventoryStore) + Send + Sync>;

/// The player's slot-based inventory.
///
/// Slots are stored flat with the quick bar first and main storage after it,
/// which is also the fill order for [`InventoryStore::add`]. Each successful
/// mutation bumps [`InventoryStore::revision`] once and calls the change
/// observer once.
#[derive(Resource)]
pub struct InventoryStore {
    catalog: ItemCatalog,
    slots: Vec<Option<ItemStack>>,
    quick_len: usize,
    selected: usize,
    revision: u64,
    observer: Option<ChangeObserver>,
}

impl std::fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("slots", &self.slots)
            .field("quick_len", &self.quick_len)
            .field("selected", &self.selected)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl InventoryStore {
    pub fn new(catalog: ItemCatalog, quick_slots: usize, main_slots: usize) -> Self {
        Self {
            catalog,
            slots: vec![None; quick_slots + main_slots],
            quick_len: quick_slots,
            selected: 0,
            revision: 0,
            observer: None,
        }
    }

    /// Adds a starting loadout, logging anything that does not fit or is unknown.
    pub fn stock(&mut self, loadout: &[(ItemId, u32)]) {
        for (item_id, count) in loadout {
            match self.add(item_id, *count) {
                Ok(added) if added < *count => {
                    warn!(item = %item_id, requested = count, added, "starting item did not fit");
                }
                Ok(_) => {}
                Err(err) => warn!(%err, "skipping starting item"),
            }
        }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn set_observer(&mut self, observer: impl Fn(&InventoryStore) + Send + Sync + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Incremented once per successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self) {
        self.revision += 1;
        if let Some(observer) = &self.observer {
            observer(self);
        }
    }

    pub fn capacity(&self, zone: Zone) -> usize {
        match zone {
            Zone::QuickBar => self.quick_len,
            Zone::Main => self.slots.len() - self.quick_len,
        }
    }

    fn offset(&self, slot: SlotRef) -> Result<usize, InventoryError> {
        if slot.index >= self.capacity(slot.zone) {
            return Err(InventoryError::IndexOutOfRange { slot });
        }
        Ok(match slot.zone {
            Zone::QuickBar => slot.index,
            Zone::Main => self.quick_len + slot.index,
        })
    }

    /// # Errors
    /// Returns [`InventoryError::IndexOutOfRange`] for a slot outside its zone.
    pub fn slot(&self, slot: SlotRef) -> Result<Option<&ItemStack>, InventoryError> {
        let offset = self.offset(slot)?;
        Ok(self.slots[offset].as_ref())
    }

    pub fn zone_slots(&self, zone: Zone) -> &[Option<ItemStack>] {
        match zone {
            Zone::QuickBar => &self.slots[..self.quick_len],
            Zone::Main => &self.slots[self.quick_len..],
        }
    }

    /// Snapshot of every slot, quick bar first.
    pub fn contents(&self) -> Vec<Option<ItemStack>> {
        self.slots.clone()
    }

    pub fn iter_stacks(&self) -> impl Iterator<Item = (SlotRef, &ItemStack)> {
        let quick_len = self.quick_len;
        self.slots.iter().enumerate().filter_map(move |(offset, slot)| {
            let stack = slot.as_ref()?;
            let slot_ref = if offset < quick_len {
                SlotRef::quick(offset)
            } else {
                SlotRef::main(offset - quick_len)
            };
            Some((slot_ref, stack))
        })
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item_id == item_id)
            .map(|stack| stack.count)
            .sum()
    }

    pub fn has(&self, item_id: &str, count: u32) -> bool {
        self.count(item_id) >= count
    }

    /// Adds up to `count` of an item and returns how many actually fit.
    ///
    /// Existing stacks of the same item are topped up first, then empty
    /// slots are filled in quick-bar-then-storage order.
    ///
    /// # Errors
    /// Returns [`InventoryError::UnknownItem`] when the catalog has no such item.
    pub fn add(&mut self, item_id: &str, count: u32) -> Result<u32, InventoryError> {
        let max_stack = self
            .catalog
            .get(item_id)
            .map(ItemDefinition::max_stack_size)
            .map_err(|_| InventoryError::UnknownItem(item_id.to_string()))?;
        if count == 0 {
            return Ok(0);
        }

        let mut remaining = count;
        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.item_id == item_id && stack.count < max_stack {
                let moved = (max_stack - stack.count).min(remaining);
                stack.count += moved;
                remaining -= moved;
            }
        }
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let chunk = max_stack.min(remaining);
                *slot = Some(ItemStack::new(item_id, chunk));
                remaining -= chunk;
            }
        }

        let added = count - remaining;
        if remaining > 0 {
            debug!(item = %item_id, requested = count, added, "inventory full");
        }
        if added > 0 {
            self.notify();
        }
        Ok(added)
    }

    /// Removes exactly `count` of an item, or nothing at all.
    ///
    /// # Errors
    /// Returns [`InventoryError::InsufficientResources`] when fewer than
    /// `count` are held; the inventory is left untouched.
    pub fn remove(&mut self, item_id: &str, count: u32) -> Result<(), InventoryError> {
        let available = self.count(item_id);
        if available < count {
            return Err(InventoryError::InsufficientResources {
                item: item_id.to_string(),
                requested: count,
                available,
            });
        }
        if count == 0 {
            return Ok(());
        }

        let mut remaining = count;
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            let Some(stack) = slot.as_mut() else {
                continue;
            };
            if stack.item_id != item_id {
                continue;
            }
            let taken = stack.count.min(remaining);
            stack.count -= taken;
            remaining -= taken;
            if stack.count == 0 {
                *slot = None;
            }
        }
        self.notify();
        Ok(())
    }

    /// Moves a stack between slots.
    ///
    /// Onto the same stackable item with room left, as much as fits is merged
    /// and the rest stays behind. Onto anything else, including a full stack
    /// of the same item, the two slots swap. Moving a slot onto itself does
    /// nothing.
    ///
    /// # Errors
    /// Returns [`InventoryError::IndexOutOfRange`] for a bad slot and
    /// [`InventoryError::EmptySlot`] when the source holds nothing.
    pub fn move_slot(&mut self, from: SlotRef, to: SlotRef) -> Result<(), InventoryError> {
        let src = self.offset(from)?;
        let dst = self.offset(to)?;
        if src == dst {
            return Ok(());
        }

        let merge_room = match (&self.slots[src], &self.slots[dst]) {
            (None, _) => return Err(InventoryError::EmptySlot { slot: from }),
            (Some(source), Some(target)) if source.item_id == target.item_id => {
                let max_stack = self
                    .catalog
                    .get(&target.item_id)
                    .map_or(1, ItemDefinition::max_stack_size);
                (max_stack > 1 && target.count < max_stack).then(|| max_stack - target.count)
            }
            _ => None,
        };

        if let Some(room) = merge_room {
            let moving = self.slots[src]
                .as_ref()
                .map_or(0, |stack| stack.count)
                .min(room);
            if let Some(target) = self.slots[dst].as_mut() {
                target.count += moving;
            }
            if let Some(source) = self.slots[src].as_mut() {
                source.count -= moving;
                if source.count == 0 {
                    self.slots[src] = None;
                }
            }
        } else {
            self.slots.swap(src, dst);
        }
        self.notify();
        Ok(())
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&ItemStack> {
        self.slots.get(self.selected).and_then(Option::as_ref)
    }

    /// # Errors
    /// Returns [`InventoryError::IndexOutOfRange`] when `index` is not a quick-bar slot.
    pub fn select(&mut self, index: usize) -> Result<(), InventoryError> {
        if index >= self.quick_len {
            return Err(InventoryError::IndexOutOfRange {
                slot: SlotRef::quick(index),
            });
        }
        if self.selected != index {
            self.selected = index;
            self.notify();
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.notify();
    }
}
