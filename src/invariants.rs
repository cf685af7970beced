use bevy::prelude::*;

use crate::{materials::InventoryStore, world::WorldRegistry};

pub struct InvariantPlugin;

impl Plugin for InvariantPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, (check_inventory_stacks, check_world_indices));
    }
}

fn report_violation(subject: &str, message: &str) {
    let msg = format!("INVARIANT VIOLATION [{subject}]: {message}");
    if cfg!(test) {
        #[allow(clippy::panic)]
        {
            panic!("{msg}");
        }
    } else {
        error!("{msg}");
    }
}

fn check_inventory_stacks(inventory: Option<Res<InventoryStore>>) {
    let Some(inventory) = inventory else {
        return;
    };
    for (slot, stack) in inventory.iter_stacks() {
        let subject = format!("{}[{}]", slot.zone, slot.index);
        if stack.count == 0 {
            report_violation(&subject, &format!("empty stack of {} left in slot", stack.item_id));
            continue;
        }
        match inventory.catalog().max_stack_size(&stack.item_id) {
            Ok(max) if stack.count > max => report_violation(
                &subject,
                &format!("{} x{} exceeds max stack {max}", stack.item_id, stack.count),
            ),
            Ok(_) => {}
            Err(_) => report_violation(
                &subject,
                &format!("slot holds {} which the catalog does not know", stack.item_id),
            ),
        }
    }
}

fn check_world_indices(world: Option<Res<WorldRegistry>>) {
    let Some(world) = world else {
        return;
    };
    for violation in world.index_violations() {
        report_violation("world", &violation);
    }
}
