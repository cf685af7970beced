#![allow(dead_code)]

pub mod items {
    pub const WOOD: &str = "wood";
    pub const STONE: &str = "stone";
    pub const GRASS: &str = "grass";
    pub const LEAVES: &str = "leaves";
    pub const PLANKS: &str = "planks";
    pub const SCRAP_METAL: &str = "scrap_metal";
    pub const NAILS: &str = "nails";
    pub const ROPE: &str = "rope";
    pub const LEATHER: &str = "leather";
    pub const FAT: &str = "fat";
    pub const MEAT: &str = "meat";
    pub const COOKED_MEAT: &str = "cooked_meat";

    pub const AXE: &str = "axe";
    pub const PICKAXE: &str = "pickaxe";
    pub const KNIFE: &str = "knife";

    pub const CAMPFIRE: &str = "campfire";
    pub const TORCH: &str = "torch";
    pub const FOUNDATION: &str = "foundation";
    pub const WALL: &str = "wall";
    pub const WALL_DOOR: &str = "wall_door";
    pub const DOOR: &str = "door";
    pub const ROOF: &str = "roof";
}

pub mod placement {
    /// Footprint used for items that do not declare one.
    pub const DEFAULT_FOOTPRINT: (f32, f32, f32) = (1.0, 1.0, 1.0);
    /// How far a point may sit outside a structure's box and still count as resting on it.
    pub const SUPPORT_TOLERANCE: f32 = 0.05;
}

pub mod timing {
    pub const DEFAULT_FRAME_STEP_SECS: f32 = 0.1;
    /// Smallest frame step the virtual clock accepts; zero would stall it.
    pub const MIN_FRAME_STEP_SECS: f32 = 1e-3;
    pub const DEFAULT_FEEDBACK_SECS: f32 = 2.0;
}

pub mod terrain {
    pub const MARCH_STEP: f32 = 0.25;
    pub const REFINE_ITERATIONS: u32 = 16;
    pub const NORMAL_EPSILON: f32 = 0.05;
}
