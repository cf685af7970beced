use bevy::prelude::*;

/// Square horizontal grid used to snap build placements.
///
/// Cells are centred on multiples of `cell_size`, so cell `(0, 0)` covers
/// `[-cell_size / 2, cell_size / 2)` on both the x and z axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGrid {
    pub cell_size: f32,
}

impl SnapGrid {
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self { cell_size }
    }

    /// Rounds a single coordinate to the nearest multiple of the cell size.
    pub fn snap(&self, value: f32) -> f32 {
        (value / self.cell_size).round() * self.cell_size
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn world_to_cell(&self, world_position: Vec3) -> IVec2 {
        IVec2::new(
            (world_position.x / self.cell_size).round() as i32,
            (world_position.z / self.cell_size).round() as i32,
        )
    }

    /// Horizontal centre of a cell, as `(x, z)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_to_world(&self, cell: IVec2) -> Vec2 {
        Vec2::new(cell.x as f32 * self.cell_size, cell.y as f32 * self.cell_size)
    }
}
