use bevy::math::primitives::InfinitePlane3d;
use bevy::prelude::*;

use crate::constants::terrain::{MARCH_STEP, NORMAL_EPSILON, REFINE_ITERATIONS};
use crate::world::entities::{EntityId, SupportInfo, WorldRegistry};

/// Terrain height as a function of horizontal position.
pub trait HeightField: Send + Sync {
    /// `None` when `(x, z)` lies outside the terrain.
    fn height_at(&self, x: f32, z: f32) -> Option<f32>;

    /// Distance along the ray to the terrain surface, if it is reached
    /// within `max_distance`. The default marches the ray and bisects the
    /// crossing.
    fn ray_distance(&self, ray: Ray3d, max_distance: f32) -> Option<f32> {
        let below = |t: f32| {
            let point = ray.get_point(t);
            self.height_at(point.x, point.z)
                .is_some_and(|height| point.y <= height)
        };
        if below(0.0) {
            return Some(0.0);
        }
        let mut previous = 0.0;
        let mut t = MARCH_STEP.min(max_distance);
        loop {
            if below(t) {
                let (mut lo, mut hi) = (previous, t);
                for _ in 0..REFINE_ITERATIONS {
                    let mid = (lo + hi) / 2.0;
                    if below(mid) {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                return Some(hi);
            }
            if t >= max_distance {
                return None;
            }
            previous = t;
            t = (t + MARCH_STEP).min(max_distance);
        }
    }

    fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let e = NORMAL_EPSILON;
        let sample = |x: f32, z: f32| self.height_at(x, z).unwrap_or(0.0);
        let dx = (sample(x + e, z) - sample(x - e, z)) / (2.0 * e);
        let dz = (sample(x, z + e) - sample(x, z - e)) / (2.0 * e);
        Vec3::new(-dx, 1.0, -dz).normalize_or(Vec3::Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatGround {
    pub height: f32,
}

impl HeightField for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> Option<f32> {
        Some(self.height)
    }

    fn ray_distance(&self, ray: Ray3d, max_distance: f32) -> Option<f32> {
        let plane = InfinitePlane3d { normal: Dir3::Y };
        let distance = ray.intersect_plane(Vec3::Y * self.height, plane)?;
        (distance <= max_distance).then_some(distance)
    }

    fn normal_at(&self, _x: f32, _z: f32) -> Vec3 {
        Vec3::Y
    }
}

/// The terrain the player walks and builds on.
#[derive(Resource)]
pub struct Terrain {
    field: Box<dyn HeightField>,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::new(FlatGround::default())
    }
}

impl Terrain {
    pub fn new(field: impl HeightField + 'static) -> Self {
        Self {
            field: Box::new(field),
        }
    }

    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.field.height_at(x, z)
    }

    pub fn raycast(&self, ray: Ray3d, max_distance: f32) -> Option<SurfaceHit> {
        let distance = self.field.ray_distance(ray, max_distance)?;
        let point = ray.get_point(distance);
        Some(SurfaceHit {
            point,
            normal: self.field.normal_at(point.x, point.z),
            distance,
            structure: None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    /// Set when the hit surface belongs to a placed structure.
    pub structure: Option<EntityId>,
}

/// What placement needs to know about the world's geometry.
pub trait WorldSurfaces {
    fn height_at(&self, x: f32, z: f32) -> Option<f32>;
    fn raycast(&self, ray: Ray3d, max_distance: f32) -> Option<SurfaceHit>;
    fn nearest_supporting_structure(&self, point: Vec3) -> Option<SupportInfo>;
}

/// Terrain plus placed structures.
pub struct SceneSurfaces<'a> {
    pub terrain: &'a Terrain,
    pub world: &'a WorldRegistry,
}

impl WorldSurfaces for SceneSurfaces<'_> {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.terrain.height_at(x, z)
    }

    fn raycast(&self, ray: Ray3d, max_distance: f32) -> Option<SurfaceHit> {
        let ground = self.terrain.raycast(ray, max_distance);
        let structure = self
            .world
            .cast_structures(ray, max_distance)
            .and_then(|(id, distance)| {
                let entity = self.world.get(id)?;
                let point = ray.get_point(distance);
                Some(SurfaceHit {
                    point,
                    normal: box_face_normal(point - entity.position, entity.half_extents()),
                    distance,
                    structure: Some(id),
                })
            });
        match (ground, structure) {
            (Some(g), Some(s)) => Some(if s.distance <= g.distance { s } else { g }),
            (g, s) => g.or(s),
        }
    }

    fn nearest_supporting_structure(&self, point: Vec3) -> Option<SupportInfo> {
        self.world.supporting_structure(point)
    }
}

/// Outward normal of the box face closest to a point given relative to the
/// box centre.
fn box_face_normal(local: Vec3, half: Vec3) -> Vec3 {
    let scaled = local / half.max(Vec3::splat(f32::EPSILON));
    let abs = scaled.abs();
    if abs.y >= abs.x && abs.y >= abs.z {
        Vec3::Y * scaled.y.signum()
    } else if abs.x >= abs.z {
        Vec3::X * scaled.x.signum()
    } else {
        Vec3::Z * scaled.z.signum()
    }
}
