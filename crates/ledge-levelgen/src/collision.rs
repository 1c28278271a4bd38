//! Collision queries used to reject overlapping placements.
//!
//! ## Overview
//!
//! A candidate chunk is tested by casting its solid geometry a short
//! distance sideways to the travel axis. Chunks meeting at a seam share an
//! edge, so the swept boxes only touch and the cast reports no hit. Chunks
//! that actually interpenetrate are hit at any cast distance.

use ledge_common::{Aabb, Shape, Vec2};

use crate::spatial_index::SpatialIndex;

/// Default overlap depth below which two boxes count as touching.
pub const DEFAULT_SEAM_TOLERANCE: f32 = 1e-4;

/// Geometry queries the placement engine relies on.
pub trait CollisionBackend {
    /// World-space bounding box of `shape` placed at `position`.
    ///
    /// Returns `None` for shapes without solid geometry.
    fn bounding_box_of(&self, shape: &Shape, position: Vec2) -> Option<Aabb>;

    /// Casts `shape` from `position` along `direction` for `distance` units
    /// and reports whether it hits any solid collider already in `world`.
    fn cast_overlap(
        &self,
        world: &SpatialIndex,
        shape: &Shape,
        position: Vec2,
        direction: Vec2,
        distance: f32,
    ) -> bool;
}

/// Box-sweep backend over the chunks in a [`SpatialIndex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCaster {
    /// Interpenetration depth tolerated at seams
    pub seam_tolerance: f32,
}

impl BoxCaster {
    /// Creates a caster with the given seam tolerance.
    #[must_use]
    pub const fn new(seam_tolerance: f32) -> Self {
        Self { seam_tolerance }
    }
}

impl Default for BoxCaster {
    fn default() -> Self {
        Self::new(DEFAULT_SEAM_TOLERANCE)
    }
}

impl CollisionBackend for BoxCaster {
    fn bounding_box_of(&self, shape: &Shape, position: Vec2) -> Option<Aabb> {
        shape.world_bounds(position)
    }

    fn cast_overlap(
        &self,
        world: &SpatialIndex,
        shape: &Shape,
        position: Vec2,
        direction: Vec2,
        distance: f32,
    ) -> bool {
        let sweep = direction.normalize_or_zero() * distance.max(0.0);

        for collider in shape.solid() {
            let start = collider.bounds.translate(position);
            let swept = start.union(&start.translate(sweep));

            for chunk in world.candidates_overlapping(swept) {
                let offset = chunk.position();
                let hit = chunk
                    .template()
                    .shape
                    .solid()
                    .any(|other| swept.overlaps(&other.bounds.translate(offset), self.seam_tolerance));
                if hit {
                    return true;
                }
            }
        }
        false
    }
}
