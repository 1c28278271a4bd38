//! 2D geometry types for chunk collision shapes.
//!
//! Chunk templates describe their collidable geometry as a set of
//! axis-aligned boxes in template-local space. Placing a chunk translates
//! those boxes into world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Creates a box from its corners.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a box from a center point and full size.
    #[must_use]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the width of the box.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Returns the height of the box.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Returns the center point of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Checks that `min <= max` on both axes and every coordinate is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }

    /// Returns this box moved by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns the smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Checks if the box contains a point (edges inclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Returns how far the two boxes interpenetrate on each axis.
    ///
    /// A component is zero or negative when the boxes are separated (or just
    /// touching) along that axis.
    #[must_use]
    pub fn overlap_extent(&self, other: &Self) -> Vec2 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// Checks if the boxes interpenetrate by more than `tolerance` on both axes.
    ///
    /// Boxes sharing an edge never overlap, whatever the tolerance.
    #[must_use]
    pub fn overlaps(&self, other: &Self, tolerance: f32) -> bool {
        let extent = self.overlap_extent(other);
        extent.x > tolerance && extent.y > tolerance
    }
}

/// A single box collider of a chunk, in template-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Local-space bounds
    pub bounds: Aabb,
    /// Triggers never block placement and never count toward bounds
    #[serde(default)]
    pub is_trigger: bool,
}

impl Collider {
    /// Creates a solid collider.
    #[must_use]
    pub const fn solid(bounds: Aabb) -> Self {
        Self {
            bounds,
            is_trigger: false,
        }
    }

    /// Creates a trigger collider.
    #[must_use]
    pub const fn trigger(bounds: Aabb) -> Self {
        Self {
            bounds,
            is_trigger: true,
        }
    }
}

/// Collision shape of a chunk: a set of box colliders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// All colliders, solid and trigger
    pub colliders: Vec<Collider>,
}

impl Shape {
    /// Creates a shape from colliders.
    #[must_use]
    pub fn new(colliders: Vec<Collider>) -> Self {
        Self { colliders }
    }

    /// Creates a shape made of a single solid box.
    #[must_use]
    pub fn solid_box(bounds: Aabb) -> Self {
        Self::new(vec![Collider::solid(bounds)])
    }

    /// Iterates over the non-trigger colliders.
    pub fn solid(&self) -> impl Iterator<Item = &Collider> + '_ {
        self.colliders.iter().filter(|c| !c.is_trigger)
    }

    /// Union of all solid colliders, or `None` when the shape has none.
    #[must_use]
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.solid()
            .map(|c| c.bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Solid bounds translated to `position`.
    #[must_use]
    pub fn world_bounds(&self, position: Vec2) -> Option<Aabb> {
        self.local_bounds().map(|b| b.translate(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_aabb_dimensions() {
        let b = Aabb::from_center_size(Vec2::new(2.0, 3.0), Vec2::new(4.0, 2.0));
        assert_eq!(b.min, Vec2::new(0.0, 2.0));
        assert_eq!(b.max, Vec2::new(4.0, 4.0));
        assert!((b.width() - 4.0).abs() < f32::EPSILON);
        assert!((b.height() - 2.0).abs() < f32::EPSILON);
        assert_eq!(b.center(), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = unit_box();
        let b = unit_box().translate(Vec2::new(2.0, 0.0));
        assert!(!a.overlaps(&b, 0.0));
        assert!(!a.overlaps(&b, 1e-4));
    }

    #[test]
    fn test_interpenetrating_boxes_overlap() {
        let a = unit_box();
        let b = unit_box().translate(Vec2::new(1.5, 0.5));
        assert!(a.overlaps(&b, 1e-4));
        // Overlap of 0.5 on x is below this tolerance
        assert!(!a.overlaps(&b, 0.6));
    }

    #[test]
    fn test_invalid_box() {
        assert!(unit_box().is_valid());
        assert!(!Aabb::new(Vec2::ONE, Vec2::ZERO).is_valid());
        assert!(!Aabb::new(Vec2::new(f32::NAN, 0.0), Vec2::ONE).is_valid());
    }

    #[test]
    fn test_shape_bounds_ignore_triggers() {
        let shape = Shape::new(vec![
            Collider::solid(unit_box()),
            Collider::trigger(Aabb::new(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0))),
            Collider::solid(unit_box().translate(Vec2::new(3.0, 0.0))),
        ]);
        let bounds = shape.local_bounds().expect("shape has solids");
        assert_eq!(bounds, Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(4.0, 1.0)));
        assert_eq!(shape.solid().count(), 2);
    }

    #[test]
    fn test_trigger_only_shape_has_no_bounds() {
        let shape = Shape::new(vec![Collider::trigger(unit_box())]);
        assert!(shape.local_bounds().is_none());
    }

    proptest! {
        #[test]
        fn prop_union_contains_both(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
        ) {
            let a = unit_box().translate(Vec2::new(ax, ay));
            let b = unit_box().translate(Vec2::new(bx, by));
            let u = a.union(&b);
            prop_assert!(u.contains_point(a.min) && u.contains_point(a.max));
            prop_assert!(u.contains_point(b.min) && u.contains_point(b.max));
        }

        #[test]
        fn prop_overlap_is_symmetric(
            dx in -3.0f32..3.0, dy in -3.0f32..3.0,
        ) {
            let a = unit_box();
            let b = unit_box().translate(Vec2::new(dx, dy));
            prop_assert_eq!(a.overlaps(&b, 1e-4), b.overlaps(&a, 1e-4));
        }
    }
}
