//! Chunk templates: authored, read-only level segments.

use ledge_common::{Aabb, Collider, Shape, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a template is rejected from a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Template has no name
    #[error("template has an empty name")]
    EmptyName,
    /// Template has no solid collider to test overlap against
    #[error("template has no solid collider")]
    NoSolidCollider,
    /// A collider box is inverted or non-finite
    #[error("collider {index} has invalid bounds")]
    InvalidCollider {
        /// Position of the collider in the shape
        index: usize,
    },
    /// A connection point is NaN or infinite
    #[error("{field} is not finite")]
    NonFinite {
        /// Offending field
        field: &'static str,
    },
}

/// A placeable level segment.
///
/// All positions are relative to the template's local origin `(0, 0)`.
/// A chunk has exactly one entry and any number of exits; a template
/// without exits is a dead end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkTemplate {
    /// Unique name, used for catalog de-duplication
    pub name: String,
    /// Collision geometry
    pub shape: Shape,
    /// Where this chunk attaches to its predecessor
    pub entry_point: Vec2,
    /// Where successors may attach, in authoring order
    #[serde(default)]
    pub exit_points: Vec<Vec2>,
}

impl ChunkTemplate {
    /// Creates a template.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        shape: Shape,
        entry_point: Vec2,
        exit_points: Vec<Vec2>,
    ) -> Self {
        Self {
            name: name.into(),
            shape,
            entry_point,
            exit_points,
        }
    }

    /// Creates a template whose geometry is a single solid box.
    #[must_use]
    pub fn boxed(
        name: impl Into<String>,
        bounds: Aabb,
        entry_point: Vec2,
        exit_points: Vec<Vec2>,
    ) -> Self {
        Self::new(name, Shape::solid_box(bounds), entry_point, exit_points)
    }

    /// Returns true if the template has no exits.
    #[must_use]
    pub fn is_dead_end(&self) -> bool {
        self.exit_points.is_empty()
    }

    /// Local-space bounds of the solid geometry.
    #[must_use]
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.shape.local_bounds()
    }

    /// Checks that the template can be placed.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.name.trim().is_empty() {
            return Err(TemplateError::EmptyName);
        }
        if let Some(index) = self
            .shape
            .colliders
            .iter()
            .position(|c: &Collider| !c.bounds.is_valid())
        {
            return Err(TemplateError::InvalidCollider { index });
        }
        if self.shape.solid().next().is_none() {
            return Err(TemplateError::NoSolidCollider);
        }
        if !self.entry_point.is_finite() {
            return Err(TemplateError::NonFinite {
                field: "entry_point",
            });
        }
        if self.exit_points.iter().any(|p| !p.is_finite()) {
            return Err(TemplateError::NonFinite {
                field: "exit_points",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_valid_template() {
        let t = ChunkTemplate::boxed("flat", unit_box(), Vec2::ZERO, vec![Vec2::new(2.0, 0.0)]);
        assert!(t.validate().is_ok());
        assert!(!t.is_dead_end());
    }

    #[test]
    fn test_rejects_empty_name() {
        let t = ChunkTemplate::boxed("  ", unit_box(), Vec2::ZERO, vec![]);
        assert_eq!(t.validate(), Err(TemplateError::EmptyName));
    }

    #[test]
    fn test_rejects_trigger_only_shape() {
        let t = ChunkTemplate::new(
            "ghost",
            Shape::new(vec![Collider::trigger(unit_box())]),
            Vec2::ZERO,
            vec![],
        );
        assert_eq!(t.validate(), Err(TemplateError::NoSolidCollider));
    }

    #[test]
    fn test_rejects_inverted_collider() {
        let t = ChunkTemplate::new(
            "bent",
            Shape::new(vec![
                Collider::solid(unit_box()),
                Collider::solid(Aabb::new(Vec2::ONE, Vec2::ZERO)),
            ]),
            Vec2::ZERO,
            vec![],
        );
        assert_eq!(t.validate(), Err(TemplateError::InvalidCollider { index: 1 }));
    }

    #[test]
    fn test_rejects_non_finite_exit() {
        let t = ChunkTemplate::boxed("nan", unit_box(), Vec2::ZERO, vec![Vec2::new(f32::NAN, 0.0)]);
        assert_eq!(
            t.validate(),
            Err(TemplateError::NonFinite {
                field: "exit_points"
            })
        );
    }
}
