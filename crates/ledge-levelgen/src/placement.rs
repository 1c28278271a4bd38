//! Fitting catalog templates onto open exits.

use std::sync::Arc;

use ledge_common::{ExitLink, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::collision::CollisionBackend;
use crate::rng::RandomSource;
use crate::spatial_index::{Candidate, SpatialIndex};

/// Default number of template draws per exit.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default overlap cast distance.
pub const DEFAULT_CAST_DISTANCE: f32 = 0.1;

/// Placement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Template draws per exit before giving up
    pub max_attempts: u32,
    /// Overlap cast direction, orthogonal to the travel axis
    pub cast_direction: Vec2,
    /// Overlap cast distance
    pub cast_distance: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cast_direction: Vec2::Y,
            cast_distance: DEFAULT_CAST_DISTANCE,
        }
    }
}

/// An exit waiting for a successor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitRef {
    /// Owning chunk and exit index
    pub link: ExitLink,
    /// World position of the exit
    pub world_position: Vec2,
}

/// An exit that could not be filled.
///
/// This is an expected outcome: the exit stays a dead end in the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnresolvedExit {
    /// The exit that stays open
    pub link: ExitLink,
    /// Draws spent before giving up
    pub attempts: u32,
}

/// Result of trying to fill one exit.
#[derive(Debug, Clone)]
pub enum PlaceOutcome {
    /// A non-overlapping candidate, ready to commit
    Placed(Candidate),
    /// Every attempt overlapped existing geometry
    Unresolved(UnresolvedExit),
}

/// Chooses templates for exits and checks them for overlap.
#[derive(Debug, Clone)]
pub struct PlacementEngine<B> {
    backend: B,
    config: PlacementConfig,
}

impl<B: CollisionBackend> PlacementEngine<B> {
    /// Creates a placement engine.
    #[must_use]
    pub fn new(backend: B, config: PlacementConfig) -> Self {
        Self { backend, config }
    }

    /// Returns the placement configuration.
    #[must_use]
    pub const fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Returns the collision backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Tries up to `max_attempts` random templates at `exit`.
    ///
    /// Each attempt makes exactly one draw from `rng`. The candidate is
    /// positioned so its entry point lands on the exit; the first one that
    /// does not overlap the level is returned. Nothing is committed here.
    pub fn try_place_at_exit<R: RandomSource + ?Sized>(
        &self,
        exit: ExitRef,
        catalog: &Catalog,
        index: &SpatialIndex,
        rng: &mut R,
    ) -> PlaceOutcome {
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            let drawn = rng.next_int(0, catalog.len());
            let Some(template) = catalog.get(drawn) else {
                continue;
            };

            // Local origin is (0, 0), so the entry offset is the entry point itself
            let position = exit.world_position - template.entry_point;
            let Some(bounds) = self.backend.bounding_box_of(&template.shape, position) else {
                continue;
            };

            if self.backend.cast_overlap(
                index,
                &template.shape,
                position,
                self.config.cast_direction,
                self.config.cast_distance,
            ) {
                trace!(
                    "Attempt {attempt}/{max_attempts}: {:?} overlaps at ({}, {})",
                    template.name,
                    position.x,
                    position.y
                );
                continue;
            }

            return PlaceOutcome::Placed(Candidate {
                template: Arc::clone(template),
                position,
                bounds,
                parent: Some(exit.link),
            });
        }

        debug!(
            "Exit {} of chunk {} unresolved after {max_attempts} attempts",
            exit.link.exit, exit.link.chunk
        );
        PlaceOutcome::Unresolved(UnresolvedExit {
            link: exit.link,
            attempts: max_attempts,
        })
    }
}
