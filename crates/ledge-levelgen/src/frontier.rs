//! Breadth-first expansion of the level frontier.
//!
//! ## Overview
//!
//! The frontier is the list of leaf chunks: chunks that were placed but
//! whose exits have not been expanded yet. A pass turns the leaves into a
//! queue and expands chunks in breadth-first order, enqueueing every newly
//! placed chunk, until it meets a leaf that starts beyond the target.
//!
//! Leaves the pass did not expand are kept for the next pass, in queue
//! order, so a later call with a larger target resumes where this one
//! stopped.

use std::collections::VecDeque;

use ledge_common::{ChunkId, ExitLink};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::collision::CollisionBackend;
use crate::placement::{ExitRef, PlaceOutcome, PlacementEngine, UnresolvedExit};
use crate::rng::{shuffled_indices, RandomSource};
use crate::spatial_index::{ExitSlot, SpatialIndex};

/// Default cap on chunks placed in a single pass.
pub const DEFAULT_MAX_PLACEMENTS_PER_PASS: usize = 10_000;

/// What a pass does with a leaf that starts beyond the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierPolicy {
    /// Keep the leaf and end the pass immediately
    #[default]
    StopAtFirstDistantLeaf,
    /// Keep the leaf and continue with the rest of the queue
    SkipDistantLeaves,
}

/// Summary of one expansion pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionReport {
    /// Target coordinate of the pass
    pub target_x: f32,
    /// Chunks whose exits were expanded
    pub expanded: usize,
    /// Chunks placed, in placement order
    pub placed: Vec<ChunkId>,
    /// Exits left as dead ends
    pub unresolved: Vec<UnresolvedExit>,
    /// Leaves kept because they start beyond the target
    pub deferred: usize,
    /// The pass ended at a distant leaf before draining the queue
    pub stopped_early: bool,
    /// The pass hit the placement cap
    pub truncated: bool,
}

impl ExpansionReport {
    fn new(target_x: f32) -> Self {
        Self {
            target_x,
            ..Self::default()
        }
    }

    /// Returns true if the pass changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.expanded == 0
    }
}

/// Tracks leaf chunks and expands them toward a target coordinate.
#[derive(Debug, Clone)]
pub struct FrontierScheduler {
    leaves: Vec<ChunkId>,
    policy: FrontierPolicy,
    max_placements_per_pass: usize,
}

impl Default for FrontierScheduler {
    fn default() -> Self {
        Self::new(FrontierPolicy::default(), DEFAULT_MAX_PLACEMENTS_PER_PASS)
    }
}

impl FrontierScheduler {
    /// Creates an empty frontier.
    #[must_use]
    pub fn new(policy: FrontierPolicy, max_placements_per_pass: usize) -> Self {
        Self {
            leaves: Vec::new(),
            policy,
            max_placements_per_pass: max_placements_per_pass.max(1),
        }
    }

    /// Current leaves, in the order the next pass will visit them.
    #[must_use]
    pub fn leaves(&self) -> &[ChunkId] {
        &self.leaves
    }

    /// Returns true if there is nothing left to expand.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Returns the distant-leaf policy.
    #[must_use]
    pub const fn policy(&self) -> FrontierPolicy {
        self.policy
    }

    /// Adds a freshly placed chunk as a leaf.
    pub fn push_leaf(&mut self, id: ChunkId) {
        self.leaves.push(id);
    }

    /// Expands leaves until the frontier passes `target_x`.
    ///
    /// A leaf whose bounds start beyond `target_x` is kept for later. With
    /// [`FrontierPolicy::StopAtFirstDistantLeaf`] that also ends the pass,
    /// which makes repeated calls with the same target no-ops.
    pub fn expand_to<B, R>(
        &mut self,
        target_x: f32,
        index: &mut SpatialIndex,
        catalog: &Catalog,
        placement: &PlacementEngine<B>,
        rng: &mut R,
    ) -> ExpansionReport
    where
        B: CollisionBackend,
        R: RandomSource + ?Sized,
    {
        let mut report = ExpansionReport::new(target_x);
        let mut queue: VecDeque<ChunkId> = self.leaves.drain(..).collect();

        while let Some(id) = queue.pop_front() {
            let Some(chunk) = index.get(id) else {
                continue;
            };

            if chunk.bounds().min.x > target_x {
                report.deferred += 1;
                self.leaves.push(id);
                match self.policy {
                    FrontierPolicy::StopAtFirstDistantLeaf => {
                        report.stopped_early = !queue.is_empty();
                        break;
                    },
                    FrontierPolicy::SkipDistantLeaves => continue,
                }
            }

            if report.placed.len() >= self.max_placements_per_pass {
                warn!(
                    "Expansion toward x={target_x} hit the cap of {} placements",
                    self.max_placements_per_pass
                );
                report.truncated = true;
                self.leaves.push(id);
                break;
            }

            Self::expand_chunk(id, index, catalog, placement, rng, &mut queue, &mut report);
        }

        // Queued chunks were never expanded, so they are still leaves
        self.leaves.extend(queue);

        if !report.is_noop() {
            debug!(
                "Frontier pass to x={target_x}: expanded {}, placed {}, unresolved {}, {} leaves left",
                report.expanded,
                report.placed.len(),
                report.unresolved.len(),
                self.leaves.len()
            );
        }
        report
    }

    /// Tries every exit of one chunk, in random order.
    fn expand_chunk<B, R>(
        id: ChunkId,
        index: &mut SpatialIndex,
        catalog: &Catalog,
        placement: &PlacementEngine<B>,
        rng: &mut R,
        queue: &mut VecDeque<ChunkId>,
        report: &mut ExpansionReport,
    ) where
        B: CollisionBackend,
        R: RandomSource + ?Sized,
    {
        let exit_count = index
            .get(id)
            .map_or(0, |c| c.template().exit_points.len());
        report.expanded += 1;

        for exit in shuffled_indices(rng, exit_count) {
            let Some(world_position) = index.get(id).and_then(|c| c.exit_world_position(exit))
            else {
                continue;
            };
            let exit_ref = ExitRef {
                link: ExitLink::new(id, exit),
                world_position,
            };

            let slot = match placement.try_place_at_exit(exit_ref, catalog, index, rng) {
                PlaceOutcome::Placed(candidate) => {
                    let child = index.insert(candidate);
                    queue.push_back(child);
                    report.placed.push(child);
                    ExitSlot::Resolved(child)
                },
                PlaceOutcome::Unresolved(unresolved) => {
                    report.unresolved.push(unresolved);
                    ExitSlot::Unresolved {
                        attempts: unresolved.attempts,
                    }
                },
            };

            if let Some(chunk) = index.get_mut(id) {
                chunk.settle_exit(exit, slot);
            }
        }
    }
}
