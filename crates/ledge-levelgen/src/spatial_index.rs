//! Placed chunks, ordered by how far right they reach.
//!
//! ## Overview
//!
//! The index owns every chunk committed to the level. Chunks live in an
//! arena addressed by [`ChunkId`] (ids are arena slots, never reused) and a
//! second vector keeps their ids sorted ascending by `bounds.max.x`.
//!
//! Chunks never move or disappear once committed, so the order established
//! at insertion stays valid for the rest of the session.

use std::sync::Arc;

use ledge_common::{Aabb, ChunkId, ExitLink, Vec2};

use crate::template::ChunkTemplate;

/// Resolution state of one exit of a placed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSlot {
    /// Not yet expanded
    Open,
    /// A successor chunk was attached here
    Resolved(ChunkId),
    /// Every attempt overlapped; the exit is a permanent dead end
    Unresolved {
        /// Number of draws spent
        attempts: u32,
    },
}

/// A chunk position that passed the overlap test but is not yet committed.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Template being instantiated
    pub template: Arc<ChunkTemplate>,
    /// World offset of the template's local origin
    pub position: Vec2,
    /// World-space bounds of the solid geometry
    pub bounds: Aabb,
    /// Exit the candidate attaches to, `None` for the starting chunk
    pub parent: Option<ExitLink>,
}

/// A chunk instantiated in the live level.
#[derive(Debug, Clone)]
pub struct PlacedChunk {
    id: ChunkId,
    template: Arc<ChunkTemplate>,
    position: Vec2,
    bounds: Aabb,
    parent: Option<ExitLink>,
    exits: Vec<ExitSlot>,
}

impl PlacedChunk {
    /// Returns the chunk id.
    #[must_use]
    pub const fn id(&self) -> ChunkId {
        self.id
    }

    /// Returns the template this chunk was instantiated from.
    #[must_use]
    pub fn template(&self) -> &Arc<ChunkTemplate> {
        &self.template
    }

    /// Returns the world offset of the template origin.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns the world-space bounding box.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Returns the exit this chunk was attached to.
    #[must_use]
    pub const fn parent(&self) -> Option<ExitLink> {
        self.parent
    }

    /// World position of the entry point.
    #[must_use]
    pub fn entry_world_position(&self) -> Vec2 {
        self.position + self.template.entry_point
    }

    /// World position of exit `index`.
    #[must_use]
    pub fn exit_world_position(&self, index: usize) -> Option<Vec2> {
        self.template
            .exit_points
            .get(index)
            .map(|p| self.position + *p)
    }

    /// Returns the resolution state of every exit.
    #[must_use]
    pub fn exits(&self) -> &[ExitSlot] {
        &self.exits
    }

    /// Number of exits that have a successor.
    #[must_use]
    pub fn resolved_exit_count(&self) -> usize {
        self.exits
            .iter()
            .filter(|s| matches!(s, ExitSlot::Resolved(_)))
            .count()
    }

    /// Records the outcome for one exit.
    ///
    /// Returns false if the exit does not exist or was already settled.
    pub fn settle_exit(&mut self, index: usize, slot: ExitSlot) -> bool {
        match self.exits.get_mut(index) {
            Some(current @ ExitSlot::Open) => {
                *current = slot;
                true
            },
            _ => false,
        }
    }
}

/// Ordered collection of placed chunks.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    /// Chunks by id
    chunks: Vec<PlacedChunk>,
    /// Ids sorted ascending by `bounds.max.x`
    sorted: Vec<ChunkId>,
}

impl SpatialIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of placed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if nothing has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Commits a candidate and returns its new id.
    ///
    /// The id goes after every chunk reaching at most as far right, so
    /// chunks with equal extents keep their insertion order.
    pub fn insert(&mut self, candidate: Candidate) -> ChunkId {
        let id = ChunkId::new(self.chunks.len() as u32);
        let max_x = candidate.bounds.max.x;
        let slot = self
            .sorted
            .partition_point(|other| self.chunks[other.index()].bounds.max.x <= max_x);

        let exits = vec![ExitSlot::Open; candidate.template.exit_points.len()];
        self.chunks.push(PlacedChunk {
            id,
            template: candidate.template,
            position: candidate.position,
            bounds: candidate.bounds,
            parent: candidate.parent,
            exits,
        });
        self.sorted.insert(slot, id);
        id
    }

    /// Gets a chunk by id.
    #[must_use]
    pub fn get(&self, id: ChunkId) -> Option<&PlacedChunk> {
        self.chunks.get(id.index())
    }

    /// Gets a chunk by id for exit bookkeeping.
    pub fn get_mut(&mut self, id: ChunkId) -> Option<&mut PlacedChunk> {
        self.chunks.get_mut(id.index())
    }

    /// Iterates chunks in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedChunk> + '_ {
        self.chunks.iter()
    }

    /// Iterates chunks left to right by `bounds.max.x`.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &PlacedChunk> + '_ {
        self.sorted.iter().map(|id| &self.chunks[id.index()])
    }

    /// The rightmost chunk whose `bounds.max.x` is below `frontier_x`.
    #[must_use]
    pub fn rightmost_before(&self, frontier_x: f32) -> Option<&PlacedChunk> {
        let end = self.first_reaching(frontier_x);
        end.checked_sub(1)
            .map(|i| &self.chunks[self.sorted[i].index()])
    }

    /// Largest `bounds.max.x` of any chunk.
    #[must_use]
    pub fn rightmost_extent(&self) -> Option<f32> {
        self.sorted
            .last()
            .map(|id| self.chunks[id.index()].bounds.max.x)
    }

    /// Chunks whose bounds may intersect `region`.
    ///
    /// Skips the sorted prefix ending left of the region, then filters on the
    /// remaining axes. Boxes that only touch the region are included.
    pub fn candidates_overlapping(&self, region: Aabb) -> impl Iterator<Item = &PlacedChunk> + '_ {
        let start = self.first_reaching(region.min.x);
        self.sorted[start..]
            .iter()
            .map(|id| &self.chunks[id.index()])
            .filter(move |c| {
                c.bounds.min.x <= region.max.x
                    && c.bounds.min.y <= region.max.y
                    && c.bounds.max.y >= region.min.y
            })
    }

    /// Sorted position of the first chunk with `bounds.max.x >= x`.
    fn first_reaching(&self, x: f32) -> usize {
        self.sorted
            .partition_point(|id| self.chunks[id.index()].bounds.max.x < x)
    }
}
