//! ID types for placed chunks and their exits.

use serde::{Deserialize, Serialize};

/// Identifier of a chunk placed in the live level.
///
/// Ids are handed out in placement order and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkId(u32);

impl ChunkId {
    /// Creates a chunk ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the ID as an index into placement-ordered storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One exit of one placed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitLink {
    /// Chunk owning the exit
    pub chunk: ChunkId,
    /// Index into the template's exit list
    pub exit: usize,
}

impl ExitLink {
    /// Creates an exit link.
    #[must_use]
    pub const fn new(chunk: ChunkId, exit: usize) -> Self {
        Self { chunk, exit }
    }
}
