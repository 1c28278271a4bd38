//! # Ledge Level Generation
//!
//! Streams a side-scrolling level together out of authored chunk templates.
//!
//! This crate handles:
//! - Template validation and the de-duplicated template catalog
//! - A spatial index of placed chunks ordered by their right edge
//! - Entry-to-exit placement with overlap rejection and bounded retries
//! - Breadth-first frontier expansion toward a target x coordinate
//! - A per-tick session that keeps the level ahead of the player
//!
//! Every random decision goes through an injectable [`RandomSource`], so a
//! fixed seed reproduces a level exactly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod collision;
pub mod frontier;
pub mod generation;
pub mod placement;
pub mod rng;
pub mod spatial_index;
pub mod streaming;
pub mod template;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::collision::*;
    pub use crate::frontier::*;
    pub use crate::generation::*;
    pub use crate::placement::*;
    pub use crate::rng::*;
    pub use crate::spatial_index::*;
    pub use crate::streaming::*;
    pub use crate::template::*;
}

pub use prelude::*;
