//! # Ledge Common
//!
//! Common types, utilities, and shared abstractions for Project Ledge.
//!
//! This crate provides foundational types used across all Ledge subsystems:
//! - Geometry types (Aabb, Collider, Shape)
//! - ID types (ChunkId, ExitLink)
//! - Version information for schemas
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod geometry;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::ids::*;
    pub use crate::version::*;
    pub use glam::Vec2;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_ordering() {
        let a = ChunkId::new(1);
        let b = ChunkId::new(2);
        assert!(a < b);
        assert_eq!(b.index(), 2);
        assert_eq!(a.to_string(), "#1");
    }

    #[test]
    fn test_version_compatibility() {
        let v1 = SchemaVersion::new(1, 0, 0);
        let v2 = SchemaVersion::new(1, 3, 0);
        let v3 = SchemaVersion::new(2, 0, 0);

        assert!(SchemaVersion::CHUNK_CATALOG.can_read(&v1));
        assert!(SchemaVersion::CHUNK_CATALOG.can_read(&v2));
        assert!(!SchemaVersion::CHUNK_CATALOG.can_read(&v3));
        assert_eq!(v2.to_string(), "1.3.0");
    }

    #[test]
    fn test_error_conversion() {
        let err: LedgeError = LevelError::EmptyCatalog { rejected: 3 }.into();
        assert!(err.to_string().contains("3 entries rejected"));
    }
}
