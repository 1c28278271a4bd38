//! Error types for Project Ledge.

use thiserror::Error;

/// Top-level error type for Ledge operations.
#[derive(Debug, Error)]
pub enum LedgeError {
    /// Level generation errors
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that stop a level session from being set up.
///
/// Exits that cannot be filled are not errors; generation absorbs them and
/// leaves a dead end in the level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// No usable template survived catalog construction
    #[error("Chunk catalog is empty ({rejected} entries rejected)")]
    EmptyCatalog {
        /// Number of entries dropped as missing or invalid
        rejected: usize,
    },

    /// The starting template failed validation
    #[error("Invalid starting template: {0}")]
    InvalidStartingTemplate(String),

    /// `generate_level_start` was called on a session that already started
    #[error("Level generation has already started")]
    AlreadyStarted,

    /// A catalog file could not be parsed or has an unreadable version
    #[error("Invalid catalog file: {0}")]
    CatalogFormat(String),
}

/// Result type alias for level generation.
pub type LevelResult<T> = Result<T, LevelError>;

/// Result type alias for Ledge operations.
pub type LedgeResult<T> = Result<T, LedgeError>;
