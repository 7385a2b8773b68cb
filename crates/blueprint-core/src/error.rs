//! Error types shared across the workspace.

use glam::IVec3;
use thiserror::Error;

use crate::coords::ChunkPos;

/// Engine-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The input document is malformed, incomplete or in an unsupported dialect.
    #[error("Invalid schematic: {0}")]
    Format(String),

    /// An operation was invoked against a grid in the wrong lock state.
    #[error("Invalid state: {0}")]
    State(String),

    /// A block has no counterpart in the lookup table.
    #[error("Unmapped block: {0}")]
    Lookup(String),

    /// Failure reported by the world collaborator.
    #[error(transparent)]
    World(#[from] WorldError),

    /// Binary tag document could not be read or written.
    #[error("NBT error: {0}")]
    Nbt(String),

    /// A submitted task ended without producing a result.
    #[error("Task aborted before completion")]
    TaskAborted,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Missing or wrong-typed field in a tag document.
    pub fn missing_field(key: &str) -> Self {
        Self::Format(format!("missing or wrong-typed field: {key}"))
    }
}

/// Errors surfaced by a world implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// A chunk could not be made resident.
    #[error("Chunk {chunk:?} failed to load: {reason}")]
    ChunkLoad {
        /// The chunk that failed.
        chunk: ChunkPos,
        /// Why it failed.
        reason: String,
    },

    /// A staged batch could not be applied.
    #[error("Batch apply failed: {0}")]
    BatchApply(String),

    /// A block inside a resident region could not be read.
    #[error("No block at {pos}")]
    MissingBlock {
        /// World position of the unreadable block.
        pos: IVec3,
    },

    /// The world is shutting down or otherwise unreachable.
    #[error("World unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
