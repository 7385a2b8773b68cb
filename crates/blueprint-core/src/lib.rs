//! Core types for the blueprint structure toolkit.
//!
//! This crate provides the foundational types shared by every other crate:
//! - Block state identifiers and mirroring flags
//! - World, chunk and region coordinates
//! - The engine-wide error type

pub mod coords;
pub mod error;
pub mod types;

pub use coords::{ChunkPos, Region};
pub use error::{Error, Result, WorldError};
pub use types::{Flip, StateId};

/// Engine-wide constants
pub mod constants {
    /// Width of a chunk column in blocks along X and Z
    pub const CHUNK_SIZE: i32 = 16;
    /// Bits needed to represent a block position within a chunk (4 bits for 0-15)
    pub const CHUNK_BITS: u32 = 4;
}
