//! In-memory chunked world for blueprint.
//!
//! [`MemoryWorld`] stores chunk columns in a lock-guarded map and loads
//! missing ones on a background worker, generating them with a
//! [`FlatGenerator`]. It implements the schematic crate's world interface so
//! schematics can be placed into and captured from it without a host runtime.

pub mod chunk;
pub mod chunk_manager;
pub mod generation;
pub mod loader;
pub mod world;

pub use chunk::Chunk;
pub use chunk_manager::ChunkManager;
pub use generation::{FlatGenerator, FlatGeneratorConfig};
pub use loader::ChunkLoader;
pub use world::{MemoryGenerationUnit, MemoryWorld, MemoryWorldConfig};
