//! Flat terrain generation.

use blueprint_core::{ChunkPos, StateId};
use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;

/// Flat generator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatGeneratorConfig {
    /// Layers `0..floor_height` are filled.
    pub floor_height: i32,
    /// State used for the fill.
    pub floor_state: StateId,
}

impl Default for FlatGeneratorConfig {
    fn default() -> Self {
        Self {
            floor_height: 40,
            floor_state: StateId::STONE,
        }
    }
}

/// Generates every chunk as the same solid floor.
#[derive(Debug, Clone, Default)]
pub struct FlatGenerator {
    config: FlatGeneratorConfig,
}

impl FlatGenerator {
    pub const fn new(config: FlatGeneratorConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &FlatGeneratorConfig {
        &self.config
    }

    /// Generate a chunk column at the given position.
    pub fn generate_chunk(&self, pos: ChunkPos) -> Chunk {
        let mut chunk = Chunk::new(pos);
        for y in 0..self.config.floor_height {
            chunk.fill_layer(y, self.config.floor_state);
        }
        chunk
    }
}
