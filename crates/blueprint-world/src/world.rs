//! The in-memory world.

use std::sync::Arc;

use blueprint_core::{ChunkPos, Region, StateId, WorldError};
use blueprint_schematic::{
    BlockBatch, BlockRegistry, BlockSetter, GenerationUnit, LegacyStateTable, World, WorldFuture,
};
use glam::IVec3;
use hashbrown::HashMap;
use parking_lot::RwLockWriteGuard;
use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::chunk_manager::ChunkManager;
use crate::generation::{FlatGenerator, FlatGeneratorConfig};
use crate::loader::ChunkLoader;

/// Configuration for [`MemoryWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryWorldConfig {
    /// Number of background chunk loader threads.
    pub loader_threads: usize,
    /// Load requests that may queue before `load_chunk` blocks.
    pub max_pending: usize,
    /// Highest state id the world accepts as placeable.
    pub max_state: StateId,
    pub generator: FlatGeneratorConfig,
}

impl Default for MemoryWorldConfig {
    fn default() -> Self {
        Self {
            loader_threads: 1,
            max_pending: 256,
            max_state: LegacyStateTable::bundled()
                .max_state()
                .unwrap_or(StateId(u16::MAX)),
            generator: FlatGeneratorConfig::default(),
        }
    }
}

/// A world held entirely in memory.
#[derive(Debug)]
pub struct MemoryWorld {
    chunks: Arc<ChunkManager>,
    loader: ChunkLoader,
    generator: FlatGenerator,
    max_state: StateId,
}

impl MemoryWorld {
    pub fn new(config: MemoryWorldConfig) -> Result<Self, WorldError> {
        let chunks = Arc::new(ChunkManager::new());
        let generator = FlatGenerator::new(config.generator);
        let loader = ChunkLoader::spawn(
            Arc::clone(&chunks),
            generator.clone(),
            config.loader_threads,
            config.max_pending,
        )?;

        Ok(Self {
            chunks,
            loader,
            generator,
            max_state: config.max_state,
        })
    }

    /// Resident chunk storage.
    pub fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    /// Write a single block into a resident chunk.
    pub fn set_block(&self, pos: IVec3, state: StateId) -> Result<(), WorldError> {
        self.chunks.apply([(pos, state)]).map(drop)
    }

    /// Exclusive generation-time access. Chunks touched through it are
    /// generated on the spot if they are not resident yet.
    pub fn generation_unit(&self) -> MemoryGenerationUnit<'_> {
        MemoryGenerationUnit {
            chunks: self.chunks.write(),
            generator: &self.generator,
        }
    }
}

impl BlockRegistry for MemoryWorld {
    type Block = StateId;

    fn block_for_state(&self, state: StateId) -> Option<StateId> {
        (state <= self.max_state).then_some(state)
    }
}

impl World for MemoryWorld {
    fn load_chunk(&self, chunk: ChunkPos) -> WorldFuture<'static, ()> {
        if self.chunks.contains(chunk) {
            return Box::pin(std::future::ready(Ok(())));
        }

        let reply = self.loader.request(chunk);
        Box::pin(async move {
            reply.await.unwrap_or_else(|_| {
                Err(WorldError::Unavailable("chunk loader dropped request".into()))
            })
        })
    }

    fn block_state(&self, pos: IVec3) -> Option<StateId> {
        self.chunks.block_state(pos)
    }

    fn apply_batch(&self, batch: BlockBatch<StateId>) -> WorldFuture<'_, ()> {
        let result = self.chunks.apply(batch).map(|written| {
            tracing::trace!(written, "applied block batch");
        });
        Box::pin(std::future::ready(result))
    }
}

/// Generation-time view of a [`MemoryWorld`].
///
/// Holds the chunk map's write lock for its whole lifetime.
pub struct MemoryGenerationUnit<'a> {
    chunks: RwLockWriteGuard<'a, HashMap<ChunkPos, Chunk>>,
    generator: &'a FlatGenerator,
}

impl GenerationUnit for MemoryGenerationUnit<'_> {
    type Block = StateId;

    fn fork(&mut self, region: Region) -> Box<dyn BlockSetter<StateId> + '_> {
        Box::new(ForkModifier { unit: self, region })
    }
}

/// Writes confined to one forked region.
struct ForkModifier<'u, 'a> {
    unit: &'u mut MemoryGenerationUnit<'a>,
    region: Region,
}

impl BlockSetter<StateId> for ForkModifier<'_, '_> {
    fn set_block(&mut self, pos: IVec3, state: StateId) {
        if !self.region.contains(pos) {
            tracing::warn!(%pos, "write outside forked region ignored");
            return;
        }
        let chunk_pos = ChunkPos::containing(pos);
        let generator = self.unit.generator;
        self.unit
            .chunks
            .entry(chunk_pos)
            .or_insert_with(|| generator.generate_chunk(chunk_pos))
            .set(pos, state);
    }
}
