//! Thread-safe chunk storage.

use blueprint_core::{ChunkPos, StateId, WorldError};
use glam::IVec3;
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockWriteGuard};

use crate::chunk::Chunk;

/// All resident chunks, indexed by position.
///
/// Provides thread-safe access to chunks via `RwLock`.
#[derive(Debug, Default)]
pub struct ChunkManager {
    chunks: RwLock<HashMap<ChunkPos, Chunk>>,
}

impl ChunkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a chunk is resident.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.read().contains_key(&pos)
    }

    /// Get the number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Insert a chunk unless one is already resident at its position.
    ///
    /// Returns whether the chunk was inserted.
    pub fn insert_if_absent(&self, chunk: Chunk) -> bool {
        let mut chunks = self.chunks.write();
        if chunks.contains_key(&chunk.pos) {
            return false;
        }
        chunks.insert(chunk.pos, chunk);
        true
    }

    pub fn remove(&self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.write().remove(&pos)
    }

    /// Positions of resident chunks, unordered.
    pub fn positions(&self) -> Vec<ChunkPos> {
        self.chunks.read().keys().copied().collect()
    }

    /// Run `f` against a resident chunk.
    ///
    /// Returns `None` if the chunk isn't resident.
    pub fn with_chunk<F, R>(&self, pos: ChunkPos, f: F) -> Option<R>
    where
        F: FnOnce(&Chunk) -> R,
    {
        self.chunks.read().get(&pos).map(f)
    }

    /// Run `f` against a resident chunk, mutably.
    pub fn with_chunk_mut<F, R>(&self, pos: ChunkPos, f: F) -> Option<R>
    where
        F: FnOnce(&mut Chunk) -> R,
    {
        self.chunks.write().get_mut(&pos).map(f)
    }

    /// State at a world position, `None` if its chunk isn't resident.
    pub fn block_state(&self, pos: IVec3) -> Option<StateId> {
        self.with_chunk(ChunkPos::containing(pos), |chunk| chunk.get(pos))
    }

    /// Apply all writes under a single write lock.
    ///
    /// Every target chunk must be resident; otherwise nothing is written.
    pub fn apply<I>(&self, writes: I) -> Result<usize, WorldError>
    where
        I: IntoIterator<Item = (IVec3, StateId)>,
    {
        let writes: Vec<_> = writes.into_iter().collect();
        let mut chunks = self.chunks.write();

        if let Some((pos, _)) = writes
            .iter()
            .find(|(pos, _)| !chunks.contains_key(&ChunkPos::containing(*pos)))
        {
            return Err(WorldError::ChunkLoad {
                chunk: ChunkPos::containing(*pos),
                reason: "not resident".into(),
            });
        }

        for &(pos, state) in &writes {
            if let Some(chunk) = chunks.get_mut(&ChunkPos::containing(pos)) {
                chunk.set(pos, state);
            }
        }
        Ok(writes.len())
    }

    /// Exclusive access to the whole map, for generation-time writes.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, HashMap<ChunkPos, Chunk>> {
        self.chunks.write()
    }

    /// Bytes held by resident layer storage.
    pub fn memory_usage(&self) -> usize {
        self.chunks.read().values().map(Chunk::memory_usage).sum()
    }
}
