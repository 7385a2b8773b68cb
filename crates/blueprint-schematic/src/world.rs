//! The interface a host world exposes to placement and capture.

use std::future::Future;
use std::pin::Pin;

use blueprint_core::{ChunkPos, Region, StateId, WorldError};
use glam::IVec3;

/// Boxed future returned by world operations.
pub type WorldFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, WorldError>> + Send + 'a>>;

/// Maps state ids to whatever the host uses as a placeable block.
pub trait BlockRegistry {
    type Block: Copy + Send + Sync + 'static;

    /// `None` for states the host does not know; such voxels are skipped.
    fn block_for_state(&self, state: StateId) -> Option<Self::Block>;
}

/// A write target for individual blocks.
pub trait BlockSetter<B> {
    fn set_block(&mut self, pos: IVec3, block: B);
}

/// A live world that chunks can be loaded into, read from and written to.
pub trait World: BlockRegistry + Send + Sync {
    /// Start making a chunk column resident.
    ///
    /// The request is issued when this is called, not when the future is
    /// first polled. Loading an already resident chunk resolves immediately;
    /// repeated requests are harmless.
    fn load_chunk(&self, chunk: ChunkPos) -> WorldFuture<'static, ()>;

    /// Current state at a position, or `None` if it cannot be read.
    fn block_state(&self, pos: IVec3) -> Option<StateId>;

    /// Apply every write in `batch` as one unit: observers see all of it or
    /// none of it.
    fn apply_batch(&self, batch: BlockBatch<Self::Block>) -> WorldFuture<'_, ()>;
}

/// An in-progress generation workspace, already guaranteed writable.
pub trait GenerationUnit {
    type Block;

    /// A write-capable view spanning `region`.
    fn fork(&mut self, region: Region) -> Box<dyn BlockSetter<Self::Block> + '_>;
}

/// Staged block writes, applied later in one go.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockBatch<B> {
    writes: Vec<(IVec3, B)>,
}

impl<B> BlockBatch<B> {
    pub const fn new() -> Self {
        Self { writes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(IVec3, B)> {
        self.writes.iter()
    }

    pub fn into_inner(self) -> Vec<(IVec3, B)> {
        self.writes
    }
}

impl<B> BlockSetter<B> for BlockBatch<B> {
    fn set_block(&mut self, pos: IVec3, block: B) {
        self.writes.push((pos, block));
    }
}

impl<B> IntoIterator for BlockBatch<B> {
    type Item = (IVec3, B);
    type IntoIter = std::vec::IntoIter<(IVec3, B)>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

/// Request every chunk column intersecting `region` and wait for all of them.
///
/// All requests go out before this returns, so callers can do other work
/// while the chunks load and await the future afterwards.
pub fn ensure_region_loaded<W>(
    world: &W,
    region: &Region,
) -> impl Future<Output = Result<(), WorldError>> + Send
where
    W: World + ?Sized,
{
    let pending: Vec<_> = region.chunks().map(|chunk| world.load_chunk(chunk)).collect();
    tracing::trace!(chunks = pending.len(), "requested region chunks");

    async move {
        for load in pending {
            load.await?;
        }
        Ok(())
    }
}
