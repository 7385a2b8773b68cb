//! Coordinate systems for the block world.

use crate::constants::{CHUNK_BITS, CHUNK_SIZE};
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Chunk column position in chunk coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    /// Create a new chunk position
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Get the chunk column containing a block position
    #[inline]
    pub const fn containing(pos: IVec3) -> Self {
        Self::new(pos.x >> CHUNK_BITS, pos.z >> CHUNK_BITS)
    }

    /// Lowest block X/Z of this chunk at the given height
    #[inline]
    pub const fn origin(self, y: i32) -> IVec3 {
        IVec3::new(self.x << CHUNK_BITS, y, self.z << CHUNK_BITS)
    }

    /// Whether a block position falls inside this chunk column
    #[inline]
    pub const fn contains(self, pos: IVec3) -> bool {
        let other = Self::containing(pos);
        other.x == self.x && other.z == self.z
    }

    /// Local X/Z of a block position within its chunk (0 to CHUNK_SIZE-1)
    #[inline]
    pub const fn local(pos: IVec3) -> (i32, i32) {
        let mask = CHUNK_SIZE - 1;
        (pos.x & mask, pos.z & mask)
    }
}

/// Axis-aligned block region in world space.
///
/// `upper` is `lower + size`; the chunk footprint treats both bounds as
/// inclusive, so loading a region may touch one chunk past the last block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    lower: IVec3,
    upper: IVec3,
}

impl Region {
    /// Create a region from two corners, normalising their order.
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// Region starting at `lower` spanning `size` blocks per axis.
    pub fn from_size(lower: IVec3, size: IVec3) -> Self {
        Self::new(lower, lower + size)
    }

    #[inline]
    pub const fn lower(&self) -> IVec3 {
        self.lower
    }

    #[inline]
    pub const fn upper(&self) -> IVec3 {
        self.upper
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(&self) -> IVec3 {
        self.upper - self.lower
    }

    /// Number of blocks covered.
    pub fn volume(&self) -> usize {
        let size = self.size();
        size.x as usize * size.y as usize * size.z as usize
    }

    /// Whether a block lies in `[lower, upper)`.
    pub fn contains(&self, pos: IVec3) -> bool {
        pos.cmpge(self.lower).all() && pos.cmplt(self.upper).all()
    }

    pub fn lower_chunk(&self) -> ChunkPos {
        ChunkPos::containing(self.lower)
    }

    pub fn upper_chunk(&self) -> ChunkPos {
        ChunkPos::containing(self.upper)
    }

    /// Number of chunk columns intersecting the region.
    pub fn chunk_count(&self) -> usize {
        let (lo, hi) = (self.lower_chunk(), self.upper_chunk());
        ((hi.x - lo.x + 1) * (hi.z - lo.z + 1)) as usize
    }

    /// Every chunk column intersecting the region, X-major.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkPos> {
        let (lo, hi) = (self.lower_chunk(), self.upper_chunk());
        (lo.x..=hi.x).flat_map(move |x| (lo.z..=hi.z).map(move |z| ChunkPos::new(x, z)))
    }
}
