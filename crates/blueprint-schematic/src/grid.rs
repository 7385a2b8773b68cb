//! The voxel grid backing every schematic.

use blueprint_core::{Error, Result, StateId};
use glam::IVec3;

/// A rectangular grid of block states with a placement offset.
///
/// Blocks are stored flat, Y-major then Z then X:
/// `index(x, y, z) = y * width * length + z * width + x`.
/// Legacy schematic data is laid out in the same order, so the buffer can be
/// filled straight from a decoded array.
///
/// The grid is *locked* while it is empty or being repopulated. Only an
/// unlocked grid may be read by placement or encoding; decoding and capture
/// unlock it once every voxel has been written.
#[derive(Clone, Debug)]
pub struct Schematic {
    blocks: Vec<StateId>,
    width: u32,
    height: u32,
    length: u32,
    volume: usize,
    offset: IVec3,
    locked: bool,
}

impl Default for Schematic {
    fn default() -> Self {
        Self::new()
    }
}

impl Schematic {
    /// Create an empty, locked grid.
    pub const fn new() -> Self {
        Self {
            blocks: Vec::new(),
            width: 0,
            height: 0,
            length: 0,
            volume: 0,
            offset: IVec3::ZERO,
            locked: true,
        }
    }

    /// Build an unlocked grid from an already populated buffer.
    ///
    /// `blocks` must be in canonical index order and hold exactly
    /// `width * height * length` entries.
    pub fn from_parts(size: [u32; 3], offset: IVec3, blocks: Vec<StateId>) -> Result<Self> {
        let [width, height, length] = size;
        check_extents(width, height, length)?;
        let volume = width as usize * height as usize * length as usize;
        if blocks.len() != volume {
            return Err(Error::Format(format!(
                "expected {volume} blocks for a {width}x{height}x{length} grid, got {}",
                blocks.len()
            )));
        }

        Ok(Self {
            blocks,
            width,
            height,
            length,
            volume,
            offset,
            locked: false,
        })
    }

    /// Reallocate the buffer for the given extents. Previous contents are
    /// discarded (every voxel becomes air); the lock is left untouched.
    ///
    /// Extents must fit world coordinates; on error the grid is unchanged.
    pub fn set_size(&mut self, width: u32, height: u32, length: u32) -> Result<()> {
        check_extents(width, height, length)?;
        self.width = width;
        self.height = height;
        self.length = length;
        self.volume = width as usize * height as usize * length as usize;
        self.blocks = vec![StateId::AIR; self.volume];
        Ok(())
    }

    /// Drop all contents and lock the grid.
    pub fn reset(&mut self) {
        self.width = 0;
        self.height = 0;
        self.length = 0;
        self.volume = 0;
        self.offset = IVec3::ZERO;
        self.blocks = Vec::new();
        self.locked = true;
    }

    /// Flat buffer index of a voxel.
    #[inline]
    pub const fn index(&self, x: u32, y: u32, z: u32) -> usize {
        let (width, length) = (self.width as usize, self.length as usize);
        y as usize * width * length + z as usize * width + x as usize
    }

    /// Read a voxel.
    ///
    /// Callers guarantee `x < width`, `y < height` and `z < length`. Debug
    /// builds assert this; release builds only catch indices that fall past
    /// the end of the buffer.
    #[inline]
    pub fn get(&self, x: u32, y: u32, z: u32) -> StateId {
        debug_assert!(self.in_bounds(x, y, z), "({x}, {y}, {z}) outside grid");
        self.blocks[self.index(x, y, z)]
    }

    /// Write a voxel. Same bounds contract as [`get`](Self::get).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, z: u32, state: StateId) {
        debug_assert!(self.in_bounds(x, y, z), "({x}, {y}, {z}) outside grid");
        let index = self.index(x, y, z);
        self.blocks[index] = state;
    }

    #[inline]
    pub const fn in_bounds(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.width && y < self.height && z < self.length
    }

    /// The whole buffer in canonical order. Fails on a locked grid.
    pub fn blocks(&self) -> Result<&[StateId]> {
        self.ensure_unlocked("read")?;
        Ok(&self.blocks)
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Extents as a signed vector, for coordinate math.
    pub const fn size(&self) -> IVec3 {
        IVec3::new(self.width as i32, self.height as i32, self.length as i32)
    }

    /// Total number of voxels.
    pub const fn volume(&self) -> usize {
        self.volume
    }

    /// Offset added to the placement origin.
    pub const fn offset(&self) -> IVec3 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: IVec3) {
        self.offset = offset;
    }

    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub(crate) fn ensure_unlocked(&self, action: &str) -> Result<()> {
        if self.locked {
            return Err(Error::State(format!("cannot {action} a locked schematic")));
        }
        Ok(())
    }
}

/// Every extent must be representable as an `i32` world distance.
fn check_extents(width: u32, height: u32, length: u32) -> Result<()> {
    for (axis, extent) in [("width", width), ("height", height), ("length", length)] {
        if i32::try_from(extent).is_err() {
            return Err(Error::Format(format!("{axis} {extent} exceeds {}", i32::MAX)));
        }
    }
    Ok(())
}
