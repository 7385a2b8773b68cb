//! Chunk column storage.

use blueprint_core::constants::CHUNK_SIZE;
use blueprint_core::{ChunkPos, StateId};
use glam::IVec3;
use hashbrown::HashMap;

const LAYER_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// One horizontal 16x16 slice of a column.
type Layer = Box<[StateId; LAYER_AREA]>;

/// A chunk column of unbounded height.
///
/// Only layers holding at least one non-air block are allocated.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Position in chunk coordinates.
    pub pos: ChunkPos,
    layers: HashMap<i32, Layer>,
}

impl Chunk {
    /// Create an all-air chunk.
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            layers: HashMap::new(),
        }
    }

    fn slot(pos: IVec3) -> usize {
        let (x, z) = ChunkPos::local(pos);
        (z * CHUNK_SIZE + x) as usize
    }

    /// State at a world position inside this column.
    pub fn get(&self, pos: IVec3) -> StateId {
        debug_assert!(self.pos.contains(pos));
        self.layers
            .get(&pos.y)
            .map_or(StateId::AIR, |layer| layer[Self::slot(pos)])
    }

    /// Write a state at a world position inside this column.
    pub fn set(&mut self, pos: IVec3, state: StateId) {
        debug_assert!(self.pos.contains(pos));
        if state.is_air() && !self.layers.contains_key(&pos.y) {
            return;
        }
        let layer = self
            .layers
            .entry(pos.y)
            .or_insert_with(|| Box::new([StateId::AIR; LAYER_AREA]));
        layer[Self::slot(pos)] = state;
    }

    /// Fill a whole layer with one state.
    pub fn fill_layer(&mut self, y: i32, state: StateId) {
        if state.is_air() {
            self.layers.remove(&y);
        } else {
            self.layers.insert(y, Box::new([state; LAYER_AREA]));
        }
    }

    /// Check if this chunk is empty (all air).
    pub fn is_empty(&self) -> bool {
        self.layers
            .values()
            .all(|layer| layer.iter().all(|state| state.is_air()))
    }

    /// Get memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.layers.len() * std::mem::size_of::<[StateId; LAYER_AREA]>()
    }
}
