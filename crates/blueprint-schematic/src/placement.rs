//! Writing a schematic into a world.
//!
//! Both placement paths share the same coordinate math: the destination
//! region starts at `origin + offset`, and each destination block at local
//! position `p` reads the source voxel `flip.source(p, size)`.

use std::future::Future;

use blueprint_core::{Flip, Region, Result};
use glam::IVec3;

use crate::grid::Schematic;
use crate::world::{
    ensure_region_loaded, BlockBatch, BlockRegistry, BlockSetter, GenerationUnit, World,
};

impl Schematic {
    /// World region this schematic covers when placed at `origin`.
    pub fn destination(&self, origin: IVec3) -> Region {
        Region::from_size(origin + self.offset(), self.size())
    }

    /// Place the schematic into a live world.
    ///
    /// Chunk loads for the destination are requested and the write batch is
    /// staged before this returns. The returned future waits for the chunks,
    /// then applies the whole batch at once and resolves to the destination
    /// region.
    ///
    /// Fails immediately, without touching the world, if the grid is locked.
    #[tracing::instrument(level = "debug", skip(self, world))]
    pub fn place<'w, W>(
        &self,
        world: &'w W,
        origin: IVec3,
        flip: Flip,
    ) -> Result<impl Future<Output = Result<Region>> + Send + 'w>
    where
        W: World + ?Sized,
    {
        self.ensure_unlocked("place")?;

        let region = self.destination(origin);
        let loaded = ensure_region_loaded(world, &region);
        let batch = self.stage(origin, flip, world)?;
        tracing::debug!(writes = batch.len(), "staged placement");

        Ok(async move {
            loaded.await?;
            world.apply_batch(batch).await?;
            Ok(region)
        })
    }

    /// [`place`](Self::place) without mirroring.
    pub fn place_unflipped<'w, W>(
        &self,
        world: &'w W,
        origin: IVec3,
    ) -> Result<impl Future<Output = Result<Region>> + Send + 'w>
    where
        W: World + ?Sized,
    {
        self.place(world, origin, Flip::NONE)
    }

    /// Compute the writes a placement at `origin` would make.
    ///
    /// States the registry does not recognise produce no write.
    pub fn stage<R>(&self, origin: IVec3, flip: Flip, registry: &R) -> Result<BlockBatch<R::Block>>
    where
        R: BlockRegistry + ?Sized,
    {
        self.ensure_unlocked("stage")?;

        let mut batch = BlockBatch::with_capacity(self.volume());
        self.write_into(&mut batch, origin + self.offset(), flip, registry);
        Ok(batch)
    }

    /// Place the schematic during world generation.
    ///
    /// Writes go straight into a fork of `unit` spanning the destination;
    /// nothing is awaited because the generation unit is already writable.
    #[tracing::instrument(level = "debug", skip(self, unit, registry))]
    pub fn fork<U, R>(&self, unit: &mut U, origin: IVec3, flip: Flip, registry: &R) -> Result<Region>
    where
        R: BlockRegistry + ?Sized,
        U: GenerationUnit<Block = R::Block> + ?Sized,
    {
        self.ensure_unlocked("fork")?;

        let region = self.destination(origin);
        let mut modifier = unit.fork(region);
        let written = self.write_into(&mut *modifier, region.lower(), flip, registry);
        tracing::debug!(written, "forked schematic into generation unit");
        Ok(region)
    }

    /// Write the schematic into an arbitrary setter. Returns the number of
    /// blocks written.
    pub fn apply_to<S, R>(&self, setter: &mut S, origin: IVec3, flip: Flip, registry: &R) -> Result<usize>
    where
        R: BlockRegistry + ?Sized,
        S: BlockSetter<R::Block> + ?Sized,
    {
        self.ensure_unlocked("apply")?;
        Ok(self.write_into(setter, origin + self.offset(), flip, registry))
    }

    fn write_into<S, R>(&self, setter: &mut S, lower: IVec3, flip: Flip, registry: &R) -> usize
    where
        R: BlockRegistry + ?Sized,
        S: BlockSetter<R::Block> + ?Sized,
    {
        let size = self.size();
        let mut written = 0;

        for x in 0..size.x {
            for y in 0..size.y {
                for z in 0..size.z {
                    let local = IVec3::new(x, y, z);
                    let source = flip.source(local, size);
                    let state = self.get(source.x as u32, source.y as u32, source.z as u32);

                    if let Some(block) = registry.block_for_state(state) {
                        setter.set_block(lower + local, block);
                        written += 1;
                    }
                }
            }
        }

        written
    }
}
