//! Reading a live world region into a schematic.

use blueprint_core::{Region, Result, WorldError};
use glam::IVec3;

use crate::grid::Schematic;
use crate::world::{ensure_region_loaded, World};

impl Schematic {
    /// Replace this grid's contents with the blocks in `region`.
    ///
    /// The grid is reset first and stays locked unless every block in the
    /// region was read. The offset is left at zero. Callers must not run two
    /// captures into the same grid at once.
    #[tracing::instrument(level = "debug", skip(self, world))]
    pub async fn capture<W>(&mut self, world: &W, region: Region) -> Result<()>
    where
        W: World + ?Sized,
    {
        self.reset();

        let loaded = ensure_region_loaded(world, &region);
        let size = region.size();
        self.set_size(size.x as u32, size.y as u32, size.z as u32)?;
        loaded.await?;

        let lower = region.lower();
        for x in 0..size.x {
            for y in 0..size.y {
                for z in 0..size.z {
                    let pos = lower + IVec3::new(x, y, z);
                    let Some(state) = world.block_state(pos) else {
                        tracing::debug!(%pos, "capture aborted on unreadable block");
                        return Err(WorldError::MissingBlock { pos }.into());
                    };
                    self.set(x as u32, y as u32, z as u32, state);
                }
            }
        }

        self.set_locked(false);
        Ok(())
    }
}
