//! Block state and placement flag types.

use bytemuck::{Pod, Zeroable};
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Identifier of a fully specified block variant in the modern format.
///
/// State 0 is air.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable, Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct StateId(pub u16);

impl StateId {
    /// Air
    pub const AIR: Self = Self(0);
    /// Stone
    pub const STONE: Self = Self(1);

    /// Returns true if this state is air
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for StateId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// Per-axis mirroring applied while placing a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flip {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Flip {
    /// No mirroring.
    pub const NONE: Self = Self::new(false, false, false);

    #[inline]
    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }

    /// Map a destination-local coordinate to the source coordinate it reads from.
    ///
    /// `size` is the grid extent; `local` must lie inside it.
    #[inline]
    pub const fn source(self, local: IVec3, size: IVec3) -> IVec3 {
        IVec3::new(
            if self.x { size.x - 1 - local.x } else { local.x },
            if self.y { size.y - 1 - local.y } else { local.y },
            if self.z { size.z - 1 - local.z } else { local.z },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_air() {
        assert!(StateId::AIR.is_air());
        assert!(!StateId::STONE.is_air());
    }

    #[test]
    fn flip_none_is_identity() {
        let size = IVec3::new(4, 3, 2);
        let local = IVec3::new(1, 2, 0);
        assert_eq!(Flip::NONE.source(local, size), local);
    }

    #[test]
    fn flip_mirrors_each_axis() {
        let size = IVec3::new(4, 3, 2);
        let flip = Flip::new(true, true, true);
        assert_eq!(flip.source(IVec3::ZERO, size), IVec3::new(3, 2, 1));
        assert_eq!(flip.source(IVec3::new(3, 2, 1), size), IVec3::ZERO);
    }

    #[test]
    fn flip_is_an_involution() {
        let size = IVec3::new(5, 2, 7);
        let flip = Flip::new(true, false, true);
        for x in 0..5 {
            for z in 0..7 {
                let local = IVec3::new(x, 1, z);
                assert_eq!(flip.source(flip.source(local, size), size), local);
            }
        }
    }
}
