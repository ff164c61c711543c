//! Block identity.

/// Identifier of a block type.
///
/// `0` is always air. The engine itself only distinguishes air from
/// non-air; any further meaning (textures, physics, names) belongs to the
/// embedding application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: Self = Self(0);
    pub const DIRT: Self = Self(1);
    pub const ROCK: Self = Self(2);
    pub const WATER: Self = Self(3);

    /// Returns true if this is the air block.
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    /// Returns true for any non-air block.
    #[inline]
    pub const fn is_solid(self) -> bool {
        self.0 != 0
    }
}
