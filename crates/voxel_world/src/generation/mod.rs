//! Chunk generation - populating voxel buffers with terrain.
//!
//! The [`ChunkGenerator`] trait is the engine's only hook into terrain
//! shape: one deterministic fill of a chunk's voxel buffer from its grid
//! position. Implementations must not have side effects beyond that write.

mod noise;

pub use self::noise::NoiseGenerator;

use crate::block::BlockId;
use crate::coords::{ChunkKey, LocalPos, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// Fills chunk voxel buffers with terrain.
///
/// Called on generation worker threads with the chunk's data lock held. The
/// same `key` must always produce the same buffer contents.
pub trait ChunkGenerator {
    /// Fills `blocks` (laid out per [`LocalPos::index`]) for the chunk at
    /// `key`.
    fn generate(&self, key: ChunkKey, blocks: &mut [BlockId]);
}

/// Layered flat terrain: rock up to `rock_top`, dirt up to `surface`, air
/// above.
pub struct FlatGenerator {
    rock_top: i32,
    surface: i32,
}

impl FlatGenerator {
    /// Flat world with the default split: rock below 58, dirt to 60.
    pub fn new() -> Self {
        Self {
            rock_top: 58,
            surface: 60,
        }
    }

    /// Flat world with a custom surface height; the top two layers are dirt.
    pub fn with_surface(surface: i32) -> Self {
        let surface = surface.clamp(0, CHUNK_SIZE_Y);
        Self {
            rock_top: (surface - 2).max(0),
            surface,
        }
    }
}

impl Default for FlatGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkGenerator for FlatGenerator {
    fn generate(&self, _key: ChunkKey, blocks: &mut [BlockId]) {
        for y in 0..CHUNK_SIZE_Y {
            let id = if y < self.rock_top {
                BlockId::ROCK
            } else if y < self.surface {
                BlockId::DIRT
            } else {
                BlockId::AIR
            };
            for z in 0..CHUNK_SIZE_Z {
                for x in 0..CHUNK_SIZE_X {
                    blocks[LocalPos::new(x, y, z).index()] = id;
                }
            }
        }
    }
}
