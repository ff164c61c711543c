//! Noise-based terrain generation.

use noise::{NoiseFn, Perlin};

use super::ChunkGenerator;
use crate::block::BlockId;
use crate::coords::{ChunkKey, LocalPos, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// Procedural heightmap terrain from layered Perlin noise.
///
/// Deterministic: the same seed and chunk key always produce the same
/// buffer. Three octaves of 2D noise shape a surface around a base height;
/// columns that end up below sea level fill with water.
pub struct NoiseGenerator {
    height_noise: Perlin,
    base_height: i32,
    amplitude: f64,
    scale: f64,
    sea_level: i32,
}

impl NoiseGenerator {
    /// Creates a generator for the given world seed.
    pub fn new(seed: u32) -> Self {
        Self {
            height_noise: Perlin::new(seed),
            base_height: 64,
            amplitude: 24.0,
            scale: 0.01,
            sea_level: 56,
        }
    }

    fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        let nx = wx as f64 * self.scale;
        let nz = wz as f64 * self.scale;
        // Three octaves, halving amplitude each step.
        let sample = self.height_noise.get([nx, nz])
            + self.height_noise.get([nx * 2.0, nz * 2.0]) * 0.5
            + self.height_noise.get([nx * 4.0, nz * 4.0]) * 0.25;
        let height = self.base_height + (sample * self.amplitude) as i32;
        height.clamp(1, CHUNK_SIZE_Y - 1)
    }
}

impl ChunkGenerator for NoiseGenerator {
    fn generate(&self, key: ChunkKey, blocks: &mut [BlockId]) {
        let (base_x, base_z) = key.origin();
        for z in 0..CHUNK_SIZE_Z {
            for x in 0..CHUNK_SIZE_X {
                let surface = self.surface_height(base_x + x, base_z + z);
                for y in 0..CHUNK_SIZE_Y {
                    let id = if y < surface - 3 {
                        BlockId::ROCK
                    } else if y < surface {
                        BlockId::DIRT
                    } else if y < self.sea_level {
                        BlockId::WATER
                    } else {
                        BlockId::AIR
                    };
                    blocks[LocalPos::new(x, y, z).index()] = id;
                }
            }
        }
    }
}
