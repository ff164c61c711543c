//! Coordinate types and spatial constants.
//!
//! The world is an unbounded grid of fixed-size chunk columns:
//! - [`ChunkKey`]: a chunk column's position in the chunk grid
//! - [`LocalPos`]: a block's position inside one chunk
//! - world coordinates: absolute block positions (`i32`)
//!
//! All world→chunk conversions use floor division so negative world
//! coordinates map to the correct chunk, and local offsets are always
//! non-negative.

/// Chunk width along the X axis, in blocks.
pub const CHUNK_SIZE_X: i32 = 16;

/// Chunk height along the Y axis, in blocks. A chunk column spans the full
/// vertical range of the world.
pub const CHUNK_SIZE_Y: i32 = 256;

/// Chunk depth along the Z axis, in blocks.
pub const CHUNK_SIZE_Z: i32 = 16;

/// Number of blocks in one chunk's voxel buffer.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z) as usize;

/// Position of a chunk column in the chunk grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkKey {
    /// Creates a new chunk key.
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Returns this key shifted by the given number of chunks per axis.
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.cx + dx, self.cz + dz)
    }

    /// World coordinates of this chunk's `(x=0, z=0)` corner.
    pub const fn origin(self) -> (i32, i32) {
        (self.cx * CHUNK_SIZE_X, self.cz * CHUNK_SIZE_Z)
    }
}

/// Block position within a chunk.
///
/// Valid coordinates are `0..CHUNK_SIZE_*` per axis. The type itself does
/// not range-check; the conversion functions below always produce in-range
/// values, and chunk accessors index the buffer directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LocalPos {
    /// Creates a new local position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Index into a chunk's voxel buffer.
    ///
    /// Layout is y-major, then z, then x: adjacent x cells are adjacent in
    /// memory.
    pub const fn index(self) -> usize {
        ((self.y * CHUNK_SIZE_Z + self.z) * CHUNK_SIZE_X + self.x) as usize
    }
}

/// Returns the key of the chunk column containing the given world column.
///
/// Floor division, not truncation: world x = -1 is local x = 15 of chunk -1,
/// not part of chunk 0.
pub fn world_to_chunk(wx: i32, wz: i32) -> ChunkKey {
    ChunkKey::new(wx.div_euclid(CHUNK_SIZE_X), wz.div_euclid(CHUNK_SIZE_Z))
}

/// Converts a world position to its in-chunk position.
///
/// The horizontal components are reduced with a non-negative modulo; `wy`
/// passes through and must already be within `0..CHUNK_SIZE_Y`.
pub fn world_to_local(wx: i32, wy: i32, wz: i32) -> LocalPos {
    LocalPos::new(wx.rem_euclid(CHUNK_SIZE_X), wy, wz.rem_euclid(CHUNK_SIZE_Z))
}
