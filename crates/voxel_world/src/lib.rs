//! Chunk-streaming voxel world engine.
//!
//! Keeps a bounded working set of fixed-size terrain chunks loaded around a
//! moving focal point. Chunk generation and mesh rebuilds run on background
//! worker pools, so the per-tick [`VoxelWorld::update_streaming`] call never
//! blocks on terrain work; completion is observed by polling chunk state
//! through the store.
//!
//! - [`coords`]: chunk grid math (floor-division world→chunk mapping)
//! - [`block`]: voxel identity
//! - [`chunk`]: per-chunk data, lifecycle state, dirty flags
//! - [`streaming`]: the worker pool and the concurrent chunk store
//! - [`generation`]: the pluggable terrain generator capability
//! - [`world`]: the streaming coordinator and block access API

pub mod block;
pub mod chunk;
pub mod coords;
pub mod generation;
pub mod streaming;
pub mod world;

pub use block::BlockId;
pub use chunk::{Chunk, ChunkData, ChunkState, MeshData};
pub use coords::{
    world_to_chunk, world_to_local, ChunkKey, LocalPos, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z,
    CHUNK_VOLUME,
};
pub use generation::{ChunkGenerator, FlatGenerator, NoiseGenerator};
pub use streaming::{ChunkStore, Job, WorkerPool};
pub use world::{VoxelWorld, WorldConfig};

/// The engine's version, from the crate metadata.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
