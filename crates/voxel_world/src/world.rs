//! VoxelWorld - streaming orchestration and the block access API.
//!
//! Owns the chunk store, the generation and meshing worker pools, and the
//! pluggable terrain generator. The embedding simulation calls
//! [`VoxelWorld::update_streaming`] once per tick with the focal position;
//! chunk filling happens on worker threads and is observed by polling chunk
//! state through the store.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::chunk::{Chunk, ChunkState};
use crate::coords::{
    world_to_chunk, world_to_local, ChunkKey, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z,
};
use crate::generation::ChunkGenerator;
use crate::streaming::{ChunkStore, WorkerPool};

/// Tunables for a [`VoxelWorld`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Worker threads filling fresh chunks with terrain.
    pub gen_threads: usize,
    /// Worker threads rebuilding chunk meshes.
    pub mesh_threads: usize,
    /// Streaming radius in chunks, for hosts that do not supply their own.
    pub view_radius: i32,
    /// Seed handed to seeded generators.
    pub seed: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gen_threads: 1,
            mesh_threads: 1,
            view_radius: 6,
            seed: 0,
        }
    }
}

impl WorldConfig {
    /// Parses a config from TOML; missing keys fall back to the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// The streaming world.
///
/// One logical orchestrator thread drives [`update_streaming`] and the
/// block API; worker threads only ever touch chunks through their own
/// handles. All cross-thread coordination happens through the store's
/// locks, the per-chunk data locks, and the chunks' atomic state and dirty
/// words.
///
/// [`update_streaming`]: Self::update_streaming
pub struct VoxelWorld {
    store: ChunkStore,
    generator: Option<Arc<dyn ChunkGenerator + Send + Sync>>,
    gen_pool: WorkerPool,
    mesh_pool: WorkerPool,
    config: WorldConfig,
}

impl VoxelWorld {
    /// Creates a world with the default configuration.
    pub fn new(generator: Arc<dyn ChunkGenerator + Send + Sync>) -> Self {
        Self::with_config(Some(generator), WorldConfig::default())
    }

    /// Creates a world with an explicit configuration.
    ///
    /// `generator` may be `None`: streamed chunks then stay
    /// [`ChunkState::Empty`] and read as air. That mode is only useful for
    /// pure-edit worlds, so it is flagged once in the log.
    pub fn with_config(
        generator: Option<Arc<dyn ChunkGenerator + Send + Sync>>,
        config: WorldConfig,
    ) -> Self {
        if generator.is_none() {
            warn!("voxel world created without a generator; streamed chunks will stay empty");
        }
        Self {
            store: ChunkStore::new(),
            generator,
            gen_pool: WorkerPool::new(),
            mesh_pool: WorkerPool::new(),
            config,
        }
    }

    /// Read access to the loaded chunk set, for renderers and other
    /// consumers. Consumers may read voxel data and consume the mesh-dirty
    /// flag; they must not write blocks except through
    /// [`set_block`](Self::set_block).
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Spawns the generation and meshing worker pools.
    pub fn start_streaming(&mut self) {
        self.gen_pool.start(self.config.gen_threads.max(1));
        self.mesh_pool.start(self.config.mesh_threads.max(1));
    }

    /// Stops both pools. Queued jobs are discarded; in-flight jobs finish.
    pub fn stop_streaming(&mut self) {
        self.gen_pool.stop();
        self.mesh_pool.stop();
    }

    /// Per-tick streaming update.
    ///
    /// Loads (and queues generation for) every chunk within Chebyshev
    /// distance `radius` of the focal point's chunk, then synchronously
    /// unloads everything outside that square. Takes `&mut self`: there is
    /// exactly one orchestrator, and concurrent ticks are not a supported
    /// mode.
    pub fn update_streaming(&mut self, focal_wx: i32, focal_wz: i32, radius: i32) {
        let center = world_to_chunk(focal_wx, focal_wz);

        let span = (2 * radius + 1).max(0) as usize;
        let mut wanted = HashSet::with_capacity(span * span);
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let key = center.offset(dx, dz);
                wanted.insert(key);
                let chunk = self.store.get_or_create(key);
                self.enqueue_generate(&chunk);
            }
        }

        // Unload everything that fell out of the wanted square. In-flight
        // jobs keep their handles; the chunk just becomes unreachable.
        let mut unloaded = 0usize;
        for chunk in self.store.snapshot_all() {
            if !wanted.contains(&chunk.key()) {
                self.store.remove(chunk.key());
                unloaded += 1;
            }
        }
        if unloaded > 0 {
            debug!(
                "streaming tick at ({}, {}): {} loaded, {} unloaded",
                center.cx,
                center.cz,
                self.store.len(),
                unloaded
            );
        }
    }

    /// Queues a generation job for `chunk` unless it already has one.
    ///
    /// The Empty→Generating claim is a single compare-and-swap, so repeated
    /// ticks (or racing callers) cannot double-queue a chunk. Without a
    /// generator this is a no-op and the chunk stays Empty.
    fn enqueue_generate(&self, chunk: &Arc<Chunk>) {
        let Some(generator) = &self.generator else {
            return;
        };
        if !chunk.try_begin_generating() {
            return;
        }
        let generator = Arc::clone(generator);
        let chunk = Arc::clone(chunk);
        self.gen_pool.enqueue(Box::new(move || {
            {
                let mut data = chunk.data();
                generator.generate(chunk.key(), &mut data.blocks);
            }
            chunk.set_state(ChunkState::ReadyData);
            chunk.mark_dirty_mesh();
        }));
    }

    /// Queues a mesh rebuild for `chunk` if its mesh is dirty.
    ///
    /// Not called by [`update_streaming`](Self::update_streaming):
    /// consumers that display chunks drive remeshing themselves by walking
    /// a snapshot. Consumes the mesh-dirty event, so exactly one rebuild
    /// runs per event.
    pub fn enqueue_mesh(&self, chunk: &Arc<Chunk>) {
        if chunk.state() == ChunkState::Meshing {
            return;
        }
        if !chunk.consume_dirty_mesh() {
            return;
        }
        chunk.set_state(ChunkState::Meshing);
        let chunk = Arc::clone(chunk);
        self.mesh_pool.enqueue(Box::new(move || {
            // Placeholder pass: real face extraction lives with the renderer.
            {
                let mut data = chunk.data();
                data.mesh.clear();
            }
            chunk.set_state(ChunkState::ReadyMesh);
        }));
    }

    /// Reads the block at a world position.
    ///
    /// Air for `wy` outside the vertical range and for chunks that are not
    /// loaded.
    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        if wy < 0 || wy >= CHUNK_SIZE_Y {
            return BlockId::AIR;
        }
        let key = world_to_chunk(wx, wz);
        match self.store.get(key) {
            Some(chunk) => chunk.get(world_to_local(wx, wy, wz)),
            None => BlockId::AIR,
        }
    }

    /// Writes the block at a world position.
    ///
    /// A no-op outside the vertical range. Creates the owning chunk when it
    /// is not loaded, and nudges face-adjacent neighbors to remesh when the
    /// edit sits on a chunk boundary.
    pub fn set_block(&self, wx: i32, wy: i32, wz: i32, id: BlockId) {
        if wy < 0 || wy >= CHUNK_SIZE_Y {
            return;
        }
        let key = world_to_chunk(wx, wz);
        let local = world_to_local(wx, wy, wz);
        let chunk = self.store.get_or_create(key);
        chunk.set(local, id);
        self.mark_neighbors_dirty_if_edge(key, local.x, local.z);
    }

    /// Marks loaded neighbors mesh-dirty when an edit touches a chunk face.
    ///
    /// Unloaded neighbors are skipped; they mesh from scratch if they ever
    /// stream in.
    fn mark_neighbors_dirty_if_edge(&self, key: ChunkKey, lx: i32, lz: i32) {
        if lx == 0 {
            if let Some(neighbor) = self.store.get(key.offset(-1, 0)) {
                neighbor.mark_dirty_mesh();
            }
        } else if lx == CHUNK_SIZE_X - 1 {
            if let Some(neighbor) = self.store.get(key.offset(1, 0)) {
                neighbor.mark_dirty_mesh();
            }
        }

        if lz == 0 {
            if let Some(neighbor) = self.store.get(key.offset(0, -1)) {
                neighbor.mark_dirty_mesh();
            }
        } else if lz == CHUNK_SIZE_Z - 1 {
            if let Some(neighbor) = self.store.get(key.offset(0, 1)) {
                neighbor.mark_dirty_mesh();
            }
        }
    }

    /// Generation jobs waiting for a worker.
    pub fn queued_generation_jobs(&self) -> usize {
        self.gen_pool.queued_len()
    }

    /// Mesh jobs waiting for a worker.
    pub fn queued_mesh_jobs(&self) -> usize {
        self.mesh_pool.queued_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::FlatGenerator;

    fn test_world() -> VoxelWorld {
        VoxelWorld::new(Arc::new(FlatGenerator::new()))
    }

    #[test]
    fn set_then_get_round_trips() {
        let world = test_world();
        for &(wx, wy, wz) in &[(0, 0, 0), (-1, 5, -1), (-17, 200, 31), (1000, 255, -1000)] {
            world.set_block(wx, wy, wz, BlockId::WATER);
            assert_eq!(
                world.get_block(wx, wy, wz),
                BlockId::WATER,
                "at ({wx}, {wy}, {wz})"
            );
        }
    }

    #[test]
    fn out_of_range_y_reads_air_and_ignores_writes() {
        let world = test_world();
        assert_eq!(world.get_block(0, -1, 0), BlockId::AIR);
        assert_eq!(world.get_block(0, CHUNK_SIZE_Y, 0), BlockId::AIR);

        world.set_block(0, -1, 0, BlockId::ROCK);
        world.set_block(0, CHUNK_SIZE_Y, 0, BlockId::ROCK);
        assert!(world.store().is_empty());
    }

    #[test]
    fn missing_chunk_reads_air() {
        let world = test_world();
        assert_eq!(world.get_block(123, 10, -456), BlockId::AIR);
        assert!(world.store().is_empty());
    }

    #[test]
    fn update_streaming_loads_the_exact_chebyshev_square() {
        let mut world = test_world();
        // Focal point inside chunk (0, 0).
        world.update_streaming(8, 8, 2);
        assert_eq!(world.store().len(), 25);
        for dz in -2..=2 {
            for dx in -2..=2 {
                assert!(world.store().get(ChunkKey::new(dx, dz)).is_some());
            }
        }
        // Every chunk claimed exactly one generation job (pools not started,
        // so the jobs are still queued and countable).
        assert_eq!(world.queued_generation_jobs(), 25);

        // An identical tick queues nothing new and unloads nothing.
        world.update_streaming(8, 8, 2);
        assert_eq!(world.store().len(), 25);
        assert_eq!(world.queued_generation_jobs(), 25);
    }

    #[test]
    fn update_streaming_unloads_chunks_out_of_radius() {
        let mut world = test_world();
        world.update_streaming(0, 0, 1);
        assert_eq!(world.store().len(), 9);

        world.update_streaming(CHUNK_SIZE_X * 10, 0, 1);
        assert_eq!(world.store().len(), 9);
        assert!(world.store().get(ChunkKey::new(0, 0)).is_none());
        assert!(world.store().get(ChunkKey::new(10, 0)).is_some());
    }

    fn drain_dirty_mesh(world: &VoxelWorld) {
        for chunk in world.store().snapshot_all() {
            chunk.consume_dirty_mesh();
        }
    }

    fn dirty_mesh_keys(world: &VoxelWorld) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = world
            .store()
            .snapshot_all()
            .into_iter()
            .filter(|c| c.consume_dirty_mesh())
            .map(|c| c.key())
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn face_edit_marks_one_neighbor() {
        let mut world = test_world();
        world.update_streaming(0, 0, 1);
        drain_dirty_mesh(&world);

        // lx == 0 face of chunk (0, 0): only the -x neighbor plus the edited
        // chunk itself go dirty.
        world.set_block(0, 10, 5, BlockId::ROCK);
        assert_eq!(
            dirty_mesh_keys(&world),
            vec![ChunkKey::new(-1, 0), ChunkKey::new(0, 0)]
        );
    }

    #[test]
    fn corner_edit_marks_two_neighbors() {
        let mut world = test_world();
        world.update_streaming(0, 0, 1);
        drain_dirty_mesh(&world);

        world.set_block(0, 10, 0, BlockId::ROCK);
        assert_eq!(
            dirty_mesh_keys(&world),
            vec![
                ChunkKey::new(-1, 0),
                ChunkKey::new(0, -1),
                ChunkKey::new(0, 0)
            ]
        );
    }

    #[test]
    fn interior_edit_marks_no_neighbors() {
        let mut world = test_world();
        world.update_streaming(0, 0, 1);
        drain_dirty_mesh(&world);

        world.set_block(5, 10, 5, BlockId::ROCK);
        assert_eq!(dirty_mesh_keys(&world), vec![ChunkKey::new(0, 0)]);
    }

    #[test]
    fn edge_edit_skips_unloaded_neighbors() {
        let world = test_world();
        // No streaming tick: only the edited chunk exists afterwards.
        world.set_block(0, 10, 5, BlockId::ROCK);
        assert_eq!(world.store().len(), 1);
        assert_eq!(dirty_mesh_keys(&world), vec![ChunkKey::new(0, 0)]);
    }

    #[test]
    fn config_from_toml_fills_missing_keys_with_defaults() {
        let config = WorldConfig::from_toml_str("gen_threads = 3\nseed = 99\n").unwrap();
        assert_eq!(config.gen_threads, 3);
        assert_eq!(config.mesh_threads, 1);
        assert_eq!(config.view_radius, 6);
        assert_eq!(config.seed, 99);
    }
}
