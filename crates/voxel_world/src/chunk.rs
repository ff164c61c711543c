//! Chunk - one fixed-size column of voxel data with lifecycle state.
//!
//! Voxel and mesh data live behind a per-chunk mutex. Lifecycle state and
//! the two one-shot dirty flags are independent atomics, so pollers (the
//! streaming coordinator, a renderer) never have to touch the data lock to
//! find out whether a chunk needs work.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::block::BlockId;
use crate::coords::{ChunkKey, LocalPos, CHUNK_VOLUME};

/// Lifecycle phase of a chunk.
///
/// A chunk only ever advances `Empty → Generating → ReadyData`; once its
/// data is ready it can cycle `ReadyData ↔ (Meshing → ReadyMesh)` any number
/// of times. It never returns to `Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ChunkState {
    Empty = 0,
    Generating,
    ReadyData,
    Meshing,
    ReadyMesh,
    Unloading,
}

impl ChunkState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Empty,
            1 => Self::Generating,
            2 => Self::ReadyData,
            3 => Self::Meshing,
            4 => Self::ReadyMesh,
            5 => Self::Unloading,
            _ => unreachable!("invalid chunk state {raw}"),
        }
    }
}

/// Placeholder mesh buffers, filled and cleared only by meshing jobs.
///
/// Real vertex layouts and GPU upload live outside this crate; the engine
/// only tracks ownership and lifecycle.
#[derive(Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Discards the mesh contents, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }
}

/// Everything guarded by a chunk's data lock.
#[derive(Debug)]
pub struct ChunkData {
    /// Dense voxel buffer of [`CHUNK_VOLUME`] entries, indexed by
    /// [`LocalPos::index`]. Its length never changes.
    pub blocks: Vec<BlockId>,
    /// Placeholder mesh owned exclusively by this chunk.
    pub mesh: MeshData,
}

/// One chunk column.
pub struct Chunk {
    key: ChunkKey,
    state: AtomicU8,
    dirty_blocks: AtomicBool,
    dirty_mesh: AtomicBool,
    data: Mutex<ChunkData>,
}

impl Chunk {
    /// Creates an all-air chunk at the given grid position.
    pub fn new(key: ChunkKey) -> Self {
        Self {
            key,
            state: AtomicU8::new(ChunkState::Empty as u8),
            // A fresh chunk owes both a data pass and a mesh.
            dirty_blocks: AtomicBool::new(true),
            dirty_mesh: AtomicBool::new(true),
            data: Mutex::new(ChunkData {
                blocks: vec![BlockId::AIR; CHUNK_VOLUME],
                mesh: MeshData::default(),
            }),
        }
    }

    /// The chunk's grid position, fixed at construction.
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChunkState {
        ChunkState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Sets the lifecycle state.
    ///
    /// Plain store: the payload a state refers to is synchronized by the
    /// data lock, the state word is only a phase marker.
    pub fn set_state(&self, state: ChunkState) {
        self.state.store(state as u8, Ordering::Relaxed);
    }

    /// Claims the `Empty → Generating` transition.
    ///
    /// Exactly one caller wins; every other caller, and any chunk already
    /// past `Empty`, gets `false`. This is what keeps a chunk from being
    /// queued for generation twice.
    pub fn try_begin_generating(&self) -> bool {
        self.state
            .compare_exchange(
                ChunkState::Empty as u8,
                ChunkState::Generating as u8,
                Ordering::Relaxed,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    /// Reads one block.
    ///
    /// `pos` must be in range; callers do the world→local conversion and
    /// the hot path does no checking of its own.
    pub fn get(&self, pos: LocalPos) -> BlockId {
        self.data.lock().blocks[pos.index()]
    }

    /// Writes one block and raises both dirty flags.
    pub fn set(&self, pos: LocalPos, id: BlockId) {
        self.data.lock().blocks[pos.index()] = id;
        self.dirty_blocks.store(true, Ordering::Relaxed);
        self.dirty_mesh.store(true, Ordering::Relaxed);
    }

    /// Takes the blocks-dirty event, if one is pending.
    ///
    /// Atomic test-and-clear: each event is observed by at most one caller.
    pub fn consume_dirty_blocks(&self) -> bool {
        self.dirty_blocks.swap(false, Ordering::Relaxed)
    }

    /// Flags the chunk as needing a remesh.
    pub fn mark_dirty_mesh(&self) {
        self.dirty_mesh.store(true, Ordering::Relaxed);
    }

    /// Takes the mesh-dirty event, if one is pending.
    ///
    /// Atomic test-and-clear: each event is observed by at most one caller.
    pub fn consume_dirty_mesh(&self) -> bool {
        self.dirty_mesh.swap(false, Ordering::Relaxed)
    }

    /// Locks the chunk's voxel and mesh data.
    ///
    /// Generation and meshing jobs hold this guard for a whole-buffer pass;
    /// [`get`](Self::get)/[`set`](Self::set) take it per block.
    pub fn data(&self) -> MutexGuard<'_, ChunkData> {
        self.data.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_chunk_is_all_air() {
        let chunk = Chunk::new(ChunkKey::new(3, -2));
        assert_eq!(chunk.key(), ChunkKey::new(3, -2));
        assert_eq!(chunk.state(), ChunkState::Empty);
        assert_eq!(chunk.get(LocalPos::new(0, 0, 0)), BlockId::AIR);
        assert_eq!(chunk.get(LocalPos::new(15, 255, 15)), BlockId::AIR);
        assert_eq!(chunk.data().blocks.len(), CHUNK_VOLUME);
    }

    #[test]
    fn set_marks_both_dirty_flags() {
        let chunk = Chunk::new(ChunkKey::new(0, 0));
        // Drain the construction-time events first.
        chunk.consume_dirty_blocks();
        chunk.consume_dirty_mesh();

        chunk.set(LocalPos::new(1, 2, 3), BlockId::DIRT);
        assert_eq!(chunk.get(LocalPos::new(1, 2, 3)), BlockId::DIRT);
        assert!(chunk.consume_dirty_blocks());
        assert!(chunk.consume_dirty_mesh());
    }

    #[test]
    fn dirty_events_are_observed_once() {
        let chunk = Chunk::new(ChunkKey::new(0, 0));
        assert!(chunk.consume_dirty_mesh());
        assert!(!chunk.consume_dirty_mesh());
        chunk.mark_dirty_mesh();
        assert!(chunk.consume_dirty_mesh());
        assert!(!chunk.consume_dirty_mesh());
    }

    #[test]
    fn only_one_caller_claims_generation() {
        let chunk = Chunk::new(ChunkKey::new(0, 0));
        assert!(chunk.try_begin_generating());
        assert!(!chunk.try_begin_generating());
        assert_eq!(chunk.state(), ChunkState::Generating);
        chunk.set_state(ChunkState::ReadyData);
        assert!(!chunk.try_begin_generating());
    }
}
