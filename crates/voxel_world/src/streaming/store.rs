//! Concurrent chunk map.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::chunk::Chunk;
use crate::coords::ChunkKey;

/// Concurrent map of loaded chunks.
///
/// Values are shared handles: a job that is still generating or meshing a
/// chunk keeps it alive after [`remove`](Self::remove), the store merely
/// stops handing it out. Readers ([`get`](Self::get),
/// [`snapshot_all`](Self::snapshot_all)) take the shared lock and run
/// concurrently; mutations serialize on the exclusive lock.
#[derive(Default)]
pub struct ChunkStore {
    chunks: RwLock<HashMap<ChunkKey, Arc<Chunk>>>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a loaded chunk.
    pub fn get(&self, key: ChunkKey) -> Option<Arc<Chunk>> {
        self.chunks.read().get(&key).cloned()
    }

    /// Returns the chunk at `key`, creating it if absent.
    ///
    /// Double-checked: a shared-lock probe first, then an exclusive insert
    /// that re-checks, so racing callers all receive the same instance.
    pub fn get_or_create(&self, key: ChunkKey) -> Arc<Chunk> {
        if let Some(chunk) = self.chunks.read().get(&key) {
            return Arc::clone(chunk);
        }
        let mut chunks = self.chunks.write();
        Arc::clone(
            chunks
                .entry(key)
                .or_insert_with(|| Arc::new(Chunk::new(key))),
        )
    }

    /// Unloads the chunk at `key`.
    ///
    /// Handles held elsewhere stay valid; the chunk is destroyed when the
    /// last one drops.
    pub fn remove(&self, key: ChunkKey) {
        self.chunks.write().remove(&key);
    }

    /// Copies out handles to every loaded chunk.
    ///
    /// The returned list is independent of the store, so callers can do
    /// expensive per-chunk work without holding the store lock.
    pub fn snapshot_all(&self) -> Vec<Arc<Chunk>> {
        self.chunks.read().values().cloned().collect()
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }
}
