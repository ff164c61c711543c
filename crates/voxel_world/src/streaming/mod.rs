//! Streaming infrastructure: background job execution and the shared chunk map.
//!
//! - [`WorkerPool`]: fixed thread pool draining a FIFO of fire-and-forget jobs
//! - [`ChunkStore`]: concurrent map of loaded chunks, shared with in-flight jobs

mod jobs;
mod store;

pub use jobs::{Job, WorkerPool};
pub use store::ChunkStore;
