//! Fire-and-forget worker pool.
//!
//! A fixed set of threads drains an unbounded FIFO of boxed closures. Jobs
//! carry no result and cannot be cancelled once started; completion is
//! observed through side effects (chunk state), never through the pool.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::debug;
use parking_lot::{Condvar, Mutex};

/// A queued unit of work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

struct Queue {
    jobs: VecDeque<Job>,
    running: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    ready: Condvar,
}

/// Fixed-size pool of worker threads.
///
/// [`stop`](Self::stop) discards jobs that have not started yet; a stopped
/// pool can be restarted and begins with whatever was enqueued since the
/// stop (the stop itself cleared the queue).
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Creates a pool with no threads; call [`start`](Self::start) to spawn
    /// workers.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue {
                    jobs: VecDeque::new(),
                    running: false,
                }),
                ready: Condvar::new(),
            }),
            workers: Vec::new(),
        }
    }

    /// Spawns `threads` workers.
    ///
    /// A pool that is already running is stopped first, discarding its
    /// queue.
    pub fn start(&mut self, threads: usize) {
        self.stop();
        self.shared.queue.lock().running = true;
        self.workers.reserve(threads);
        for _ in 0..threads {
            let shared = Arc::clone(&self.shared);
            self.workers.push(thread::spawn(move || worker_loop(&shared)));
        }
        debug!("worker pool started with {threads} thread(s)");
    }

    /// Appends a job to the FIFO and wakes one idle worker.
    ///
    /// The queue is unbounded, so enqueueing never blocks and never fails.
    pub fn enqueue(&self, job: Job) {
        self.shared.queue.lock().jobs.push_back(job);
        self.shared.ready.notify_one();
    }

    /// Stops all workers and discards any jobs that have not started.
    ///
    /// Jobs already running finish; queued jobs are dropped unexecuted.
    pub fn stop(&mut self) {
        {
            let mut queue = self.shared.queue.lock();
            if !queue.running {
                return;
            }
            queue.running = false;
        }
        self.shared.ready.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        let dropped = {
            let mut queue = self.shared.queue.lock();
            let dropped = queue.jobs.len();
            queue.jobs.clear();
            dropped
        };
        if dropped > 0 {
            debug!("worker pool stopped, dropped {dropped} queued job(s)");
        }
    }

    /// Number of jobs waiting in the FIFO (jobs currently being run are not
    /// counted).
    pub fn queued_len(&self) -> usize {
        self.shared.queue.lock().jobs.len()
    }

    /// Whether the pool currently has workers accepting jobs.
    pub fn is_running(&self) -> bool {
        self.shared.queue.lock().running
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            loop {
                // Exit as soon as the pool stops, even with jobs queued.
                if !queue.running {
                    return;
                }
                match queue.jobs.pop_front() {
                    Some(job) => break job,
                    None => shared.ready.wait(&mut queue),
                }
            }
        };
        job();
    }
}
