//! Bounded worker pool for probe tasks.
//!
//! Every submitted task is spawned immediately onto the runtime and parks
//! on a semaphore until one of the `capacity` worker slots frees up. The
//! queue of waiting tasks is unbounded; the number running at once is not.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// A fixed-capacity pool of probe workers.
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    capacity: usize,
    tasks: JoinSet<()>,
}

impl WorkerPool {
    /// Create a pool running at most `capacity` tasks concurrently.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
            tasks: JoinSet::new(),
        }
    }

    /// Maximum number of tasks running at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tasks submitted and not yet reaped, queued or running.
    pub fn active(&self) -> usize {
        self.tasks.len()
    }

    /// Queue a task. It starts once a worker slot is free.
    pub fn submit<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let slots = Arc::clone(&self.slots);
        self.tasks.spawn(async move {
            // The semaphore is never closed while tasks are registered.
            let Ok(_slot) = slots.acquire_owned().await else {
                return;
            };
            task.await;
        });
    }

    /// Wait for every submitted task to finish.
    ///
    /// Returns the number of tasks that panicked; a panic is logged and does
    /// not affect the other tasks.
    pub async fn join_all(&mut self) -> usize {
        let mut failed = 0;
        while let Some(outcome) = self.tasks.join_next().await {
            if let Err(e) = outcome {
                if e.is_panic() {
                    warn!("probe task panicked: {}", e);
                    failed += 1;
                }
            }
        }
        failed
    }

    /// Abort and reap anything still registered.
    pub async fn shutdown(&mut self) {
        self.tasks.shutdown().await;
    }

    /// Abort anything still registered without waiting.
    pub fn abort_all(&mut self) {
        self.tasks.abort_all();
    }
}
