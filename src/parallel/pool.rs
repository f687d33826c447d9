use crossbeam::channel::{Receiver, Sender, bounded};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Work item executed on a pool thread; receives the worker id
type Job = Box<dyn FnOnce(usize) + Send + 'static>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("worker pool is closed")]
    Closed,
}

/// Fixed-size pool of worker threads fed from a bounded crossbeam channel.
///
/// Workers live until [`WorkerPool::shutdown`] (or drop), so one pool can
/// serve several batches.
pub struct WorkerPool {
    size: usize,
    work_tx: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers (at least one)
    pub fn new(size: usize) -> Result<Self, PoolError> {
        let size = size.max(1);
        let (work_tx, work_rx): (Sender<Job>, Receiver<Job>) = bounded(size * 2);

        let mut pool = Self {
            size,
            work_tx: Some(work_tx),
            handles: Vec::with_capacity(size),
        };

        for worker_id in 0..size {
            let work_rx = work_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("minibatch-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, work_rx))
                .map_err(PoolError::Spawn)?;
            pool.handles.push(handle);
        }

        tracing::debug!("Started worker pool with {size} thread(s)");
        Ok(pool)
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.size
    }

    /// Queue a job, blocking while the queue is full
    pub fn execute<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce(usize) + Send + 'static,
    {
        let work_tx = self.work_tx.as_ref().ok_or(PoolError::Closed)?;
        work_tx.send(Box::new(job)).map_err(|_| PoolError::Closed)
    }

    /// Close the queue and wait for every worker to drain it and exit
    pub fn shutdown(&mut self) {
        // Dropping the sender ends each worker's recv loop
        if self.work_tx.take().is_none() {
            return;
        }
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::error!("Worker thread exited with a panic");
            }
        }
        tracing::debug!("Worker pool shut down");
    }

    /// True once the queue no longer accepts jobs
    pub fn is_closed(&self) -> bool {
        self.work_tx.is_none()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn worker_loop(worker_id: usize, work_rx: Receiver<Job>) {
    while let Ok(job) = work_rx.recv() {
        // A panicking job must not take the worker down with it
        if panic::catch_unwind(AssertUnwindSafe(|| job(worker_id))).is_err() {
            tracing::error!("Job panicked on worker-{worker_id}");
        }
    }
    tracing::trace!("worker-{worker_id} exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;
    use std::collections::HashSet;

    #[test]
    fn test_pool_runs_all_jobs() {
        let mut pool = WorkerPool::new(3).unwrap();
        let (tx, rx) = unbounded();

        for i in 0..20 {
            let tx = tx.clone();
            pool.execute(move |_worker_id| tx.send(i).unwrap()).unwrap();
        }
        drop(tx);
        pool.shutdown();

        let mut seen: Vec<i32> = rx.iter().collect();
        seen.sort();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_worker_ids_within_pool_size() {
        let mut pool = WorkerPool::new(2).unwrap();
        let (tx, rx) = unbounded();

        for _ in 0..10 {
            let tx = tx.clone();
            pool.execute(move |worker_id| tx.send(worker_id).unwrap()).unwrap();
        }
        drop(tx);
        pool.shutdown();

        let ids: HashSet<usize> = rx.iter().collect();
        assert!(ids.iter().all(|id| *id < 2));
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let pool = WorkerPool::new(0).unwrap();
        assert_eq!(pool.size(), 1);
    }

    #[test]
    fn test_panicking_job_keeps_worker_alive() {
        let mut pool = WorkerPool::new(1).unwrap();
        let (tx, rx) = unbounded();

        pool.execute(|_| panic!("job failure")).unwrap();
        pool.execute(move |_| tx.send("still running").unwrap()).unwrap();
        pool.shutdown();

        assert_eq!(rx.recv().unwrap(), "still running");
    }

    #[test]
    fn test_execute_after_shutdown() {
        let mut pool = WorkerPool::new(1).unwrap();
        pool.shutdown();

        assert!(pool.is_closed());
        assert!(matches!(pool.execute(|_| {}), Err(PoolError::Closed)));
    }
}
