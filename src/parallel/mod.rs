//! Generic parallel execution infrastructure
//!
//! This module owns **thread management** only: a fixed-size worker pool that
//! runs boxed jobs pulled from a bounded crossbeam channel. It knows nothing
//! about files, scan tasks or results.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Client        │    │   WorkerPool     │    │   OS threads    │
//! │   (Engine)      │───▶│                  │───▶│                 │
//! │                 │    │ • job queue      │    │ minibatch-      │
//! │ • Task fan-out  │    │ • worker ids     │    │   worker-0..N   │
//! │ • Result fan-in │    │ • shutdown/join  │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use minibatch::parallel::WorkerPool;
//!
//! let mut pool = WorkerPool::new(4)?;
//! pool.execute(|worker_id| println!("hello from worker-{worker_id}"))?;
//! pool.shutdown();
//! # Ok::<(), minibatch::parallel::PoolError>(())
//! ```

pub mod pool;

pub use pool::{PoolError, WorkerPool};

/// Resolve a configured worker count, where 0 means one worker per CPU core
pub fn resolve_workers(configured: usize) -> usize {
    if configured > 0 {
        configured
    } else {
        std::cmp::max(1, num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_workers() {
        assert_eq!(resolve_workers(4), 4);
        assert!(resolve_workers(0) >= 1);
    }
}
