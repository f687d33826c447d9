//! Bounded-parallel processing of scan tasks
//!
//! [`ProcessEngine`] fans tasks out to a [`WorkerPool`], catches each task's
//! failure at the task boundary and joins on every result before returning.
//!
//! ```text
//! Created ──process_all──▶ Running ──join──▶ Idle ──shutdown──▶ Shutdown
//!                             ▲                │
//!                             └──process_all───┘
//! ```

use crossbeam::channel::{Receiver, Sender, unbounded};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

use super::processor::TaskProcessor;
use super::types::{ProcessResult, ResultSet, ScanTask};
use crate::parallel::{PoolError, WorkerPool};

/// Progress callback: (completed, total, worker_id)
pub type ProgressFn = dyn Fn(usize, usize, usize) + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Created,
    Running,
    Idle,
    Shutdown,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("process engine has already been shut down")]
    AlreadyShutdown,

    #[error("worker results lost: expected {expected}, received {received}")]
    WorkerLost { expected: usize, received: usize },

    #[error(transparent)]
    Pool(#[from] PoolError),
}

pub struct ProcessEngine {
    processor: Arc<dyn TaskProcessor>,
    pool_size: usize,
    pool: Option<WorkerPool>,
    state: EngineState,
    progress: Option<Arc<ProgressFn>>,
}

impl ProcessEngine {
    /// Create an engine; the pool is started on the first non-empty batch
    pub fn new<P>(processor: P, pool_size: usize) -> Self
    where
        P: TaskProcessor + 'static,
    {
        Self {
            processor: Arc::new(processor),
            pool_size: pool_size.max(1),
            pool: None,
            state: EngineState::Created,
            progress: None,
        }
    }

    /// Report progress after each completed task
    pub fn with_progress<F>(mut self, reporter: F) -> Self
    where
        F: Fn(usize, usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(reporter));
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Number of worker threads the pool runs with
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Run the processor over every task and block until all have a result.
    ///
    /// Returns exactly one result per task, in submission order. Empty input
    /// returns immediately without touching the pool.
    pub fn process_all(&mut self, tasks: Vec<ScanTask>) -> Result<ResultSet, EngineError> {
        if self.state == EngineState::Shutdown {
            return Err(EngineError::AlreadyShutdown);
        }
        if tasks.is_empty() {
            tracing::debug!("No tasks submitted, skipping dispatch");
            return Ok(ResultSet::default());
        }

        let pool = match self.pool.take() {
            Some(pool) => pool,
            None => WorkerPool::new(self.pool_size)?,
        };

        self.state = EngineState::Running;
        tracing::info!(
            "Processing {} task(s) on {} worker(s)",
            tasks.len(),
            pool.size()
        );

        let outcome = self.dispatch(&pool, tasks);

        self.pool = Some(pool);
        self.state = EngineState::Idle;
        outcome
    }

    /// Release the worker pool. No further operations are accepted.
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        if self.state == EngineState::Shutdown {
            return Err(EngineError::AlreadyShutdown);
        }
        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
        }
        self.state = EngineState::Shutdown;
        Ok(())
    }

    fn dispatch(&self, pool: &WorkerPool, tasks: Vec<ScanTask>) -> Result<ResultSet, EngineError> {
        let total = tasks.len();
        let (result_tx, result_rx): (
            Sender<(usize, ProcessResult)>,
            Receiver<(usize, ProcessResult)>,
        ) = unbounded();
        let completed = Arc::new(AtomicUsize::new(0));

        for (index, task) in tasks.into_iter().enumerate() {
            let processor = self.processor.clone();
            let result_tx = result_tx.clone();
            let completed = completed.clone();
            let progress = self.progress.clone();

            pool.execute(move |worker_id| {
                let result = run_isolated(processor.as_ref(), task);

                // Report before sending so no callback outlives the join
                let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(reporter) = progress {
                    let reported =
                        panic::catch_unwind(AssertUnwindSafe(|| reporter(current, total, worker_id)));
                    if let Err(payload) = reported {
                        tracing::error!(
                            "Progress reporter panicked at {current}/{total}: {}",
                            panic_message(payload.as_ref())
                        );
                    }
                }

                if result_tx.send((index, result)).is_err() {
                    tracing::trace!("Result for task {index} dropped, collector gone");
                }
            })?;
        }

        // Drop our sender so the collector sees disconnection if a job is lost
        drop(result_tx);

        collect_results(result_rx, total)
    }
}

impl std::fmt::Debug for ProcessEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessEngine")
            .field("pool_size", &self.pool_size)
            .field("state", &self.state)
            .field("pool", &self.pool)
            .finish()
    }
}

/// Run one task, turning an error or panic into a failed result
fn run_isolated(processor: &dyn TaskProcessor, task: ScanTask) -> ProcessResult {
    match panic::catch_unwind(AssertUnwindSafe(|| processor.process(&task))) {
        Ok(Ok(result)) => {
            if result.task() != &task {
                tracing::warn!(
                    "Processor returned a result for {} while handling {}",
                    result.task().path().display(),
                    task.path().display()
                );
                return result.with_task(task);
            }
            result
        }
        Ok(Err(e)) => {
            tracing::warn!("Processing {} failed: {e:#}", task.path().display());
            ProcessResult::failure(task, format!("processing failed: {e:#}"))
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::error!("Processing {} panicked: {reason}", task.path().display());
            ProcessResult::failure(task, format!("processing panicked: {reason}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn collect_results(
    result_rx: Receiver<(usize, ProcessResult)>,
    total: usize,
) -> Result<ResultSet, EngineError> {
    let mut slots: Vec<Option<ProcessResult>> = vec![None; total];
    let mut received = 0;

    while received < total {
        match result_rx.recv() {
            Ok((index, result)) => {
                if slots[index].replace(result).is_none() {
                    received += 1;
                }
            }
            Err(_) => break,
        }
    }

    if received < total {
        return Err(EngineError::WorkerLost {
            expected: total,
            received,
        });
    }

    Ok(ResultSet::from(
        slots.into_iter().flatten().collect::<Vec<_>>(),
    ))
}
