//! Explicitly owned worker pool.
//!
//! A [`WorkerPool`] is built once and passed by reference into every
//! concurrent operation. It is never a process-wide singleton: dropping or
//! [`shutdown`](WorkerPool::shutdown)-ing it ends its workers.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::config::PoolConfig;
use crate::error::{panic_message, Error, Result};

/// Fixed-size set of worker threads backed by a dedicated rayon pool.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    size: usize,
    live_workers: Arc<(Mutex<usize>, Condvar)>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl WorkerPool {
    /// Starts the workers. Fails with [`Error::InvalidThreadCount`] for zero threads.
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.check()?;
        let size = config.resolved_threads();
        let live_workers = Arc::new((Mutex::new(size), Condvar::new()));

        let exited = Arc::clone(&live_workers);
        let prefix = config.thread_name_prefix;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .exit_handler(move |_| {
                let (count, cvar) = &*exited;
                *count.lock() -= 1;
                cvar.notify_all();
            })
            .build()?;

        tracing::info!(threads = size, "Worker pool started");
        Ok(Self {
            pool,
            size,
            live_workers,
        })
    }

    /// Pool with exactly `num_threads` workers and default naming.
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::new(PoolConfig::with_threads(num_threads))
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `task` on a worker. The returned handle yields its result.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        self.pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(task));
            // The handle may have been dropped; nobody is waiting then.
            let _ = tx.send(result);
        });
        TaskHandle { rx }
    }

    /// Runs `op` inside a scope whose spawned tasks may borrow from the caller.
    /// Returns once every spawned task has finished.
    pub fn scope<'scope, OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce(&rayon::Scope<'scope>) -> R + Send,
        R: Send,
    {
        self.pool.scope(op)
    }

    /// Consumes the pool and blocks until every worker thread has exited.
    ///
    /// Queued tasks still run before the workers stop.
    pub fn shutdown(self) {
        let Self {
            pool, live_workers, ..
        } = self;
        drop(pool);

        let (count, cvar) = &*live_workers;
        let mut live = count.lock();
        while *live > 0 {
            cvar.wait(&mut live);
        }
        tracing::debug!("Worker pool shut down");
    }
}

/// Pending result of a task passed to [`WorkerPool::submit`].
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: mpsc::Receiver<std::thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task finishes. A panicking task yields
    /// [`Error::TaskPanicked`].
    pub fn join(self) -> Result<T> {
        match self.rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(Error::TaskPanicked {
                message: panic_message(payload.as_ref()),
            }),
            Err(_) => Err(Error::TaskPanicked {
                message: "task was dropped before completing".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_pool_size() {
        let pool = WorkerPool::with_threads(3).unwrap();
        assert_eq!(pool.size(), 3);
        pool.shutdown();
    }

    #[test]
    fn test_zero_threads_is_rejected() {
        assert!(matches!(
            WorkerPool::with_threads(0),
            Err(Error::InvalidThreadCount { threads: 0 })
        ));
    }

    #[test]
    fn test_submit_returns_value() {
        let pool = WorkerPool::with_threads(2).unwrap();
        let handles: Vec<_> = (0..10).map(|i| pool.submit(move || i * i)).collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, (0..10).map(|i| i * i).collect::<Vec<_>>());
        pool.shutdown();
    }

    #[test]
    fn test_panicking_task_is_reported() {
        let pool = WorkerPool::with_threads(1).unwrap();
        let handle = pool.submit(|| -> u32 { panic!("worker exploded") });
        match handle.join() {
            Err(Error::TaskPanicked { message }) => assert_eq!(message, "worker exploded"),
            other => panic!("unexpected {other:?}"),
        }
        // the worker survives the panic
        assert_eq!(pool.submit(|| 7).join().unwrap(), 7);
        pool.shutdown();
    }

    #[test]
    fn test_workers_are_named() {
        let pool = WorkerPool::new(PoolConfig {
            num_threads: Some(1),
            thread_name_prefix: "resampler".to_string(),
        })
        .unwrap();
        let name = pool
            .submit(|| std::thread::current().name().map(str::to_string))
            .join()
            .unwrap();
        assert_eq!(name.as_deref(), Some("resampler-0"));
        pool.shutdown();
    }

    #[test]
    fn test_scope_borrows_and_joins() {
        let pool = WorkerPool::with_threads(4).unwrap();
        let counter = AtomicUsize::new(0);
        pool.scope(|s| {
            for _ in 0..32 {
                s.spawn(|_| {
                    counter.fetch_add(1, Ordering::Relaxed);
                });
            }
        });
        assert_eq!(counter.load(Ordering::Relaxed), 32);
        pool.shutdown();
    }

    #[test]
    fn test_shutdown_runs_queued_tasks() {
        let pool = WorkerPool::with_threads(1).unwrap();
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let done = Arc::clone(&done);
            drop(pool.submit(move || done.fetch_add(1, Ordering::SeqCst)));
        }
        pool.shutdown();
        assert_eq!(done.load(Ordering::SeqCst), 8);
    }
}
