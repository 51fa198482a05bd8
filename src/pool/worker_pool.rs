use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::foundation::error::{BlendError, BlendResult};

/// Point-in-time view of a [`WorkerPool`].
///
/// `active_count + idle_count == configured_size` holds for every snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PoolStatus {
    /// Number of long-lived worker threads.
    pub configured_size: usize,
    /// Workers currently executing a work unit.
    pub active_count: usize,
    /// Workers waiting for work.
    pub idle_count: usize,
    /// Units submitted to a running fan-out that no worker has picked up yet.
    pub queued_count: usize,
    /// Work units that finished successfully since the pool was created.
    pub completed_units: u64,
    /// Work units that returned an error or panicked since the pool was created.
    pub failed_units: u64,
}

/// One strip of partitioned work: a row range plus the task that processes it.
pub struct WorkUnit<F> {
    pub rows: Range<u32>,
    pub task: F,
}

impl<F> WorkUnit<F> {
    pub fn new(rows: Range<u32>, task: F) -> Self {
        Self { rows, task }
    }
}

#[derive(Debug, Default)]
struct Counters {
    queued: AtomicUsize,
    active: AtomicUsize,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Moves one queued unit to active for as long as it is alive.
struct Claim<'a>(&'a Counters);

impl<'a> Claim<'a> {
    fn acquire(counters: &'a Counters) -> Self {
        counters.active.fetch_add(1, Ordering::AcqRel);
        counters.queued.fetch_sub(1, Ordering::AcqRel);
        Self(counters)
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Fixed-size pool of long-lived worker threads.
///
/// Work is submitted as a batch of [`WorkUnit`]s through [`WorkerPool::run`], which fans the
/// units out to idle workers and blocks until every unit has finished. Idle workers sleep until
/// work arrives; scheduling among them is work-stealing, so no worker is starved while others
/// have queued units.
pub struct WorkerPool {
    threads: rayon::ThreadPool,
    size: usize,
    counters: Counters,
}

impl WorkerPool {
    pub fn new(size: usize) -> BlendResult<Self> {
        if size == 0 {
            return Err(BlendError::config(
                "worker pool size must be a positive number",
            ));
        }
        let threads = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("layerblend-worker-{i}"))
            .build()
            .map_err(|e| BlendError::config(format!("failed to start worker pool: {e}")))?;
        tracing::debug!(size, "worker pool started");
        Ok(Self {
            threads,
            size,
            counters: Counters::default(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn status(&self) -> PoolStatus {
        let active = self.counters.active.load(Ordering::Acquire).min(self.size);
        PoolStatus {
            configured_size: self.size,
            active_count: active,
            idle_count: self.size - active,
            queued_count: self.counters.queued.load(Ordering::Acquire),
            completed_units: self.counters.completed.load(Ordering::Acquire),
            failed_units: self.counters.failed.load(Ordering::Acquire),
        }
    }

    /// Execute every unit on the pool and wait for all of them.
    ///
    /// Units may finish in any order. A unit that errors or panics does not disturb its
    /// siblings; once all units are done the failure with the lowest row start is returned.
    pub fn run<F>(&self, units: Vec<WorkUnit<F>>) -> BlendResult<()>
    where
        F: FnOnce() -> BlendResult<()> + Send,
    {
        if units.is_empty() {
            return Ok(());
        }
        tracing::debug!(units = units.len(), workers = self.size, "fan-out");

        let failures: Mutex<Vec<(u32, BlendError)>> = Mutex::new(Vec::new());
        let counters = &self.counters;
        let failures_ref = &failures;

        self.threads.scope(move |s| {
            for unit in units {
                counters.queued.fetch_add(1, Ordering::AcqRel);
                s.spawn(move |_| {
                    let WorkUnit { rows, task } = unit;
                    let outcome = {
                        let _claim = Claim::acquire(counters);
                        panic::catch_unwind(AssertUnwindSafe(task))
                    };
                    let err = match outcome {
                        Ok(Ok(())) => {
                            counters.completed.fetch_add(1, Ordering::AcqRel);
                            return;
                        }
                        Ok(Err(e)) => e,
                        Err(payload) => BlendError::WorkUnit {
                            rows: rows.clone(),
                            message: panic_message(&*payload),
                        },
                    };
                    counters.failed.fetch_add(1, Ordering::AcqRel);
                    tracing::warn!(rows = ?rows, error = %err, "work unit failed");
                    failures_ref
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((rows.start, err));
                });
            }
        });

        let mut failures = failures
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        failures.sort_by_key(|(start, _)| *start);
        match failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        tracing::debug!(size = self.size, "worker pool released");
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("status", &self.status())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {s}")
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pool/worker_pool.rs"]
mod tests;
