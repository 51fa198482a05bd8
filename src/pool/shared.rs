//! Process-wide worker pool.
//!
//! The pool is created lazily by the first threaded call and sized by that call's thread count.
//! Later calls reuse it; a call asking for more workers than the current pool has replaces it
//! with a larger one (never a smaller one). Callers hold an `Arc` for the duration of their
//! fan-out, so a replaced pool is only released after its in-flight units have drained.

use std::sync::{Arc, PoisonError, RwLock};

use crate::foundation::error::BlendResult;
use crate::meta::MAX_THREAD_POOL_SIZE;
use crate::pool::worker_pool::{PoolStatus, WorkerPool};

static SHARED: RwLock<Option<Arc<WorkerPool>>> = RwLock::new(None);

/// Return the shared pool, creating or growing it to serve `num_threads` strips.
///
/// The pool size is capped at [`MAX_THREAD_POOL_SIZE`].
pub fn acquire(num_threads: usize) -> BlendResult<Arc<WorkerPool>> {
    let wanted = num_threads.clamp(1, MAX_THREAD_POOL_SIZE);

    {
        let guard = SHARED.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(pool) = guard.as_ref()
            && pool.size() >= wanted
        {
            return Ok(Arc::clone(pool));
        }
    }

    let mut guard = SHARED.write().unwrap_or_else(PoisonError::into_inner);
    // Another caller may have grown the pool while we waited for the write lock.
    if let Some(pool) = guard.as_ref()
        && pool.size() >= wanted
    {
        return Ok(Arc::clone(pool));
    }

    let previous = guard.as_ref().map(|p| p.size());
    let pool = Arc::new(WorkerPool::new(wanted)?);
    tracing::debug!(?previous, size = wanted, "shared worker pool configured");
    *guard = Some(Arc::clone(&pool));
    Ok(pool)
}

/// Status of the shared pool; all zeros when no threaded call has created it yet.
pub fn status() -> PoolStatus {
    SHARED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|p| p.status())
        .unwrap_or_default()
}

/// Detach the shared pool. Its workers exit once every in-flight call has released it.
///
/// Returns `true` when a pool was detached.
pub fn shutdown() -> bool {
    let detached = SHARED
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if let Some(pool) = &detached {
        tracing::debug!(size = pool.size(), "shared worker pool detached");
    }
    detached.is_some()
}
