use crate::blend::algorithms::{Algorithm, BlendFn};
use crate::compose::strips::partition_rows;
use crate::foundation::core::{CHANNELS, PixelBuffer};
use crate::foundation::error::{BlendError, BlendResult};
use crate::pool::shared;
use crate::pool::worker_pool::{WorkUnit, WorkerPool};

/// Composite `fg` over `bg` with `algorithm`, using the shared worker pool when
/// `num_threads > 1`.
///
/// The output is bit-identical for every thread count.
#[tracing::instrument(level = "debug", skip(bg, fg), fields(dims = %bg.dimensions()))]
pub fn composite(
    bg: &PixelBuffer,
    fg: &PixelBuffer,
    algorithm: Algorithm,
    num_threads: usize,
) -> BlendResult<PixelBuffer> {
    check_threads(num_threads)?;
    check_same_dims(bg, fg, 1)?;
    if num_threads <= 1 {
        return composite_serial(bg, fg, algorithm);
    }
    let pool = shared::acquire(num_threads)?;
    composite_striped(&pool, bg, fg, algorithm, num_threads)
}

/// Like [`composite`], but fans out on an explicitly owned pool.
#[tracing::instrument(level = "debug", skip(pool, bg, fg), fields(dims = %bg.dimensions()))]
pub fn composite_with(
    pool: &WorkerPool,
    bg: &PixelBuffer,
    fg: &PixelBuffer,
    algorithm: Algorithm,
    num_threads: usize,
) -> BlendResult<PixelBuffer> {
    check_threads(num_threads)?;
    check_same_dims(bg, fg, 1)?;
    Execution::new(pool, num_threads).composite(bg, fg, algorithm)
}

/// How a validated pair is executed: inline on the caller, or striped across a pool.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Execution<'p> {
    Serial,
    Pooled { pool: &'p WorkerPool, strips: usize },
}

impl<'p> Execution<'p> {
    pub(crate) fn new(pool: &'p WorkerPool, num_threads: usize) -> Self {
        if num_threads <= 1 {
            Self::Serial
        } else {
            Self::Pooled {
                pool,
                strips: num_threads,
            }
        }
    }

    /// Inputs must already have been checked for matching dimensions.
    pub(crate) fn composite(
        self,
        bg: &PixelBuffer,
        fg: &PixelBuffer,
        algorithm: Algorithm,
    ) -> BlendResult<PixelBuffer> {
        match self {
            Self::Serial => composite_serial(bg, fg, algorithm),
            Self::Pooled { pool, strips } => composite_striped(pool, bg, fg, algorithm, strips),
        }
    }
}

pub(crate) fn check_threads(num_threads: usize) -> BlendResult<()> {
    if num_threads == 0 {
        return Err(BlendError::config("num_threads must be >= 1"));
    }
    Ok(())
}

pub(crate) fn check_same_dims(
    expected: &PixelBuffer,
    other: &PixelBuffer,
    index: usize,
) -> BlendResult<()> {
    if expected.dimensions() != other.dimensions() {
        return Err(BlendError::DimensionMismatch {
            expected: expected.dimensions(),
            found: other.dimensions(),
            index,
        });
    }
    Ok(())
}

fn composite_serial(
    bg: &PixelBuffer,
    fg: &PixelBuffer,
    algorithm: Algorithm,
) -> BlendResult<PixelBuffer> {
    let mut out = vec![0u8; bg.as_bytes().len()];
    blend_rows(algorithm.kernel(), &mut out, bg.as_bytes(), fg.as_bytes());
    PixelBuffer::from_raw(bg.width(), bg.height(), out)
}

fn composite_striped(
    pool: &WorkerPool,
    bg: &PixelBuffer,
    fg: &PixelBuffer,
    algorithm: Algorithm,
    strips: usize,
) -> BlendResult<PixelBuffer> {
    let dims = bg.dimensions();
    let kernel = algorithm.kernel();
    let row_bytes = bg.row_bytes();

    let mut out = vec![0u8; dims.byte_len()];
    let ranges = partition_rows(dims.height, strips);
    let mut units = Vec::with_capacity(ranges.len());
    let mut rest: &mut [u8] = &mut out;
    for rows in ranges {
        let len = (rows.end - rows.start) as usize * row_bytes;
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(len);
        rest = tail;
        let bg_rows = bg.rows(rows.clone());
        let fg_rows = fg.rows(rows.clone());
        units.push(WorkUnit::new(rows, move || -> BlendResult<()> {
            blend_rows(kernel, head, bg_rows, fg_rows);
            Ok(())
        }));
    }
    tracing::debug!(strips = units.len(), "compositing strips");

    // On failure `out` is dropped here; no partial output escapes.
    pool.run(units)?;
    PixelBuffer::from_raw(dims.width, dims.height, out)
}

fn blend_rows(kernel: BlendFn, out: &mut [u8], bg: &[u8], fg: &[u8]) {
    for ((o, b), f) in out
        .chunks_exact_mut(CHANNELS)
        .zip(bg.chunks_exact(CHANNELS))
        .zip(fg.chunks_exact(CHANNELS))
    {
        let px = kernel([b[0], b[1], b[2], b[3]], [f[0], f[1], f[2], f[3]]);
        o.copy_from_slice(&px);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
