use crate::blend::algorithms::Algorithm;
use crate::compose::compositor::{Execution, check_same_dims, check_threads};
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{BlendError, BlendResult};
use crate::pool::shared;
use crate::pool::worker_pool::WorkerPool;

/// A validated batch: the images plus exactly one algorithm per fold step.
#[derive(Debug)]
pub struct BatchJob<'a> {
    images: &'a [PixelBuffer],
    steps: Vec<Algorithm>,
}

impl<'a> BatchJob<'a> {
    /// Validate a batch up front: image count, step count and geometry.
    ///
    /// `per_step`, when present, overrides `default` and must hold one algorithm per fold
    /// step (`images.len() - 1`).
    pub fn new(
        images: &'a [PixelBuffer],
        default: Algorithm,
        per_step: Option<&[Algorithm]>,
    ) -> BlendResult<Self> {
        if images.len() < 2 {
            return Err(BlendError::InsufficientImages {
                count: images.len(),
            });
        }
        let steps = resolve_steps(images.len(), default, per_step)?;

        let first = &images[0];
        for (index, image) in images.iter().enumerate().skip(1) {
            check_same_dims(first, image, index)?;
        }

        Ok(Self { images, steps })
    }

    pub fn images(&self) -> &[PixelBuffer] {
        self.images
    }

    /// Algorithm applied at each fold step, in order.
    pub fn steps(&self) -> &[Algorithm] {
        &self.steps
    }

    fn fold(&self, exec: Execution<'_>) -> BlendResult<PixelBuffer> {
        let mut acc = self.images[0].clone();
        for (layer, &algorithm) in self.images[1..].iter().zip(&self.steps) {
            acc = exec.composite(&acc, layer, algorithm)?;
        }
        Ok(acc)
    }
}

/// Resolve the per-step algorithm list for a batch of `count` images.
pub(crate) fn resolve_steps(
    count: usize,
    default: Algorithm,
    per_step: Option<&[Algorithm]>,
) -> BlendResult<Vec<Algorithm>> {
    let expected = count.saturating_sub(1);
    match per_step {
        Some(steps) if steps.len() != expected => Err(BlendError::AlgorithmCountMismatch {
            expected,
            found: steps.len(),
        }),
        Some(steps) => Ok(steps.to_vec()),
        None => Ok(vec![default; expected]),
    }
}

/// Fold `images` left to right: `acc = images[0]`, then `acc = composite(acc, images[i])`.
///
/// Every image must share the first image's dimensions; this is checked before any pixel
/// work or pool use.
#[tracing::instrument(level = "debug", skip(images, per_step), fields(images = images.len()))]
pub fn blend_multiple(
    images: &[PixelBuffer],
    algorithm: Algorithm,
    per_step: Option<&[Algorithm]>,
    num_threads: usize,
) -> BlendResult<PixelBuffer> {
    check_threads(num_threads)?;
    let job = BatchJob::new(images, algorithm, per_step)?;
    if num_threads <= 1 {
        return job.fold(Execution::Serial);
    }
    let pool = shared::acquire(num_threads)?;
    job.fold(Execution::new(&pool, num_threads))
}

/// Like [`blend_multiple`], but fans out on an explicitly owned pool.
#[tracing::instrument(level = "debug", skip(pool, images, per_step), fields(images = images.len()))]
pub fn blend_multiple_with(
    pool: &WorkerPool,
    images: &[PixelBuffer],
    algorithm: Algorithm,
    per_step: Option<&[Algorithm]>,
    num_threads: usize,
) -> BlendResult<PixelBuffer> {
    check_threads(num_threads)?;
    let job = BatchJob::new(images, algorithm, per_step)?;
    job.fold(Execution::new(pool, num_threads))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/pipeline.rs"]
mod tests;
