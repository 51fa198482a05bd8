//! layerblend composites PNG layers with Porter-Duff style blend algorithms.
//!
//! - Decode two or more images into [`PixelBuffer`]s (or bring your own buffers)
//! - Blend a pair with [`blend_pair`] or fold a batch with [`blend_batch`]
//! - Spread each composite across the shared worker pool by setting
//!   [`BlendOptions::num_threads`]; output is byte-identical for every thread count
//!
//! [`Dispatcher`] wraps the same operations with PNG decode and encode.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod batch;
pub(crate) mod blend;
pub(crate) mod codec;
pub(crate) mod compose;
pub(crate) mod dispatch;

pub mod benchmark;
pub mod meta;
pub mod pool;

pub use crate::foundation::core::{CHANNELS, Dimensions, PixelBuffer, Rgba8};
pub use crate::foundation::error::{BlendError, BlendResult};

pub use crate::batch::pipeline::{BatchJob, blend_multiple, blend_multiple_with};
pub use crate::benchmark::{Benchmark, Phase};
pub use crate::blend::algorithms::{
    Algorithm, BlendFn, alpha, destination_over, disjoint_debug, disjoint_over, disjoint_under,
    first_bottom, first_top, multiplicative, source_over,
};
pub use crate::codec::png::{CompressionHint, EncodeHints, FilterHint, ImageCodec, PngCodec};
pub use crate::compose::compositor::{composite, composite_with};
pub use crate::compose::strips::partition_rows;
pub use crate::dispatch::dispatcher::{
    Dispatcher, ImageSource, blend_batch, blend_pair, pool_status,
};
pub use crate::dispatch::options::BlendOptions;
pub use crate::pool::worker_pool::{PoolStatus, WorkUnit, WorkerPool};
