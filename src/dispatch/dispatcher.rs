use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::batch::pipeline::{blend_multiple, resolve_steps};
use crate::benchmark::{Benchmark, Phase};
use crate::blend::algorithms::Algorithm;
use crate::codec::png::{ImageCodec, PngCodec};
use crate::compose::compositor::composite;
use crate::dispatch::options::BlendOptions;
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{BlendError, BlendResult};
use crate::pool::shared;
use crate::pool::worker_pool::PoolStatus;

/// Blend two decoded buffers with `opts.algorithm`.
pub fn blend_pair(
    bg: &PixelBuffer,
    fg: &PixelBuffer,
    opts: &BlendOptions,
) -> BlendResult<PixelBuffer> {
    opts.validate()?;
    composite(bg, fg, opts.algorithm, opts.num_threads)
}

/// Fold a batch of decoded buffers; `per_step` overrides `opts.algorithm` when present.
pub fn blend_batch(
    images: &[PixelBuffer],
    per_step: Option<&[Algorithm]>,
    opts: &BlendOptions,
) -> BlendResult<PixelBuffer> {
    opts.validate()?;
    blend_multiple(images, opts.algorithm, per_step, opts.num_threads)
}

/// Snapshot of the shared worker pool.
pub fn pool_status() -> PoolStatus {
    shared::status()
}

/// Where an encoded input image comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on the local file system.
    Path(PathBuf),
    /// Bytes already in memory, with a name used in error messages.
    Bytes { name: String, bytes: Vec<u8> },
}

impl ImageSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Bytes {
            name: name.into(),
            bytes,
        }
    }

    /// Identity reported in decode errors.
    pub fn identity(&self) -> String {
        self.to_string()
    }

    fn load(&self) -> anyhow::Result<Cow<'_, [u8]>> {
        match self {
            Self::Path(path) => std::fs::read(path)
                .map(Cow::Owned)
                .with_context(|| format!("read '{}'", path.display())),
            Self::Bytes { bytes, .. } => Ok(Cow::Borrowed(bytes)),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bytes { name, .. } => f.write_str(name),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Identity used for encode errors when the output stays in memory.
const IN_MEMORY_OUTPUT: &str = "<memory>";

/// Top-level entry for encoded images: decode, blend, encode.
///
/// Options and batch shape are validated before any input is read. The shared worker pool is
/// created by the first call with `num_threads > 1`.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher<C = PngCodec> {
    codec: C,
}

impl Dispatcher<PngCodec> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: ImageCodec> Dispatcher<C> {
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Read and decode one input.
    pub fn decode(&self, source: &ImageSource) -> BlendResult<PixelBuffer> {
        source
            .load()
            .and_then(|bytes| self.codec.decode(&bytes))
            .map_err(|e| BlendError::decode(source.identity(), e))
    }

    /// Blend a pair and return the encoded result.
    #[tracing::instrument(skip_all, fields(bg = %bg, fg = %fg, algorithm = %opts.algorithm))]
    pub fn blend_pair(
        &self,
        bg: &ImageSource,
        fg: &ImageSource,
        opts: &BlendOptions,
    ) -> BlendResult<Vec<u8>> {
        let mut bench = Benchmark::new();
        let image = self.pair_image(bg, fg, opts, &mut bench)?;
        self.encode(&image, opts, IN_MEMORY_OUTPUT, &mut bench)
    }

    /// Blend a batch and return the encoded result.
    pub fn blend_batch(
        &self,
        images: &[ImageSource],
        per_step: Option<&[Algorithm]>,
        opts: &BlendOptions,
    ) -> BlendResult<Vec<u8>> {
        self.blend_batch_timed(images, per_step, opts, &mut Benchmark::new())
    }

    /// [`Dispatcher::blend_batch`], charging decode, blend and encode time to `bench`.
    #[tracing::instrument(skip_all, fields(images = images.len(), algorithm = %opts.algorithm))]
    pub fn blend_batch_timed(
        &self,
        images: &[ImageSource],
        per_step: Option<&[Algorithm]>,
        opts: &BlendOptions,
        bench: &mut Benchmark,
    ) -> BlendResult<Vec<u8>> {
        let image = self.batch_image(images, per_step, opts, bench)?;
        self.encode(&image, opts, IN_MEMORY_OUTPUT, bench)
    }

    /// Blend a pair and write the PNG to `out`.
    pub fn blend_pair_to_file(
        &self,
        bg: &ImageSource,
        fg: &ImageSource,
        out: &Path,
        opts: &BlendOptions,
    ) -> BlendResult<()> {
        let mut bench = Benchmark::new();
        let image = self.pair_image(bg, fg, opts, &mut bench)?;
        self.write(&image, opts, out, &mut bench)
    }

    /// Blend a batch and write the PNG to `out`.
    pub fn blend_batch_to_file(
        &self,
        images: &[ImageSource],
        per_step: Option<&[Algorithm]>,
        out: &Path,
        opts: &BlendOptions,
    ) -> BlendResult<()> {
        let mut bench = Benchmark::new();
        let image = self.batch_image(images, per_step, opts, &mut bench)?;
        self.write(&image, opts, out, &mut bench)
    }

    fn pair_image(
        &self,
        bg: &ImageSource,
        fg: &ImageSource,
        opts: &BlendOptions,
        bench: &mut Benchmark,
    ) -> BlendResult<PixelBuffer> {
        opts.validate()?;
        let (bg, fg) = bench.time(Phase::Decode, || -> BlendResult<_> {
            Ok((self.decode(bg)?, self.decode(fg)?))
        })?;
        bench.time(Phase::Blend, || {
            composite(&bg, &fg, opts.algorithm, opts.num_threads)
        })
    }

    fn batch_image(
        &self,
        sources: &[ImageSource],
        per_step: Option<&[Algorithm]>,
        opts: &BlendOptions,
        bench: &mut Benchmark,
    ) -> BlendResult<PixelBuffer> {
        opts.validate()?;
        if sources.len() < 2 {
            return Err(BlendError::InsufficientImages {
                count: sources.len(),
            });
        }
        resolve_steps(sources.len(), opts.algorithm, per_step)?;

        let images = bench.time(Phase::Decode, || {
            sources
                .iter()
                .map(|s| self.decode(s))
                .collect::<BlendResult<Vec<_>>>()
        })?;
        bench.time(Phase::Blend, || {
            blend_multiple(&images, opts.algorithm, per_step, opts.num_threads)
        })
    }

    fn encode(
        &self,
        image: &PixelBuffer,
        opts: &BlendOptions,
        output: &str,
        bench: &mut Benchmark,
    ) -> BlendResult<Vec<u8>> {
        bench
            .time(Phase::Encode, || self.codec.encode(image, opts.hints()))
            .map_err(|e| BlendError::encode(output, e))
    }

    fn write(
        &self,
        image: &PixelBuffer,
        opts: &BlendOptions,
        out: &Path,
        bench: &mut Benchmark,
    ) -> BlendResult<()> {
        let output = out.display().to_string();
        let bytes = self.encode(image, opts, &output, bench)?;
        bench
            .time(Phase::Encode, || std::fs::write(out, &bytes))
            .with_context(|| format!("write '{output}'"))
            .map_err(|e| BlendError::encode(output.as_str(), e))?;
        tracing::debug!(out = %output, bytes = bytes.len(), "wrote png");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/dispatcher.rs"]
mod tests;
