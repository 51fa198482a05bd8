use std::fmt;
use std::ops::Range;

use crate::foundation::error::{BlendError, BlendResult};

/// One straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Bytes per [`Rgba8`] pixel.
pub const CHANNELS: usize = 4;

/// Width and height of a raster, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create a dimension pair.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Number of RGBA8 bytes covered.
    pub fn byte_len(self) -> usize {
        self.pixel_count().saturating_mul(CHANNELS)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Decoded straight-alpha RGBA8 raster, row-major.
///
/// Invariant: `width > 0`, `height > 0` and `data.len() == width * height * 4`.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    dims: Dimensions,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> BlendResult<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Buffer with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> BlendResult<Self> {
        let dims = checked_dims(width, height)?;
        Ok(Self {
            dims,
            data: px.repeat(dims.pixel_count()),
        })
    }

    /// Wrap raw RGBA8 bytes, validating the length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> BlendResult<Self> {
        let dims = checked_dims(width, height)?;
        if data.len() != dims.byte_len() {
            return Err(BlendError::buffer(format!(
                "{dims} raster needs {} bytes, got {}",
                dims.byte_len(),
                data.len()
            )));
        }
        Ok(Self { dims, data })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba8) -> BlendResult<Self> {
        let dims = checked_dims(width, height)?;
        let mut data = Vec::with_capacity(dims.byte_len());
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self { dims, data })
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Bytes in one row.
    pub fn row_bytes(&self) -> usize {
        self.dims.width as usize * CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        let i = (y as usize * self.dims.width as usize + x as usize) * CHANNELS;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Raw bytes of the half-open row range `rows`.
    pub(crate) fn rows(&self, rows: Range<u32>) -> &[u8] {
        let rb = self.row_bytes();
        &self.data[rows.start as usize * rb..rows.end as usize * rb]
    }

    /// Stable 64-bit digest of dimensions and pixel bytes.
    pub fn fingerprint(&self) -> u64 {
        let mut h = xxhash_rust::xxh3::Xxh3::new();
        h.update(&self.dims.width.to_le_bytes());
        h.update(&self.dims.height.to_le_bytes());
        h.update(&self.data);
        h.digest()
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("dims", &self.dims)
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint()))
            .finish()
    }
}

fn checked_dims(width: u32, height: u32) -> BlendResult<Dimensions> {
    if width == 0 || height == 0 {
        return Err(BlendError::buffer(format!(
            "dimensions must be non-zero, got {width}x{height}"
        )));
    }
    Ok(Dimensions::new(width, height))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
