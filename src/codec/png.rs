use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use image::ImageEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::BlendError;

/// Boundary between the compositing core and a container format.
///
/// Implementations turn encoded bytes into straight-alpha RGBA8 buffers and back. Errors are
/// plain `anyhow` errors; the dispatcher attaches the input or output identity.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<PixelBuffer>;
    fn encode(&self, image: &PixelBuffer, hints: EncodeHints) -> anyhow::Result<Vec<u8>>;
}

/// PNG filter strategy passed through to the encoder.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterHint {
    #[default]
    NoFilter,
    Sub,
    Up,
    Avg,
    Paeth,
    Adaptive,
}

impl FilterHint {
    pub const ALL: [FilterHint; 6] = [
        FilterHint::NoFilter,
        FilterHint::Sub,
        FilterHint::Up,
        FilterHint::Avg,
        FilterHint::Paeth,
        FilterHint::Adaptive,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FilterHint::NoFilter => "nofilter",
            FilterHint::Sub => "sub",
            FilterHint::Up => "up",
            FilterHint::Avg => "avg",
            FilterHint::Paeth => "paeth",
            FilterHint::Adaptive => "adaptive",
        }
    }

    fn to_png(self) -> FilterType {
        match self {
            FilterHint::NoFilter => FilterType::NoFilter,
            FilterHint::Sub => FilterType::Sub,
            FilterHint::Up => FilterType::Up,
            FilterHint::Avg => FilterType::Avg,
            FilterHint::Paeth => FilterType::Paeth,
            FilterHint::Adaptive => FilterType::Adaptive,
        }
    }
}

/// PNG deflate effort passed through to the encoder.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CompressionHint {
    #[default]
    Fast,
    Default,
    Best,
}

impl CompressionHint {
    pub const ALL: [CompressionHint; 3] = [
        CompressionHint::Fast,
        CompressionHint::Default,
        CompressionHint::Best,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            CompressionHint::Fast => "fast",
            CompressionHint::Default => "default",
            CompressionHint::Best => "best",
        }
    }

    fn to_png(self) -> CompressionType {
        match self {
            CompressionHint::Fast => CompressionType::Fast,
            CompressionHint::Default => CompressionType::Default,
            CompressionHint::Best => CompressionType::Best,
        }
    }
}

macro_rules! named_hint {
    ($ty:ident, $what:literal) => {
        impl FromStr for $ty {
            type Err = BlendError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim();
                $ty::ALL
                    .into_iter()
                    .find(|h| h.name().eq_ignore_ascii_case(key))
                    .ok_or_else(|| BlendError::config(format!("unknown {} '{s}'", $what)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_hint!(FilterHint, "png filter");
named_hint!(CompressionHint, "png compression");

/// Opaque encoder tuning forwarded to the codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeHints {
    pub filter: FilterHint,
    pub compression: CompressionHint,
}

/// PNG codec backed by the `image` crate. Any PNG color type decodes to RGBA8; output is
/// always 8-bit RGBA.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<PixelBuffer> {
        let dyn_img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .context("decode png from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(PixelBuffer::from_raw(width, height, rgba.into_raw())?)
    }

    fn encode(&self, image: &PixelBuffer, hints: EncodeHints) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut out, hints.compression.to_png(), hints.filter.to_png());
        encoder
            .write_image(
                image.as_bytes(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .context("encode png")?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/png.rs"]
mod tests;
