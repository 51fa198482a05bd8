use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgba8;
use crate::foundation::error::BlendError;
use crate::foundation::math::{premultiply, quantize, unit, unpremultiply};

/// Per-pixel blend kernel: `(background, foreground) -> output`.
pub type BlendFn = fn(Rgba8, Rgba8) -> Rgba8;

/// Closed set of compositing algorithms.
///
/// All kernels operate on straight-alpha RGBA8 and never look at pixel position.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Porter-Duff "over": foreground drawn over background.
    #[default]
    SourceOver,
    /// Background drawn over foreground.
    DestinationOver,
    /// Linear interpolation from background to foreground by foreground alpha.
    Alpha,
    /// Component-wise color product with "over" alpha.
    Multiplicative,
    /// Foreground wherever it has any coverage.
    FirstTop,
    /// Background wherever it has any coverage.
    FirstBottom,
    /// Porter-Duff disjoint-over.
    DisjointOver,
    /// Porter-Duff disjoint-under.
    DisjointUnder,
    /// Disjoint coverage visualization (red: overlapping, green: disjoint).
    DisjointDebug,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::SourceOver,
        Algorithm::DestinationOver,
        Algorithm::Alpha,
        Algorithm::Multiplicative,
        Algorithm::FirstTop,
        Algorithm::FirstBottom,
        Algorithm::DisjointOver,
        Algorithm::DisjointUnder,
        Algorithm::DisjointDebug,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::SourceOver => "source_over",
            Algorithm::DestinationOver => "destination_over",
            Algorithm::Alpha => "alpha",
            Algorithm::Multiplicative => "multiplicative",
            Algorithm::FirstTop => "first_top",
            Algorithm::FirstBottom => "first_bottom",
            Algorithm::DisjointOver => "disjoint_over",
            Algorithm::DisjointUnder => "disjoint_under",
            Algorithm::DisjointDebug => "disjoint_debug",
        }
    }

    pub fn kernel(self) -> BlendFn {
        match self {
            Algorithm::SourceOver => source_over,
            Algorithm::DestinationOver => destination_over,
            Algorithm::Alpha => alpha,
            Algorithm::Multiplicative => multiplicative,
            Algorithm::FirstTop => first_top,
            Algorithm::FirstBottom => first_bottom,
            Algorithm::DisjointOver => disjoint_over,
            Algorithm::DisjointUnder => disjoint_under,
            Algorithm::DisjointDebug => disjoint_debug,
        }
    }

    pub fn blend(self, bg: Rgba8, fg: Rgba8) -> Rgba8 {
        (self.kernel())(bg, fg)
    }
}

impl FromStr for Algorithm {
    type Err = BlendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| BlendError::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn source_over(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    match fg[3] {
        0 => return bg,
        255 => return fg,
        _ => {}
    }

    let fa = unit(fg[3]);
    let ba = unit(bg[3]);
    let bw = ba * (1.0 - fa);
    let oa = fa + bw;

    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = quantize((unit(fg[i]) * fa + unit(bg[i]) * bw) / oa);
    }
    out[3] = quantize(oa);
    out
}

pub fn destination_over(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    source_over(fg, bg)
}

pub fn alpha(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    match fg[3] {
        0 => return bg,
        255 => return fg,
        _ => {}
    }

    let t = unit(fg[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let b = unit(bg[i]);
        out[i] = quantize(b + (unit(fg[i]) - b) * t);
    }
    out
}

pub fn multiplicative(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    let fa = unit(fg[3]);
    let ba = unit(bg[3]);

    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = quantize(unit(bg[i]) * unit(fg[i]));
    }
    out[3] = quantize(fa + ba * (1.0 - fa));
    out
}

pub fn first_top(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    if fg[3] == 0 { bg } else { fg }
}

pub fn first_bottom(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    if bg[3] == 0 { fg } else { bg }
}

pub fn disjoint_over(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    let s = premultiply(fg);
    let b = premultiply(bg);
    // Fb = min(1, (1 - as) / ab); ab == 0 contributes nothing either way.
    let fb = if b[3] > 0.0 {
        ((1.0 - s[3]) / b[3]).min(1.0)
    } else {
        1.0
    };
    disjoint_mix(s, 1.0, b, fb)
}

pub fn disjoint_under(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    let s = premultiply(fg);
    let b = premultiply(bg);
    let fs = if s[3] > 0.0 {
        ((1.0 - b[3]) / s[3]).min(1.0)
    } else {
        1.0
    };
    disjoint_mix(s, fs, b, 1.0)
}

pub fn disjoint_debug(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    let a = (u16::from(fg[3]) + u16::from(bg[3])).min(255) as u8;
    if unit(fg[3]) + unit(bg[3]) < 1.0 {
        [0, 255, 0, a]
    } else {
        [255, 0, 0, a]
    }
}

fn disjoint_mix(s: [f32; 4], fs: f32, b: [f32; 4], fb: f32) -> Rgba8 {
    let mut c = [0f32; 4];
    for i in 0..4 {
        c[i] = (s[i] * fs + b[i] * fb).min(1.0);
    }
    unpremultiply(c)
}

#[cfg(test)]
#[path = "../../tests/unit/blend/algorithms.rs"]
mod tests;
