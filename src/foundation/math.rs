/// 8-bit channel to the normalized `[0, 1]` domain.
#[inline]
pub(crate) fn unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}

/// Normalized value back to 8 bits, rounding half up and clamping to `[0, 255]`.
///
/// NaN quantizes to 0.
#[inline]
pub(crate) fn quantize(v: f32) -> u8 {
    (v * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Straight-alpha pixel to normalized premultiplied `[r, g, b, a]`.
#[inline]
pub(crate) fn premultiply(px: [u8; 4]) -> [f32; 4] {
    let a = unit(px[3]);
    [unit(px[0]) * a, unit(px[1]) * a, unit(px[2]) * a, a]
}

/// Normalized premultiplied color back to a straight-alpha pixel.
///
/// Zero alpha yields transparent black.
#[inline]
pub(crate) fn unpremultiply(c: [f32; 4]) -> [u8; 4] {
    let a = c[3].clamp(0.0, 1.0);
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    [
        quantize(c[0] / a),
        quantize(c[1] / a),
        quantize(c[2] / a),
        quantize(a),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
