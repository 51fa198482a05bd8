use std::ops::Range;

/// Split `height` rows into at most `parts` contiguous strips.
///
/// Strips are as even as possible: the first `height % parts` strips get one extra row. The
/// strip count is capped at `height`, so no strip is empty unless `height == 0`. The ranges'
/// union is always `0..height`.
pub fn partition_rows(height: u32, parts: usize) -> Vec<Range<u32>> {
    let parts = parts.min(height as usize).max(1);
    let parts_u32 = u32::try_from(parts).unwrap_or(u32::MAX);
    let base = height / parts_u32;
    let extra = height % parts_u32;

    let mut out = Vec::with_capacity(parts);
    let mut start = 0u32;
    for i in 0..parts {
        let len = if (i as u64) < u64::from(extra) {
            base + 1
        } else {
            base
        };
        let end = start + len;
        out.push(start..end);
        start = end;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compose/strips.rs"]
mod tests;
