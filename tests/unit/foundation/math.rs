use super::*;

#[test]
fn unit_and_quantize_round_trip_every_value() {
    for v in 0..=255u8 {
        assert_eq!(quantize(unit(v)), v);
    }
}

#[test]
fn quantize_rounds_half_up() {
    // 0.5 * 255 is exactly 127.5.
    assert_eq!(quantize(0.5), 128);
    assert_eq!(quantize(0.498), 127);
}

#[test]
fn quantize_clamps_out_of_range_and_nan() {
    assert_eq!(quantize(-0.25), 0);
    assert_eq!(quantize(1.75), 255);
    assert_eq!(quantize(f32::NAN), 0);
}

#[test]
fn premultiply_round_trip_opaque_is_exact() {
    let px = [12, 200, 99, 255];
    assert_eq!(unpremultiply(premultiply(px)), px);
}

#[test]
fn unpremultiply_zero_alpha_is_transparent_black() {
    assert_eq!(unpremultiply([0.3, 0.2, 0.1, 0.0]), [0, 0, 0, 0]);
}
