use super::*;

fn gradient(width: u32, height: u32, seed: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let v = x.wrapping_mul(31) ^ y.wrapping_mul(17) ^ seed;
        [
            (v & 0xff) as u8,
            ((v >> 3) & 0xff) as u8,
            ((v >> 5) & 0xff) as u8,
            (v.wrapping_mul(7) & 0xff) as u8,
        ]
    })
    .unwrap()
}

#[test]
fn zero_threads_is_a_configuration_error() {
    let a = gradient(4, 4, 1);
    let err = composite(&a, &a, Algorithm::SourceOver, 0).unwrap_err();
    assert!(matches!(err, BlendError::InvalidConfiguration(_)));
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let a = gradient(4, 4, 1);
    let b = gradient(4, 5, 2);
    let err = composite(&a, &b, Algorithm::SourceOver, 1).unwrap_err();
    match err {
        BlendError::DimensionMismatch {
            expected,
            found,
            index,
        } => {
            assert_eq!(expected, a.dimensions());
            assert_eq!(found, b.dimensions());
            assert_eq!(index, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn serial_matches_per_pixel_kernel() {
    let bg = gradient(5, 3, 11);
    let fg = gradient(5, 3, 99);
    for alg in Algorithm::ALL {
        let out = composite(&bg, &fg, alg, 1).unwrap();
        for y in 0..3 {
            for x in 0..5 {
                let expected = alg.blend(bg.pixel(x, y).unwrap(), fg.pixel(x, y).unwrap());
                assert_eq!(out.pixel(x, y), Some(expected), "{alg} at {x},{y}");
            }
        }
    }
}

#[test]
fn owned_pool_matches_serial_for_odd_heights() {
    let pool = WorkerPool::new(3).unwrap();
    let bg = gradient(9, 13, 5);
    let fg = gradient(9, 13, 6);
    for alg in Algorithm::ALL {
        let serial = composite(&bg, &fg, alg, 1).unwrap();
        for strips in [2usize, 3, 5, 13, 40] {
            let pooled = composite_with(&pool, &bg, &fg, alg, strips).unwrap();
            assert_eq!(pooled.as_bytes(), serial.as_bytes(), "{alg} strips={strips}");
        }
    }
    let status = pool.status();
    assert_eq!(status.active_count, 0);
    assert_eq!(status.idle_count, 3);
}

#[test]
fn execution_serial_ignores_pool() {
    let pool = WorkerPool::new(2).unwrap();
    assert!(matches!(Execution::new(&pool, 1), Execution::Serial));
    assert!(matches!(
        Execution::new(&pool, 4),
        Execution::Pooled { strips: 4, .. }
    ));

    let bg = gradient(3, 3, 1);
    let fg = gradient(3, 3, 2);
    let out = Execution::new(&pool, 1)
        .composite(&bg, &fg, Algorithm::Alpha)
        .unwrap();
    assert_eq!(out.dimensions(), bg.dimensions());
    assert_eq!(pool.status().completed_units, 0);
}

#[test]
fn thread_count_far_beyond_height_matches_serial() {
    let pool = WorkerPool::new(2).unwrap();
    let bg = gradient(4, 4, 21);
    let fg = gradient(4, 4, 22);
    let serial = composite(&bg, &fg, Algorithm::SourceOver, 1).unwrap();
    let pooled = composite_with(&pool, &bg, &fg, Algorithm::SourceOver, usize::MAX).unwrap();
    assert_eq!(pooled, serial);
    assert_eq!(pool.status().completed_units, 4);
}

#[test]
fn single_row_image_with_many_strips() {
    let pool = WorkerPool::new(2).unwrap();
    let bg = gradient(16, 1, 3);
    let fg = gradient(16, 1, 4);
    let serial = composite(&bg, &fg, Algorithm::Multiplicative, 1).unwrap();
    let pooled = composite_with(&pool, &bg, &fg, Algorithm::Multiplicative, 8).unwrap();
    assert_eq!(pooled, serial);
}
